//! Terminal user interface with ratatui.

use crate::app::{App, NEWS_DISPLAY_LIMIT};
use crate::chart;
use crate::models::{DailyChange, TickerOutcome, TickerReport};
use crate::news::top_headlines;
use crate::style::Palette;
use num_format::{Locale, ToFormattedString};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the main UI.
pub fn render(frame: &mut Frame, app: &App) {
    let palette = app.palette;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with ticker tabs
            Constraint::Min(10),   // Selected ticker dashboard
            Constraint::Length(1), // Footer / status caption
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0], &palette);
    render_body(frame, app, chunks[1], &palette);
    render_footer(frame, app, chunks[2], &palette);

    if app.show_help {
        render_help_overlay(frame, &palette);
    }
}

/// Header: title plus one tab per ticker, failures marked.
fn render_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let mut tabs: Vec<Span> = vec![Span::styled(
        "NEONQUOTES ",
        Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
    )];

    for (i, ticker) in app.tickers.iter().enumerate() {
        let style = if i == app.selected {
            Style::default()
                .fg(palette.neon)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.dim)
        };
        let marker = match app.outcomes.get(i) {
            Some(TickerOutcome::Failed { .. }) => "!",
            Some(TickerOutcome::NoData(_)) => "?",
            _ => "",
        };
        tabs.push(Span::styled(format!(" {}{} ", ticker, marker), style));
    }

    let header = Paragraph::new(Line::from(tabs)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.border)),
    );

    frame.render_widget(header, area);
}

/// Body: the selected ticker's dashboard, or its warning/error state.
fn render_body(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    match app.selected_outcome() {
        None => {
            let loading = Paragraph::new("Fetching market data...")
                .style(Style::default().fg(palette.dim))
                .alignment(Alignment::Center);
            frame.render_widget(loading, area);
        }
        Some(TickerOutcome::NoData(ticker)) => {
            let warning = Paragraph::new(format!("No data available for {}", ticker))
                .style(Style::default().fg(palette.title))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" Warning "));
            frame.render_widget(warning, area);
        }
        Some(TickerOutcome::Failed { ticker, message }) => {
            let error = Paragraph::new(format!("Could not load info for {}: {}", ticker, message))
                .style(Style::default().fg(palette.loss))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(palette.loss))
                        .title(" Error "),
                );
            frame.render_widget(error, area);
        }
        Some(TickerOutcome::Report(report)) => render_report(frame, app, report, area, palette),
    }
}

/// One ticker's full dashboard: company header, chart, metrics, summary, news.
fn render_report(frame: &mut Frame, app: &App, report: &TickerReport, area: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                          // Company header
            Constraint::Min(8),                             // Chart panel(s)
            Constraint::Length(3),                          // Metrics row
            Constraint::Length(4),                          // Business summary
            Constraint::Length(NEWS_DISPLAY_LIMIT as u16 + 2), // News
        ])
        .split(area);

    render_company_header(frame, report, chunks[0], palette);
    chart::render_chart(
        frame,
        app.theme,
        palette,
        &report.ticker,
        app.period,
        &report.history,
        chunks[1],
    );
    render_metrics(frame, report, chunks[2], palette);
    render_summary(frame, report, chunks[3], palette);
    render_news(frame, report, chunks[4], palette);
}

fn render_company_header(frame: &mut Frame, report: &TickerReport, area: Rect, palette: &Palette) {
    let profile = &report.profile;
    let name = profile.name.as_deref().unwrap_or(&report.ticker);
    let sector = profile.sector.as_deref().unwrap_or("N/A");
    let industry = profile.industry.as_deref().unwrap_or("N/A");

    let mut lines = vec![
        Line::from(Span::styled(
            name.to_string(),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} | {}", sector, industry),
            Style::default().fg(palette.dim),
        )),
    ];

    if let Some(ref logo) = report.logo_url {
        lines.push(Line::from(Span::styled(
            format!("logo: {}", logo),
            Style::default().fg(palette.dim).add_modifier(Modifier::DIM),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// The four summary metrics. A missing daily change is omitted, not zeroed.
fn render_metrics(frame: &mut Frame, report: &TickerReport, area: Rect, palette: &Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let profile = &report.profile;

    let price = profile
        .price
        .map(format_price)
        .unwrap_or_else(|| "N/A".to_string());
    render_metric(frame, columns[0], palette, "Current Price", &price, palette.text);

    let cap = profile
        .market_cap
        .map(format_market_cap)
        .unwrap_or_else(|| "N/A".to_string());
    render_metric(frame, columns[1], palette, "Market Cap", &cap, palette.text);

    let range = match (profile.year_high, profile.year_low) {
        (Some(high), Some(low)) => format!("${:.2} / ${:.2}", high, low),
        _ => "N/A".to_string(),
    };
    render_metric(frame, columns[2], palette, "52w High / Low", &range, palette.text);

    if let Some(change) = report.daily_change {
        let color = if change.change >= 0.0 {
            palette.gain
        } else {
            palette.loss
        };
        let value = format_daily_change(change);
        render_metric(frame, columns[3], palette, "Daily Change", &value, color);
    }
}

fn render_metric(
    frame: &mut Frame,
    area: Rect,
    palette: &Palette,
    label: &str,
    value: &str,
    value_color: ratatui::style::Color,
) {
    let lines = vec![
        Line::from(Span::styled(label.to_string(), Style::default().fg(palette.dim))),
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(value_color).add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_summary(frame: &mut Frame, report: &TickerReport, area: Rect, palette: &Palette) {
    let text = report
        .profile
        .summary
        .as_deref()
        .unwrap_or("No company description available.");

    let summary = Paragraph::new(text)
        .style(Style::default().fg(palette.text))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(palette.border)),
        );

    frame.render_widget(summary, area);
}

fn render_news(frame: &mut Frame, report: &TickerReport, area: Rect, palette: &Palette) {
    let items = top_headlines(&report.news, NEWS_DISPLAY_LIMIT);

    let lines: Vec<Line> = if items.is_empty() {
        vec![Line::from(Span::styled(
            "No recent news available.",
            Style::default().fg(palette.dim),
        ))]
    } else {
        items
            .iter()
            .map(|item| {
                Line::from(vec![
                    Span::styled(
                        truncate_string(&item.headline, 70),
                        Style::default()
                            .fg(palette.neon)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                    Span::styled(
                        format!("  {} | {}", item.source, item.formatted_date()),
                        Style::default().fg(palette.dim),
                    ),
                ])
            })
            .collect()
    };

    let news = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(palette.border))
            .title(Span::styled(
                format!(" {} Recent News ", report.ticker),
                Style::default().fg(palette.title),
            )),
    );

    frame.render_widget(news, area);
}

/// Footer: keybindings and the refresh status caption.
fn render_footer(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let footer = Line::from(vec![
        Span::styled(" q", Style::default().fg(palette.title)),
        Span::raw(":quit "),
        Span::styled("j/k", Style::default().fg(palette.title)),
        Span::raw(":ticker "),
        Span::styled("t", Style::default().fg(palette.title)),
        Span::raw(":theme "),
        Span::styled("p", Style::default().fg(palette.title)),
        Span::raw(":period "),
        Span::styled("r", Style::default().fg(palette.title)),
        Span::raw(":refresh "),
        Span::styled("?", Style::default().fg(palette.title)),
        Span::raw(":help "),
        Span::styled(
            format!(
                "| auto-refreshing every {}s (theme: {}) | updated {}",
                app.refresh_interval.as_secs(),
                app.theme.label(),
                app.time_since_refresh()
            ),
            Style::default().fg(palette.dim),
        ),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}

/// Render help overlay.
fn render_help_overlay(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        Line::from(Span::styled(
            "NEONQUOTES HELP",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  Tab/j     Next ticker"),
        Line::from("  k         Previous ticker"),
        Line::from(""),
        Line::from("Display:"),
        Line::from("  t         Toggle glow/classic theme"),
        Line::from("  p         Cycle chart period"),
        Line::from(""),
        Line::from("Actions:"),
        Line::from("  Space/r   Force refresh"),
        Line::from("  q/Esc     Quit"),
        Line::from("  h/?       Toggle help"),
        Line::from(""),
        Line::from("Press any key to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Format the day-over-day change, sign always shown.
fn format_daily_change(change: DailyChange) -> String {
    format!("${:+.2} ({:+.2}%)", change.change, change.percent)
}

/// Format price with two decimals and thousands separators.
fn format_price(price: f64) -> String {
    let total_cents = (price * 100.0).round() as i64;
    format!(
        "${}.{:02}",
        (total_cents / 100).to_formatted_string(&Locale::en),
        (total_cents % 100).abs()
    )
}

/// Format market cap with suffixes.
fn format_market_cap(market_cap: u64) -> String {
    if market_cap >= 1_000_000_000_000 {
        format!("${:.2}T", market_cap as f64 / 1_000_000_000_000.0)
    } else if market_cap >= 1_000_000_000 {
        format!("${:.2}B", market_cap as f64 / 1_000_000_000.0)
    } else if market_cap >= 1_000_000 {
        format!("${:.2}M", market_cap as f64 / 1_000_000.0)
    } else {
        format!("${}", market_cap.to_formatted_string(&Locale::en))
    }
}

/// Truncate string to max length.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let mut end = max_len.saturating_sub(3);
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Render batch mode output (non-interactive).
pub fn render_batch(app: &App) {
    print!("{}", batch_text(app));
}

/// One refresh cycle as plain text, one block per ticker in input order.
/// A failed or empty ticker gets an inline line; the rest still print.
fn batch_text(app: &App) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n=== NEONQUOTES {} (period: {}, theme: {}) ===\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        app.period,
        app.theme.label()
    ));

    for outcome in &app.outcomes {
        match outcome {
            TickerOutcome::NoData(ticker) => {
                out.push_str(&format!("\n[{}] warning: no data available\n", ticker));
            }
            TickerOutcome::Failed { ticker, message } => {
                out.push_str(&format!("\n[{}] error: {}\n", ticker, message));
            }
            TickerOutcome::Report(report) => {
                let profile = &report.profile;
                out.push_str(&format!(
                    "\n[{}] {} ({} | {})\n",
                    report.ticker,
                    profile.name.as_deref().unwrap_or(&report.ticker),
                    profile.sector.as_deref().unwrap_or("N/A"),
                    profile.industry.as_deref().unwrap_or("N/A"),
                ));

                let price = profile
                    .price
                    .map(format_price)
                    .unwrap_or_else(|| "N/A".to_string());
                let cap = profile
                    .market_cap
                    .map(format_market_cap)
                    .unwrap_or_else(|| "N/A".to_string());
                out.push_str(&format!("  price: {}  cap: {}", price, cap));
                if let (Some(high), Some(low)) = (profile.year_high, profile.year_low) {
                    out.push_str(&format!("  52w: ${:.2}/${:.2}", high, low));
                }
                if let Some(change) = report.daily_change {
                    out.push_str(&format!("  day: {}", format_daily_change(change)));
                }
                out.push_str(&format!("  bars: {}\n", report.history.len()));

                for item in top_headlines(&report.news, NEWS_DISPLAY_LIMIT) {
                    out.push_str(&format!(
                        "  - {} ({} | {})\n",
                        item.headline,
                        item.source,
                        item.formatted_date()
                    ));
                }
            }
        }
    }

    out.push_str(&format!(
        "\nAuto-refreshing every {} seconds...\n",
        app.refresh_interval.as_secs()
    ));

    out
}
