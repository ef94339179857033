//! Chart rendering: glow line chart or classic candlestick + volume.
//!
//! Glow is a single panel: the closing-price line drawn twice, a dimmed
//! halo underneath the neon line. Classic is exactly two stacked panels
//! sharing the time axis: Unicode candlesticks on top, volume bars below.

use crate::models::{Bar, Period, Theme};
use crate::style::Palette;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

// Candlestick glyphs, three-zone rendering: upper wick, body, lower wick.
const GLYPH_VOID: char = ' ';
const GLYPH_BODY: char = '┃';
const GLYPH_HALF_BODY_BOTTOM: char = '╻';
const GLYPH_HALF_BODY_TOP: char = '╹';
const GLYPH_WICK: char = '│';
const GLYPH_TOP: char = '╽';
const GLYPH_BOTTOM: char = '╿';
const GLYPH_UPPER_WICK: char = '╷';
const GLYPH_LOWER_WICK: char = '╵';

const PRICE_AXIS_WIDTH: u16 = 11;

/// Split the chart area into the theme's panels: one for glow, two stacked
/// (price over volume) for classic.
pub fn chart_layout(theme: Theme, area: Rect) -> Vec<Rect> {
    let constraints = panel_constraints(theme);
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

fn panel_constraints(theme: Theme) -> Vec<Constraint> {
    match theme {
        Theme::Glow => vec![Constraint::Min(0)],
        Theme::Classic => vec![Constraint::Percentage(70), Constraint::Percentage(30)],
    }
}

/// Render the chart for a non-empty series. The caller short-circuits on
/// empty history, so this draws nothing for an empty slice.
pub fn render_chart(
    frame: &mut Frame,
    theme: Theme,
    palette: &Palette,
    ticker: &str,
    period: Period,
    bars: &[Bar],
    area: Rect,
) {
    if bars.is_empty() {
        return;
    }

    let panels = chart_layout(theme, area);
    match theme {
        Theme::Glow => render_glow(frame, palette, ticker, period, bars, panels[0]),
        Theme::Classic => {
            let visible = visible_bars(bars, panels[0].width.saturating_sub(PRICE_AXIS_WIDTH + 2));
            render_candles(frame, palette, ticker, period, visible, panels[0]);
            render_volume(frame, palette, visible, panels[1]);
        }
    }
}

/// Glow theme: closing-price line with a halo dataset drawn under it.
fn render_glow(
    frame: &mut Frame,
    palette: &Palette,
    ticker: &str,
    period: Period,
    bars: &[Bar],
    area: Rect,
) {
    let data: Vec<(f64, f64)> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| (i as f64, b.close))
        .collect();

    let (min_y, max_y) = close_bounds(bars);
    let max_x = (bars.len().saturating_sub(1)) as f64;

    let datasets = vec![
        // Halo first so the neon line paints over it.
        Dataset::default()
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(palette.halo).add_modifier(Modifier::DIM))
            .data(&data),
        Dataset::default()
            .name(ticker.to_string())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(palette.neon))
            .data(&data),
    ];

    let first_date = bars[0].timestamp.format("%b %d").to_string();
    let last_date = bars[bars.len() - 1].timestamp.format("%b %d").to_string();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(Span::styled(
                    format!(" {} Stock Price ({}) ", ticker, period),
                    Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
                )),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(palette.dim))
                .bounds([0.0, max_x.max(1.0)])
                .labels(vec![Span::raw(first_date), Span::raw(last_date)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(palette.dim))
                .bounds([min_y, max_y])
                .labels(vec![
                    Span::raw(format!("{:.2}", min_y)),
                    Span::raw(format!("{:.2}", max_y)),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Classic theme, top panel: candlesticks.
fn render_candles(
    frame: &mut Frame,
    palette: &Palette,
    ticker: &str,
    period: Period,
    visible: &[Bar],
    area: Rect,
) {
    let height = area.height.saturating_sub(2);
    if height == 0 {
        return;
    }

    let (min_price, max_price) = price_bounds(visible);
    let mut lines = Vec::with_capacity(height as usize);

    for y in (1..=height).rev() {
        let mut spans = Vec::with_capacity(visible.len() + 1);
        spans.push(Span::styled(
            price_axis_label(y, height, min_price, max_price),
            Style::default().fg(palette.dim),
        ));

        for bar in visible {
            let glyph = candle_glyph(bar, y, height, min_price, max_price);
            let color = if bar.close >= bar.open {
                palette.gain
            } else {
                palette.loss
            };
            spans.push(Span::styled(glyph.to_string(), Style::default().fg(color)));
        }

        lines.push(Line::from(spans));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(Span::styled(
                format!(" {} Classic Trading Chart ({}) ", ticker, period),
                Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
            )),
    );

    frame.render_widget(widget, area);
}

/// Classic theme, bottom panel: volume columns aligned with the candles
/// above, drawn dimmed.
fn render_volume(frame: &mut Frame, palette: &Palette, visible: &[Bar], area: Rect) {
    let height = area.height.saturating_sub(2);
    if height == 0 {
        return;
    }

    let max_volume = visible.iter().map(|b| b.volume).max().unwrap_or(0);
    let mut lines = Vec::with_capacity(height as usize + 1);

    for y in (1..=height).rev() {
        let mut spans = Vec::with_capacity(visible.len() + 1);
        spans.push(Span::styled(
            format!("{:>9} │", ""),
            Style::default().fg(palette.dim),
        ));

        for bar in visible {
            let filled = volume_height(bar.volume, max_volume, height) >= y;
            let glyph = if filled { '█' } else { ' ' };
            spans.push(Span::styled(
                glyph.to_string(),
                Style::default().fg(palette.volume).add_modifier(Modifier::DIM),
            ));
        }

        lines.push(Line::from(spans));
    }

    // Shared time axis: date labels under the volume panel.
    lines.push(date_axis_line(palette, visible));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(Span::styled(" Volume ", Style::default().fg(palette.dim))),
    );

    frame.render_widget(widget, area);
}

fn date_axis_line(palette: &Palette, visible: &[Bar]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ".repeat(PRICE_AXIS_WIDTH as usize))];

    if let (Some(first), Some(last)) = (visible.first(), visible.last()) {
        let left = first.timestamp.format("%b %d").to_string();
        let right = last.timestamp.format("%b %d").to_string();
        let gap = visible
            .len()
            .saturating_sub(left.len() + right.len());
        spans.push(Span::styled(left, Style::default().fg(palette.dim)));
        spans.push(Span::raw(" ".repeat(gap)));
        spans.push(Span::styled(right, Style::default().fg(palette.dim)));
    }

    Line::from(spans)
}

/// The last N bars that fit the panel width, one column per bar.
fn visible_bars(bars: &[Bar], width: u16) -> &[Bar] {
    let max_visible = width.max(1) as usize;
    if bars.len() <= max_visible {
        bars
    } else {
        &bars[bars.len() - max_visible..]
    }
}

/// Price bounds over highs and lows with a 2% margin.
fn price_bounds(bars: &[Bar]) -> (f64, f64) {
    let max = bars.iter().fold(f64::NEG_INFINITY, |m, b| m.max(b.high));
    let min = bars.iter().fold(f64::INFINITY, |m, b| m.min(b.low));
    let margin = (max - min) * 0.02;
    ((min - margin).max(0.0), max + margin)
}

/// Close bounds for the glow line, 2% margin each side.
fn close_bounds(bars: &[Bar]) -> (f64, f64) {
    let max = bars.iter().fold(f64::NEG_INFINITY, |m, b| m.max(b.close));
    let min = bars.iter().fold(f64::INFINITY, |m, b| m.min(b.close));
    ((min * 0.98).max(0.0), max * 1.02)
}

fn price_axis_label(y: u16, height: u16, min: f64, max: f64) -> String {
    // A price label every 4 rows.
    if y % 4 == 0 {
        let price = min + (y as f64 / height as f64) * (max - min);
        format!("{:>9.2} │", price)
    } else {
        format!("{:>9} │", "")
    }
}

fn price_to_row(price: f64, height: u16, min: f64, max: f64) -> f64 {
    if max == min {
        return height as f64 / 2.0;
    }
    (price - min) / (max - min) * height as f64
}

/// Pick the glyph for one candle at one row, top-down three-zone logic
/// with quarter-row thresholds for sub-character precision.
fn candle_glyph(bar: &Bar, y: u16, height: u16, min: f64, max: f64) -> char {
    let row = y as f64;
    let high_y = price_to_row(bar.high, height, min, max);
    let low_y = price_to_row(bar.low, height, min, max);
    let body_top = price_to_row(bar.open.max(bar.close), height, min, max);
    let body_bottom = price_to_row(bar.open.min(bar.close), height, min, max);

    if high_y.ceil() >= row && row >= body_top.floor() {
        // Upper wick zone.
        if body_top - row > 0.75 {
            GLYPH_BODY
        } else if body_top - row > 0.25 {
            if high_y - row > 0.75 {
                GLYPH_TOP
            } else {
                GLYPH_HALF_BODY_BOTTOM
            }
        } else if high_y - row > 0.75 {
            GLYPH_WICK
        } else if high_y - row > 0.25 {
            GLYPH_UPPER_WICK
        } else {
            GLYPH_VOID
        }
    } else if body_top.floor() >= row && row >= body_bottom.ceil() {
        // Body zone.
        GLYPH_BODY
    } else if body_bottom.ceil() >= row && row >= low_y.floor() {
        // Lower wick zone.
        if body_bottom - row < 0.25 {
            GLYPH_BODY
        } else if body_bottom - row < 0.75 {
            if low_y - row < 0.25 {
                GLYPH_BOTTOM
            } else {
                GLYPH_HALF_BODY_TOP
            }
        } else if low_y - row < 0.25 {
            GLYPH_WICK
        } else if low_y - row < 0.75 {
            GLYPH_LOWER_WICK
        } else {
            GLYPH_VOID
        }
    } else {
        GLYPH_VOID
    }
}

fn volume_height(volume: u64, max_volume: u64, height: u16) -> u16 {
    if max_volume == 0 {
        return 0;
    }
    ((volume as f64 / max_volume as f64) * height as f64).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(open: f64, high: f64, low: f64, close: f64, volume: u64) -> Bar {
        Bar {
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn test_glow_renders_one_panel() {
        let area = Rect::new(0, 0, 100, 40);
        let panels = chart_layout(Theme::Glow, area);
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].height, 40);
    }

    #[test]
    fn test_classic_renders_two_stacked_panels() {
        let area = Rect::new(0, 0, 100, 40);
        let panels = chart_layout(Theme::Classic, area);
        assert_eq!(panels.len(), 2);
        // Stacked: same x range, price above volume.
        assert_eq!(panels[0].x, panels[1].x);
        assert_eq!(panels[0].width, panels[1].width);
        assert_eq!(panels[0].y + panels[0].height, panels[1].y);
        assert!(panels[0].height > panels[1].height);
    }

    #[test]
    fn test_visible_bars_takes_tail() {
        let bars: Vec<Bar> = (0..50)
            .map(|i| bar(1.0, 2.0, 0.5, 1.5, i as u64))
            .collect();
        let visible = visible_bars(&bars, 10);
        assert_eq!(visible.len(), 10);
        assert_eq!(visible[0].volume, 40);

        let visible = visible_bars(&bars, 100);
        assert_eq!(visible.len(), 50);
    }

    #[test]
    fn test_price_bounds_include_margin() {
        let bars = vec![bar(10.0, 12.0, 8.0, 11.0, 1)];
        let (min, max) = price_bounds(&bars);
        assert!(min < 8.0);
        assert!(max > 12.0);
    }

    #[test]
    fn test_candle_body_glyph_in_middle() {
        // Body spans most of the range; a middle row must be body.
        let b = bar(10.0, 20.0, 0.0, 18.0, 1);
        let glyph = candle_glyph(&b, 10, 20, 0.0, 20.0);
        assert_eq!(glyph, GLYPH_BODY);
    }

    #[test]
    fn test_candle_wick_glyph_above_body() {
        // Thin body at the bottom, long upper wick.
        let b = bar(1.0, 20.0, 0.0, 2.0, 1);
        let glyph = candle_glyph(&b, 15, 20, 0.0, 20.0);
        assert_eq!(glyph, GLYPH_WICK);
    }

    #[test]
    fn test_candle_void_outside_range() {
        // Candle near the bottom of the scale: top rows stay blank.
        let b = bar(1.0, 2.0, 0.5, 1.5, 1);
        let glyph = candle_glyph(&b, 19, 20, 0.0, 20.0);
        assert_eq!(glyph, GLYPH_VOID);
    }

    #[test]
    fn test_volume_height_scaling() {
        assert_eq!(volume_height(0, 100, 10), 0);
        assert_eq!(volume_height(100, 100, 10), 10);
        assert_eq!(volume_height(50, 100, 10), 5);
        assert_eq!(volume_height(10, 0, 10), 0);
    }
}
