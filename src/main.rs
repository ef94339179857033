//! Neonquotes - a live-refreshing terminal dashboard for stock quotes,
//! charts, and news headlines.

mod app;
mod cache;
mod chart;
mod cli;
mod config;
mod market;
mod models;
mod news;
mod style;
mod ui;

use anyhow::Result;
use app::App;
use cli::Args;
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use style::Palette;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    let config = if let Some(ref path) = args.config {
        Config::load(path)?
    } else {
        Config::load_or_default()
    };

    // The style palette is a hard dependency: fail fast when it is missing.
    let style_path = args
        .style
        .clone()
        .or_else(|| config.general.style.clone())
        .unwrap_or_else(|| PathBuf::from(style::DEFAULT_STYLE_PATH));
    let palette = Palette::load(&style_path)?;

    let mut app = App::new(&args, &config, palette)?;

    if app.tickers.is_empty() {
        eprintln!("Error: No tickers to display.");
        eprintln!("Provide tickers via -s flag or config file.");
        eprintln!();
        eprintln!("Example: neonquotes -s \"AAPL, TSLA, NVDA\"");
        eprintln!();
        eprintln!("Or create a config file at {:?}", Config::default_config_path());
        eprintln!();
        eprintln!("Sample config:");
        eprintln!("{}", config::sample_config());
        std::process::exit(1);
    }

    if app.batch_mode {
        run_batch(&mut app).await
    } else {
        run_interactive(&mut app).await
    }
}

/// Run in batch mode (non-interactive): print each cycle, sleep, repeat.
async fn run_batch(app: &mut App) -> Result<()> {
    loop {
        app.refresh().await;
        ui::render_batch(app);

        if app.should_quit() {
            break;
        }

        tokio::time::sleep(app.refresh_interval).await;
    }

    Ok(())
}

/// Run in interactive mode with TUI.
async fn run_interactive(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Main application loop: draw, poll keys, refresh when due.
async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if crossterm::event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(app, key.code, key.modifiers);
            }
        }

        if app.should_quit() {
            break;
        }

        if app.needs_refresh() {
            app.refresh().await;
        }
    }

    Ok(())
}

/// Handle keyboard input.
fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Close help overlay on any key
    if app.show_help {
        app.show_help = false;
        return;
    }

    match code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Ticker selection
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),

        // Display controls
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('p') => app.cycle_period(),
        KeyCode::Char('h') | KeyCode::Char('?') => app.toggle_help(),

        // Refresh
        KeyCode::Char(' ') | KeyCode::Char('r') => app.force_refresh(),

        _ => {}
    }
}
