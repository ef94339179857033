//! Command-line interface.
//!
//! The original dashboard's sidebar widgets map to flags here: the ticker
//! text field, the period select, the refresh slider, and the theme radio.

use crate::models::{Period, Theme};
use clap::Parser;
use std::path::PathBuf;

/// Refresh interval bounds in seconds.
pub const MIN_REFRESH_SECS: u64 = 10;
pub const MAX_REFRESH_SECS: u64 = 300;

/// A live-refreshing terminal dashboard for stock charts, company info,
/// and recent news headlines.
#[derive(Parser, Debug, Clone)]
#[command(name = "neonquotes")]
#[command(version)]
#[command(about = "A live-refreshing terminal dashboard for stock quotes", long_about = None)]
pub struct Args {
    /// Tickers to display (comma-separated free text)
    ///
    /// Example: "AAPL, TSLA, NVDA". Entries are trimmed and upper-cased;
    /// empty entries are dropped. Falls back to the config file watchlist.
    #[arg(short = 's', long, env = "NEONQUOTES_TICKERS")]
    pub tickers: Option<String>,

    /// Historical time range for the chart
    #[arg(short = 'p', long, value_enum, default_value = "1mo")]
    pub period: Period,

    /// Auto-refresh interval in seconds (clamped to 10-300)
    #[arg(short = 'r', long, env = "NEONQUOTES_REFRESH")]
    pub refresh: Option<u64>,

    /// Chart theme
    #[arg(short = 't', long, value_enum, default_value = "glow")]
    pub theme: Theme,

    /// Style palette file (required at startup)
    #[arg(long, env = "NEONQUOTES_STYLE")]
    pub style: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "NEONQUOTES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Batch mode - print each cycle as plain text instead of the TUI
    #[arg(short = 'b', long)]
    pub batch: bool,

    /// Number of refresh cycles before exiting (0 = infinite)
    #[arg(short = 'n', long, default_value = "0")]
    pub iterations: u64,

    /// Market API timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// News provider API credential
    ///
    /// Without one, the news section shows a placeholder.
    #[arg(long, env = "NEONQUOTES_NEWS_TOKEN")]
    pub news_token: Option<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

/// Clamp a refresh interval to the supported range.
pub fn clamp_refresh(secs: u64) -> u64 {
    secs.clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS)
}

/// Parse a comma-separated ticker list: trim, uppercase, drop empty entries.
/// Duplicates are kept. Malformed input degrades to an empty list.
pub fn parse_tickers(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tickers_trims_and_uppercases() {
        assert_eq!(parse_tickers(" aapl ,, tsla"), vec!["AAPL", "TSLA"]);
    }

    #[test]
    fn test_parse_tickers_keeps_duplicates() {
        assert_eq!(parse_tickers("AAPL,aapl"), vec!["AAPL", "AAPL"]);
    }

    #[test]
    fn test_parse_tickers_garbage_degrades_to_empty() {
        assert!(parse_tickers("").is_empty());
        assert!(parse_tickers(" , ,,  ").is_empty());
    }

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["neonquotes"]);
        assert!(args.tickers.is_none());
        assert_eq!(args.period, Period::OneMonth);
        assert!(args.refresh.is_none());
        assert_eq!(args.theme, Theme::Glow);
        assert!(!args.batch);
    }

    #[test]
    fn test_refresh_clamped() {
        assert_eq!(clamp_refresh(5), 10);
        assert_eq!(clamp_refresh(9999), 300);
        assert_eq!(clamp_refresh(120), 120);
    }

    #[test]
    fn test_period_values() {
        let args = Args::parse_from(["neonquotes", "-p", "6mo"]);
        assert_eq!(args.period, Period::SixMonths);

        let args = Args::parse_from(["neonquotes", "--period", "max"]);
        assert_eq!(args.period, Period::Max);

        // The internal 5d range is not a CLI choice
        assert!(Args::try_parse_from(["neonquotes", "-p", "5d"]).is_err());
    }

    #[test]
    fn test_theme_values() {
        let args = Args::parse_from(["neonquotes", "-t", "classic"]);
        assert_eq!(args.theme, Theme::Classic);
    }
}
