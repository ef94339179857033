//! Data models for bars, company profiles, and news items.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One time-bucketed OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar timestamp
    pub timestamp: DateTime<Utc>,
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: u64,
}

/// Company metadata from the quote provider.
///
/// Every field is optional; an absent field means "unknown" and is rendered
/// with a fallback, never treated as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Display name (e.g., "Apple Inc.")
    pub name: Option<String>,
    /// Sector (e.g., "Technology")
    pub sector: Option<String>,
    /// Industry (e.g., "Consumer Electronics")
    pub industry: Option<String>,
    /// Company website
    pub website: Option<String>,
    /// Explicit logo reference, when the provider supplies one
    pub logo_url: Option<String>,
    /// Current price
    pub price: Option<f64>,
    /// Market capitalization
    pub market_cap: Option<u64>,
    /// 52-week high
    pub year_high: Option<f64>,
    /// 52-week low
    pub year_low: Option<f64>,
    /// Free-text business summary
    pub summary: Option<String>,
}

/// A single news headline for a ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    /// Article headline
    pub headline: String,
    /// Link to the article
    pub url: String,
    /// Source outlet (e.g., "Reuters")
    pub source: String,
    /// Publication time, unix seconds
    pub datetime: i64,
}

impl NewsItem {
    /// Publication date formatted for display, e.g. "Jan 05, 2026".
    pub fn formatted_date(&self) -> String {
        match Utc.timestamp_opt(self.datetime, 0) {
            chrono::LocalResult::Single(dt) => dt.format("%b %d, %Y").to_string(),
            _ => "-".to_string(),
        }
    }
}

/// Historical time range for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Period {
    /// 5 days; internal only, used for the day-over-day metric
    #[value(skip)]
    FiveDays,
    /// 1 month
    #[default]
    #[value(name = "1mo")]
    OneMonth,
    /// 3 months
    #[value(name = "3mo")]
    ThreeMonths,
    /// 6 months
    #[value(name = "6mo")]
    SixMonths,
    /// 1 year
    #[value(name = "1y")]
    OneYear,
    /// 2 years
    #[value(name = "2y")]
    TwoYears,
    /// 5 years
    #[value(name = "5y")]
    FiveYears,
    /// All available history
    #[value(name = "max")]
    Max,
}

impl Period {
    /// Provider range parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }

    /// The next user-facing period in cycle order. `FiveDays` is skipped.
    pub fn next(self) -> Self {
        match self {
            Period::FiveDays | Period::Max => Period::OneMonth,
            Period::OneMonth => Period::ThreeMonths,
            Period::ThreeMonths => Period::SixMonths,
            Period::SixMonths => Period::OneYear,
            Period::OneYear => Period::TwoYears,
            Period::TwoYears => Period::FiveYears,
            Period::FiveYears => Period::Max,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart rendering theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    /// Single-panel neon line chart with a glow halo
    #[default]
    Glow,
    /// Two-panel candlestick + volume chart
    Classic,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Glow => Theme::Classic,
            Theme::Classic => Theme::Glow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Glow => "glow",
            Theme::Classic => "classic",
        }
    }
}

/// Day-over-day price change, computed from the last two closes of a
/// fresh 5-day series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyChange {
    /// Absolute change in dollars
    pub change: f64,
    /// Change as a percentage of the previous close
    pub percent: f64,
}

impl DailyChange {
    /// Returns `None` when fewer than 2 bars are available; the metric is
    /// then omitted entirely rather than shown as zero.
    pub fn from_bars(bars: &[Bar]) -> Option<Self> {
        if bars.len() < 2 {
            return None;
        }
        let last = bars[bars.len() - 1].close;
        let prev = bars[bars.len() - 2].close;
        if prev == 0.0 {
            return None;
        }
        Some(Self {
            change: last - prev,
            percent: (last - prev) / prev * 100.0,
        })
    }
}

/// Everything assembled for one ticker in one refresh cycle.
#[derive(Debug, Clone)]
pub struct TickerReport {
    pub ticker: String,
    pub profile: CompanyProfile,
    pub history: Vec<Bar>,
    /// Resolved logo reference, when one exists and responded
    pub logo_url: Option<String>,
    /// Day-over-day change; `None` when fewer than 2 recent bars
    pub daily_change: Option<DailyChange>,
    /// Filtered news, provider order; display truncates to 5
    pub news: Vec<NewsItem>,
}

/// Per-ticker outcome of a refresh cycle.
///
/// Failures are values, matched explicitly by the renderer; one ticker's
/// failure never aborts the cycle.
#[derive(Debug, Clone)]
pub enum TickerOutcome {
    /// Full report assembled
    Report(TickerReport),
    /// Provider returned an empty history; warned, not an error
    NoData(String),
    /// Something in this ticker's assembly failed
    Failed { ticker: String, message: String },
}

impl TickerOutcome {
    /// The ticker this outcome belongs to.
    pub fn ticker(&self) -> &str {
        match self {
            TickerOutcome::Report(r) => &r.ticker,
            TickerOutcome::NoData(t) => t,
            TickerOutcome::Failed { ticker, .. } => ticker,
        }
    }
}
