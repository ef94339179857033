//! Application state and the per-ticker refresh cycle.
//!
//! The `App` owns the clients, the TTL caches, and the outcomes of the last
//! cycle. Each ticker is processed independently: a failure becomes a
//! `TickerOutcome::Failed` value and the cycle moves on.

use crate::cache::TtlCache;
use crate::cli::{clamp_refresh, Args};
use crate::config::Config;
use crate::market::MarketClient;
use crate::models::{
    Bar, CompanyProfile, DailyChange, NewsItem, Period, Theme, TickerOutcome, TickerReport,
};
use crate::news::NewsClient;
use crate::style::Palette;
use anyhow::{Context, Result};
use std::time::{Duration, Instant};

/// Watchlist used when neither the CLI nor the config provides one.
pub const DEFAULT_TICKERS: &str = "AAPL, TSLA, NVDA";

/// How many headlines the dashboard shows per ticker.
pub const NEWS_DISPLAY_LIMIT: usize = 5;

const HISTORY_TTL: Duration = Duration::from_secs(3600);
const PROFILE_TTL: Duration = Duration::from_secs(3600);
const NEWS_TTL: Duration = Duration::from_secs(1800);

const LOGO_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application state.
pub struct App {
    /// Tickers to display, in input order (duplicates kept)
    pub tickers: Vec<String>,
    /// Selected historical range
    pub period: Period,
    /// Chart theme
    pub theme: Theme,
    /// Loaded style palette
    pub palette: Palette,
    /// Interval between refresh cycles
    pub refresh_interval: Duration,
    /// Outcomes of the last cycle, one per ticker
    pub outcomes: Vec<TickerOutcome>,
    /// Index of the ticker shown in the main pane
    pub selected: usize,
    /// Last refresh time
    pub last_refresh: Option<Instant>,
    /// Completed cycle count
    pub iteration: u64,
    /// Maximum cycles (0 = infinite)
    pub max_iterations: u64,
    /// Is the app running
    pub running: bool,
    /// Show help overlay
    pub show_help: bool,
    /// Batch mode (non-interactive)
    pub batch_mode: bool,
    market: MarketClient,
    news: NewsClient,
    logo_client: reqwest::Client,
    history_cache: TtlCache<(String, Period), Vec<Bar>>,
    profile_cache: TtlCache<String, CompanyProfile>,
    news_cache: TtlCache<String, Vec<NewsItem>>,
}

impl App {
    /// Create the application from CLI args, config file, and palette.
    pub fn new(args: &Args, config: &Config, palette: Palette) -> Result<Self> {
        let ticker_input = args
            .tickers
            .clone()
            .or_else(|| config.tickers_string())
            .unwrap_or_else(|| DEFAULT_TICKERS.to_string());
        let tickers = crate::cli::parse_tickers(&ticker_input);

        let refresh = clamp_refresh(args.refresh.or(config.general.refresh).unwrap_or(60));
        let timeout = args
            .timeout
            .or(config.general.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let news_token = args.news_token.clone().or_else(|| config.news.token.clone());

        let logo_client = reqwest::Client::builder()
            .timeout(LOGO_TIMEOUT)
            .build()
            .context("Failed to create logo HTTP client")?;

        Ok(Self {
            tickers,
            period: args.period,
            theme: args.theme,
            palette,
            refresh_interval: Duration::from_secs(refresh),
            outcomes: Vec::new(),
            selected: 0,
            last_refresh: None,
            iteration: 0,
            max_iterations: args.iterations,
            running: true,
            show_help: false,
            batch_mode: args.batch,
            market: MarketClient::new(timeout)?,
            news: NewsClient::new(news_token)?,
            logo_client,
            history_cache: TtlCache::new(HISTORY_TTL),
            profile_cache: TtlCache::new(PROFILE_TTL),
            news_cache: TtlCache::new(NEWS_TTL),
        })
    }

    /// Check if a refresh cycle is due.
    pub fn needs_refresh(&self) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => last.elapsed() >= self.refresh_interval,
        }
    }

    /// Run one refresh cycle: assemble an outcome for every ticker, in order.
    ///
    /// Never fails; per-ticker errors become `Failed` outcomes and the
    /// remaining tickers are still processed.
    pub async fn refresh(&mut self) {
        let tickers = self.tickers.clone();
        let mut outcomes = Vec::with_capacity(tickers.len());

        for ticker in &tickers {
            let outcome = match self.build_report(ticker).await {
                Ok(outcome) => outcome,
                Err(e) => TickerOutcome::Failed {
                    ticker: ticker.clone(),
                    message: format!("{:#}", e),
                },
            };
            outcomes.push(outcome);
        }

        self.outcomes = outcomes;
        self.last_refresh = Some(Instant::now());
        self.iteration += 1;

        self.history_cache.purge_expired();
        self.profile_cache.purge_expired();
        self.news_cache.purge_expired();
    }

    /// Assemble one ticker's report through the cached accessors.
    async fn build_report(&mut self, ticker: &str) -> Result<TickerOutcome> {
        let profile = self.profile_cached(ticker).await?;
        let history = self.history_cached(ticker, self.period).await?;

        if history.is_empty() {
            return Ok(TickerOutcome::NoData(ticker.to_string()));
        }

        // Day-over-day change needs a fresh 5-day series, not the chart range.
        let recent = self.history_cached(ticker, Period::FiveDays).await?;
        let daily_change = DailyChange::from_bars(&recent);

        let logo_url = match resolve_logo_url(&profile) {
            Some(url) if self.probe_logo(&url).await => Some(url),
            _ => None,
        };

        let news = self.news_cached(ticker).await;

        Ok(TickerOutcome::Report(TickerReport {
            ticker: ticker.to_string(),
            profile,
            history,
            logo_url,
            daily_change,
            news,
        }))
    }

    async fn profile_cached(&mut self, ticker: &str) -> Result<CompanyProfile> {
        if let Some(profile) = self.profile_cache.get(&ticker.to_string()) {
            return Ok(profile);
        }
        let profile = self.market.profile(ticker).await?;
        self.profile_cache.insert(ticker.to_string(), profile.clone());
        Ok(profile)
    }

    async fn history_cached(&mut self, ticker: &str, period: Period) -> Result<Vec<Bar>> {
        let key = (ticker.to_string(), period);
        if let Some(bars) = self.history_cache.get(&key) {
            return Ok(bars);
        }
        let bars = self.market.history(ticker, period).await?;
        self.history_cache.insert(key, bars.clone());
        Ok(bars)
    }

    async fn news_cached(&mut self, ticker: &str) -> Vec<NewsItem> {
        if let Some(items) = self.news_cache.get(&ticker.to_string()) {
            return items;
        }
        let items = self.news.fetch(ticker).await;
        self.news_cache.insert(ticker.to_string(), items.clone());
        items
    }

    /// Best-effort check that the logo resource responds. Failures are silent.
    async fn probe_logo(&self, url: &str) -> bool {
        match self.logo_client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Select the next ticker in the list.
    pub fn select_next(&mut self) {
        if !self.tickers.is_empty() {
            self.selected = (self.selected + 1) % self.tickers.len();
        }
    }

    /// Select the previous ticker in the list.
    pub fn select_prev(&mut self) {
        if !self.tickers.is_empty() {
            self.selected = (self.selected + self.tickers.len() - 1) % self.tickers.len();
        }
    }

    /// Switch between the glow and classic chart themes.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    /// Cycle the chart range; takes effect on the next refresh.
    pub fn cycle_period(&mut self) {
        self.period = self.period.next();
        self.force_refresh();
    }

    /// Force a refresh on the next tick.
    pub fn force_refresh(&mut self) {
        self.last_refresh = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Check if the loop should exit (quit requested or max cycles reached).
    pub fn should_quit(&self) -> bool {
        !self.running || (self.max_iterations > 0 && self.iteration >= self.max_iterations)
    }

    /// The outcome of the selected ticker, if a cycle has run.
    pub fn selected_outcome(&self) -> Option<&TickerOutcome> {
        self.outcomes.get(self.selected)
    }

    /// Time since the last refresh as a human readable string.
    pub fn time_since_refresh(&self) -> String {
        match self.last_refresh {
            Some(t) => {
                let elapsed = t.elapsed().as_secs();
                if elapsed < 60 {
                    format!("{}s ago", elapsed)
                } else {
                    format!("{}m ago", elapsed / 60)
                }
            }
            None => "never".to_string(),
        }
    }
}

/// Resolve a logo reference: prefer the provider's explicit field, else
/// derive a best-effort URL from the company website's domain.
pub fn resolve_logo_url(profile: &CompanyProfile) -> Option<String> {
    if let Some(ref url) = profile.logo_url {
        if !url.is_empty() {
            return Some(url.clone());
        }
    }

    let website = profile.website.as_deref()?;
    let domain = website
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .filter(|d| !d.is_empty())?;

    Some(format!("https://logo.clearbit.com/{}", domain))
}
