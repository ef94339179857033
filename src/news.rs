//! Company news client for a 30-day trailing headline window.
//!
//! All failures here are swallowed: a network error, timeout, non-200 status
//! or parse error yields an empty list and the dashboard shows a placeholder.

use crate::models::NewsItem;
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const NEWS_URL: &str = "https://finnhub.io/api/v1/company-news";
const NEWS_TIMEOUT: Duration = Duration::from_secs(10);

/// How many days back the headline window reaches.
const NEWS_WINDOW_DAYS: i64 = 30;

/// News search client. The credential comes from configuration; without one
/// every fetch resolves to an empty list.
pub struct NewsClient {
    client: Client,
    token: Option<String>,
}

impl NewsClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(NEWS_TIMEOUT)
            .build()
            .context("Failed to create news HTTP client")?;

        Ok(Self { client, token })
    }

    /// Fetch headlines for the trailing 30-day window ending today.
    ///
    /// Never fails: any error resolves to an empty list.
    pub async fn fetch(&self, ticker: &str) -> Vec<NewsItem> {
        let Some(ref token) = self.token else {
            return Vec::new();
        };

        let today = Utc::now().date_naive();
        let from = today - chrono::Duration::days(NEWS_WINDOW_DAYS);

        let request = self.client.get(NEWS_URL).query(&[
            ("symbol", ticker),
            ("from", &from.format("%Y-%m-%d").to_string()),
            ("to", &today.format("%Y-%m-%d").to_string()),
            ("token", token),
        ]);

        let Ok(response) = request.send().await else {
            return Vec::new();
        };

        if !response.status().is_success() {
            return Vec::new();
        }

        let Ok(raw) = response.json::<Vec<RawArticle>>().await else {
            return Vec::new();
        };

        filter_articles(raw)
    }
}

/// Provider article shape; every field may be missing.
#[derive(Debug, Default, Deserialize)]
struct RawArticle {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    datetime: Option<i64>,
}

/// Keep only articles with a non-empty headline and url, in provider order.
fn filter_articles(raw: Vec<RawArticle>) -> Vec<NewsItem> {
    raw.into_iter()
        .filter_map(|a| {
            let headline = a.headline.filter(|h| !h.is_empty())?;
            let url = a.url.filter(|u| !u.is_empty())?;
            Some(NewsItem {
                headline,
                url,
                source: a.source.unwrap_or_else(|| "Unknown".to_string()),
                datetime: a.datetime.unwrap_or(0),
            })
        })
        .collect()
}

/// The first `limit` items in provider order, for display.
pub fn top_headlines(items: &[NewsItem], limit: usize) -> &[NewsItem] {
    &items[..items.len().min(limit)]
}
