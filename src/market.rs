//! Yahoo Finance client for historical bars and company profiles.

use crate::models::{Bar, CompanyProfile, Period};
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

/// Pretending to be a real browser because Yahoo has trust issues.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// A failed market-data call. Surfaces as an inline per-ticker error.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("{endpoint} request for {ticker} failed: {source}")]
    Request {
        endpoint: &'static str,
        ticker: String,
        source: reqwest::Error,
    },
    #[error("{endpoint} request for {ticker} returned {status}")]
    Status {
        endpoint: &'static str,
        ticker: String,
        status: StatusCode,
    },
    #[error("could not parse {endpoint} response for {ticker}: {source}")]
    Parse {
        endpoint: &'static str,
        ticker: String,
        source: reqwest::Error,
    },
}

/// Read-only market-data client. One attempt per call, no retries; the
/// per-ticker handler upstream decides what a failure means.
pub struct MarketClient {
    client: Client,
}

impl MarketClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch daily OHLCV bars for the given range.
    ///
    /// An empty series is a valid result meaning "no data available".
    pub async fn history(&self, ticker: &str, period: Period) -> Result<Vec<Bar>, MarketError> {
        let url = format!(
            "{}/{}?range={}&interval=1d",
            CHART_URL,
            urlencoding::encode(ticker),
            period.as_str()
        );

        let data: ChartResponse = self.get_json("history", ticker, &url).await?;
        Ok(data.into_bars())
    }

    /// Fetch company metadata. Absent provider fields stay `None`.
    pub async fn profile(&self, ticker: &str) -> Result<CompanyProfile, MarketError> {
        let url = format!(
            "{}/{}?modules=assetProfile,price,summaryDetail",
            SUMMARY_URL,
            urlencoding::encode(ticker)
        );

        let data: SummaryResponse = self.get_json("profile", ticker, &url).await?;
        Ok(data.into_profile())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        ticker: &str,
        url: &str,
    ) -> Result<T, MarketError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| MarketError::Request {
                    endpoint,
                    ticker: ticker.to_string(),
                    source,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                endpoint,
                ticker: ticker.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| MarketError::Parse {
            endpoint,
            ticker: ticker.to_string(),
            source,
        })
    }
}

// Yahoo Finance response structures

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    result: Option<Vec<ChartData>>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteArrays>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteArrays {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl ChartResponse {
    fn into_bars(self) -> Vec<Bar> {
        let Some(data) = self.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }) else {
            return Vec::new();
        };

        let Some(quote) = data.indicators.quote.into_iter().next() else {
            return Vec::new();
        };

        let mut bars = Vec::with_capacity(data.timestamp.len());
        for (i, ts) in data.timestamp.iter().enumerate() {
            // The provider pads untraded buckets with nulls; skip those rows.
            let (Some(open), Some(high), Some(low), Some(close)) = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
            ) else {
                continue;
            };

            let chrono::LocalResult::Single(timestamp) = Utc.timestamp_opt(*ts, 0) else {
                continue;
            };

            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        bars
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    #[serde(default)]
    result: Option<Vec<SummaryModules>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryModules {
    #[serde(default)]
    asset_profile: Option<AssetProfile>,
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    long_business_summary: Option<String>,
    #[serde(default)]
    logo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    regular_market_price: Option<WrappedValue>,
    #[serde(default)]
    market_cap: Option<WrappedValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(default)]
    fifty_two_week_high: Option<WrappedValue>,
    #[serde(default)]
    fifty_two_week_low: Option<WrappedValue>,
}

/// Yahoo wraps numbers as `{"raw": 123.4, "fmt": "123.40"}`.
#[derive(Debug, Default, Deserialize)]
struct WrappedValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl WrappedValue {
    fn value(&self) -> Option<f64> {
        self.raw
    }
}

impl SummaryResponse {
    fn into_profile(self) -> CompanyProfile {
        let Some(modules) = self.quote_summary.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }) else {
            return CompanyProfile::default();
        };

        let asset = modules.asset_profile.unwrap_or_default();
        let price = modules.price.unwrap_or_default();
        let detail = modules.summary_detail.unwrap_or_default();

        CompanyProfile {
            name: price.short_name.or(price.long_name),
            sector: asset.sector,
            industry: asset.industry,
            website: asset.website,
            logo_url: asset.logo_url,
            price: price.regular_market_price.as_ref().and_then(WrappedValue::value),
            market_cap: price
                .market_cap
                .as_ref()
                .and_then(WrappedValue::value)
                .map(|v| v as u64),
            year_high: detail.fifty_two_week_high.as_ref().and_then(WrappedValue::value),
            year_low: detail.fifty_two_week_low.as_ref().and_then(WrappedValue::value),
            summary: asset.long_business_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chart_response() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700086400],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, 101.5],
                            "high": [102.0, 103.0],
                            "low": [99.0, 100.5],
                            "close": [101.0, 102.5],
                            "volume": [1000000, 1200000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = response.into_bars();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 101.0);
        assert_eq!(bars[1].volume, 1_200_000);
    }

    #[test]
    fn test_parse_chart_skips_null_rows() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700086400, 1700172800],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, null, 102.0],
                            "high": [102.0, null, 104.0],
                            "low": [99.0, null, 101.0],
                            "close": [101.0, null, 103.0],
                            "volume": [1000000, null, 900000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = response.into_bars();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 103.0);
    }

    #[test]
    fn test_parse_chart_empty_result() {
        let json = r#"{"chart": {"result": null, "error": null}}"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_bars().is_empty());
    }

    #[test]
    fn test_parse_profile() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "assetProfile": {
                        "sector": "Technology",
                        "industry": "Consumer Electronics",
                        "website": "https://www.apple.com",
                        "longBusinessSummary": "Designs, manufactures..."
                    },
                    "price": {
                        "shortName": "Apple Inc.",
                        "regularMarketPrice": {"raw": 189.95, "fmt": "189.95"},
                        "marketCap": {"raw": 2950000000000.0, "fmt": "2.95T"}
                    },
                    "summaryDetail": {
                        "fiftyTwoWeekHigh": {"raw": 199.62},
                        "fiftyTwoWeekLow": {"raw": 124.17}
                    }
                }],
                "error": null
            }
        }"#;

        let response: SummaryResponse = serde_json::from_str(json).unwrap();
        let profile = response.into_profile();
        assert_eq!(profile.name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.price, Some(189.95));
        assert_eq!(profile.market_cap, Some(2_950_000_000_000));
        assert_eq!(profile.year_low, Some(124.17));
        assert!(profile.logo_url.is_none());
    }

    #[test]
    fn test_parse_profile_missing_modules() {
        let json = r#"{"quoteSummary": {"result": [{}], "error": null}}"#;
        let response: SummaryResponse = serde_json::from_str(json).unwrap();
        let profile = response.into_profile();
        assert!(profile.name.is_none());
        assert!(profile.price.is_none());
    }
}
