//! Configuration file handling with TOML support.
//!
//! CLI flags win over the config file; the file is useful for a persistent
//! watchlist and the news credential.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Watchlist tickers
    #[serde(default)]
    pub watchlist: WatchlistConfig,

    /// News provider settings
    #[serde(default)]
    pub news: NewsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    /// Refresh interval in seconds
    #[serde(default)]
    pub refresh: Option<u64>,

    /// Market API timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Style palette file path
    #[serde(default)]
    pub style: Option<PathBuf>,
}

/// Watchlist configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WatchlistConfig {
    /// Tickers to display
    #[serde(default)]
    pub tickers: Vec<String>,
}

/// News provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewsConfig {
    /// API credential; the news section is disabled without one
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the default location, or fall back to defaults.
    pub fn load_or_default() -> Self {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to load config: {}", e);
                    }
                }
            }
        }
        Config::default()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("neonquotes").join("config.toml"))
    }

    /// Watchlist as a comma-separated string, for merging with the CLI flag.
    pub fn tickers_string(&self) -> Option<String> {
        if self.watchlist.tickers.is_empty() {
            None
        } else {
            Some(self.watchlist.tickers.join(","))
        }
    }
}

/// Generate a sample configuration file content.
pub fn sample_config() -> &'static str {
    r##"# Neonquotes Configuration File

[general]
# Auto-refresh interval in seconds (10-300)
refresh = 60
# Market API timeout in seconds
timeout = 30
# Style palette file
style = "themes/cyberpunk.toml"

[watchlist]
# Tickers to display
tickers = ["AAPL", "TSLA", "NVDA"]

[news]
# Finnhub API credential; without one the news section shows a placeholder
# token = "your-token-here"
"##
}
