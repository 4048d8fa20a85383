use crate::data::Timeframe;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub screener: ScreenerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    pub downloader: DownloaderConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    pub enable: bool,
    pub assets_path: String,
    pub buyer_report_path: String,
    pub seller_report_path: String,
}

/// Candles requested per timeframe snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub four_hours: u32,
    pub daily: u32,
    pub weekly: u32,
    pub monthly: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            four_hours: 300,
            daily: 300,
            weekly: 200,
            monthly: 100,
        }
    }
}

impl HistoryConfig {
    pub fn candle_count(&self, timeframe: Timeframe) -> u32 {
        match timeframe {
            Timeframe::FourHours => self.four_hours,
            Timeframe::Daily => self.daily,
            Timeframe::Weekly => self.weekly,
            Timeframe::Monthly => self.monthly,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Minimum spacing between exchange requests
    #[serde(default = "default_rate_delay_ms")]
    pub rate_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Exchange name to REST base URL
    pub exchanges: HashMap<String, String>,
}

fn default_rate_delay_ms() -> u64 {
    3_000
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub enable: bool,
    pub database_path: String,
    pub buyer_processed_path: String,
    pub seller_processed_path: String,
    pub buyer_interest_path: String,
    pub seller_interest_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from environment variable or default path
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config/screener.toml".to_string());
        Self::from_file(path)
    }
}
