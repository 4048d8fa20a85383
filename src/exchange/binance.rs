use crate::data::{Candle, CandleSeries, Timeframe};
use crate::exchange::rate_limit::RateLimiter;
use crate::exchange::source::{DownloadError, OhlcSource};
use crate::utils::config::DownloaderConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Raw kline entry from the public klines endpoint
///
/// Wire layout: [open time ms, open, high, low, close, volume, close time ms,
/// quote volume, trade count, taker base volume, taker quote volume, ignore].
/// Prices arrive as strings. Only the time and OHLC fields are read; the rest
/// must still be present for the row to deserialize.
#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct RawKline(
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    i64,
    String,
    String,
    String,
);

impl RawKline {
    pub fn to_candle(&self) -> Result<Candle, DownloadError> {
        let timestamp = Utc
            .timestamp_millis_opt(self.0)
            .single()
            .ok_or_else(|| DownloadError::Payload(format!("bad open time: {}", self.0)))?;

        Ok(Candle {
            timestamp,
            open: parse_price(&self.1)?,
            high: parse_price(&self.2)?,
            low: parse_price(&self.3)?,
            close: parse_price(&self.4)?,
        })
    }
}

fn parse_price(raw: &str) -> Result<Decimal, DownloadError> {
    raw.parse::<Decimal>()
        .map_err(|_| DownloadError::Payload(format!("bad price: {raw}")))
}

/// OHLC snapshot downloader over Binance-compatible REST venues
///
/// Every request passes through one rate limiter, so a multi-asset screening
/// run stays under the venue's request-weight limits without coordination
/// from callers.
pub struct KlineDownloader {
    client: Client,
    base_urls: HashMap<String, Url>,
    rate_limiter: RateLimiter,
}

impl KlineDownloader {
    /// # Arguments
    /// * `base_urls` - venue name (matched case-insensitively) to API base URL
    /// * `rate_delay` - minimum delay between consecutive requests
    /// * `timeout` - per-request timeout
    pub fn new(base_urls: HashMap<String, Url>, rate_delay: Duration, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        let base_urls = base_urls
            .into_iter()
            .map(|(name, url)| (name.to_lowercase(), url))
            .collect();

        Self {
            client,
            base_urls,
            rate_limiter: RateLimiter::new(rate_delay),
        }
    }

    pub fn from_config(config: &DownloaderConfig) -> Result<Self> {
        let mut base_urls = HashMap::new();
        for (exchange, raw) in &config.exchanges {
            let url = Url::parse(raw)
                .with_context(|| format!("Invalid base url for exchange {exchange}: {raw}"))?;
            base_urls.insert(exchange.clone(), url);
        }

        Ok(Self::new(
            base_urls,
            Duration::from_millis(config.rate_delay_ms),
            Duration::from_secs(config.timeout_secs),
        ))
    }
}

#[async_trait]
impl OhlcSource for KlineDownloader {
    async fn fetch(
        &self,
        exchange: &str,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> Result<CandleSeries, DownloadError> {
        let base = self
            .base_urls
            .get(&exchange.to_lowercase())
            .ok_or_else(|| DownloadError::UnsupportedExchange(exchange.to_string()))?;

        let mut url = base.join("api/v3/klines")?;
        url.query_pairs_mut()
            .append_pair("symbol", symbol)
            .append_pair("interval", timeframe.code())
            .append_pair("limit", &limit.to_string());

        self.rate_limiter.acquire().await;
        debug!(%url, "Requesting klines");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DownloadError::Status { status, body });
        }

        let klines = response.json::<Vec<RawKline>>().await?;
        let candles = klines
            .iter()
            .map(RawKline::to_candle)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CandleSeries::new(candles)?)
    }
}
