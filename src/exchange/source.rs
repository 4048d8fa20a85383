use crate::data::{CandleSeries, SeriesError, Timeframe};
use async_trait::async_trait;
use thiserror::Error;

/// Failure while fetching one OHLC snapshot
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no base url configured for exchange {0}")]
    UnsupportedExchange(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("exchange returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed kline payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Source of OHLC candle snapshots
///
/// One call fetches the most recent `limit` candles for an asset on a venue.
/// The screening pipeline only depends on this trait, so tests can script a
/// source without a network.
#[async_trait]
pub trait OhlcSource {
    async fn fetch(
        &self,
        exchange: &str,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> Result<CandleSeries, DownloadError>;
}
