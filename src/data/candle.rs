use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Single OHLC candle
///
/// Prices are exact decimals - never use f64 for price levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time of the candle interval (UTC)
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Candle {
    /// Bullish candle: close above open
    pub fn is_green(&self) -> bool {
        self.close > self.open
    }

    /// Bearish candle: open above close
    pub fn is_red(&self) -> bool {
        self.open > self.close
    }
}

/// Detection direction. Buyer imbalances are support levels left below price,
/// seller imbalances are resistance levels left above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Buyer,
    Seller,
}

impl Polarity {
    /// Candle color that feeds this polarity's run detection
    pub fn matches(&self, candle: &Candle) -> bool {
        match self {
            Polarity::Buyer => candle.is_green(),
            Polarity::Seller => candle.is_red(),
        }
    }

    /// Column prefix in the report tables
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Polarity::Buyer => "IMB_BUY",
            Polarity::Seller => "IMB_SELL",
        }
    }

    /// %distance reported when no untested imbalance exists.
    /// Keeps the sign convention: buyer distances are positive discounts,
    /// seller distances are negative.
    pub fn sentinel_distance(&self) -> Decimal {
        match self {
            Polarity::Buyer => Decimal::ONE,
            Polarity::Seller => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Candle aggregation period the screener operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    FourHours,
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    /// Column order of the timeframe blocks in the report tables
    pub const REPORT_ORDER: [Timeframe; 4] = [
        Timeframe::FourHours,
        Timeframe::Monthly,
        Timeframe::Weekly,
        Timeframe::Daily,
    ];

    /// Interval code on the exchange wire
    pub fn code(&self) -> &'static str {
        match self {
            Timeframe::FourHours => "4h",
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1w",
            Timeframe::Monthly => "1M",
        }
    }

    /// Short label used in report column names
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::FourHours => "4h",
            Timeframe::Daily => "D",
            Timeframe::Weekly => "W",
            Timeframe::Monthly => "M",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Series construction failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("candle timestamps not strictly ascending at index {index}: {current} >= {next}")]
    OutOfOrder {
        index: usize,
        current: DateTime<Utc>,
        next: DateTime<Utc>,
    },
}

/// Time-ordered snapshot of candles for one asset and timeframe
///
/// Timestamps are strictly ascending (validated at construction). Calendar
/// gaps are allowed; positions are contiguous sequence indices, not calendar
/// slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesError> {
        for (index, pair) in candles.windows(2).enumerate() {
            if pair[0].timestamp >= pair[1].timestamp {
                return Err(SeriesError::OutOfOrder {
                    index,
                    current: pair[0].timestamp,
                    next: pair[1].timestamp,
                });
            }
        }
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle of the snapshot
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }
}
