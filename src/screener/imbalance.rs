use crate::data::{Candle, CandleSeries, Polarity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Candles to skip past an imbalance's origin before a revisit counts as a
/// retest
pub const COUNT_SKIP_CANDLES: usize = 4;

/// Price gap left behind by a 3-candle directional run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imbalance {
    /// Timestamp of the first candle of the run
    pub origin_date: DateTime<Utc>,

    /// Open of the candle immediately preceding the run. Zero when the run
    /// starts the series and no such candle exists.
    pub price: Decimal,

    /// Whether later price action already came back through the level
    pub tested: bool,
}

/// Find every imbalance of one polarity in a candle snapshot
///
/// Algorithm:
/// 1. Label each candle by the polarity's color (green for buyer, red for
///    seller)
/// 2. Flag positions that start a 3-candle run of that color, reading
///    forward; the last two positions can never start a run
/// 3. Fold over the series carrying the previous open and the previous flag.
///    A false->true edge of the flag emits an imbalance priced at the
///    previous candle's open, dated at the run's first candle. A sustained
///    flag emits nothing, so a run longer than 3 candles yields exactly one
///    imbalance
/// 4. Mark the imbalance tested when any candle from 4 positions past the
///    origin strictly violates the level: a lower low for buyer polarity, a
///    higher high for seller. An empty forward window leaves it untested
pub fn detect(series: &CandleSeries, polarity: Polarity) -> Vec<Imbalance> {
    let candles = series.candles();
    if candles.len() < 3 {
        return Vec::new();
    }

    // 1. + 2. forward-looking run flags
    let colored: Vec<bool> = candles.iter().map(|c| polarity.matches(c)).collect();
    let starts_run: Vec<bool> = (0..candles.len())
        .map(|i| i + 2 < candles.len() && colored[i] && colored[i + 1] && colored[i + 2])
        .collect();

    // 3. rising-edge fold
    let (_, _, imbalances) = candles.iter().zip(starts_run).enumerate().fold(
        (Decimal::ZERO, false, Vec::new()),
        |(previous_open, previous_flag, mut found), (index, (candle, flag))| {
            if flag && !previous_flag {
                found.push(Imbalance {
                    origin_date: candle.timestamp,
                    price: previous_open,
                    tested: is_tested(candles, index, previous_open, polarity),
                });
            }
            (candle.open, flag, found)
        },
    );

    imbalances
}

// 4. strict violation scan over [origin + COUNT_SKIP_CANDLES, end)
fn is_tested(candles: &[Candle], origin: usize, price: Decimal, polarity: Polarity) -> bool {
    let from = origin + COUNT_SKIP_CANDLES;
    if from >= candles.len() {
        return false;
    }

    match polarity {
        Polarity::Buyer => candles[from..].iter().any(|c| c.low < price),
        Polarity::Seller => candles[from..].iter().any(|c| c.high > price),
    }
}
