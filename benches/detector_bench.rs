use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use imbalance_screener::data::{Candle, CandleSeries, Polarity};
use imbalance_screener::screener::{detect, nearest_untested};
use rust_decimal::Decimal;

/// Synthetic series with runs of both colors scattered through it
fn synthetic_series(len: usize) -> CandleSeries {
    let mut candles = Vec::with_capacity(len);
    let mut price: i64 = 1_000;
    for i in 0..len {
        // Three up, one down, three down, one up per cycle
        let delta: i64 = match i % 8 {
            0..=2 => 5,
            3 => -3,
            4..=6 => -5,
            _ => 3,
        };
        let open = Decimal::from(price);
        let close = Decimal::from(price + delta);
        candles.push(Candle {
            timestamp: Utc.timestamp_opt(i as i64 * 14_400, 0).unwrap(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
        });
        price += delta;
    }
    CandleSeries::new(candles).unwrap()
}

/// Benchmark imbalance detection across snapshot sizes.
/// The retest scan makes this quadratic in the worst case.
fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_imbalances");

    for len in [100, 1_000, 10_000] {
        let series = synthetic_series(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &series, |b, series| {
            b.iter(|| {
                black_box(detect(black_box(series), Polarity::Buyer));
                black_box(detect(black_box(series), Polarity::Seller));
            });
        });
    }
    group.finish();
}

/// Benchmark one full timeframe summary at the default snapshot size
fn bench_nearest_untested(c: &mut Criterion) {
    let series = synthetic_series(300);
    let last_price = series.last().unwrap().close;

    c.bench_function("nearest_untested_300", |b| {
        b.iter(|| {
            black_box(nearest_untested(
                black_box(&series),
                Polarity::Buyer,
                last_price,
            ));
        });
    });
}

criterion_group!(benches, bench_detect, bench_nearest_untested);
criterion_main!(benches);
