pub mod asset;
pub mod candle;
pub mod report;

pub use asset::{AssetList, AssetRecord};
pub use candle::{Candle, CandleSeries, Polarity, SeriesError, Timeframe};
pub use report::{ImbalanceSummary, ReportTable};
