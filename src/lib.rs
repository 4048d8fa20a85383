pub mod data;
pub mod exchange;
pub mod screener;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use data::{
    AssetList, AssetRecord, Candle, CandleSeries, ImbalanceSummary, Polarity, ReportTable,
    SeriesError, Timeframe,
};
pub use exchange::{DownloadError, KlineDownloader, OhlcSource, RateLimiter};
pub use screener::{
    detect, nearest_untested, Imbalance, ImbalanceScreener, ScreenError, ScreenReports,
};
pub use storage::{load_report_files, read_asset_list, write_report, ReportStore};
pub use utils::Config;
