pub mod binance;
pub mod rate_limit;
pub mod source;

pub use binance::KlineDownloader;
pub use rate_limit::RateLimiter;
pub use source::{DownloadError, OhlcSource};
