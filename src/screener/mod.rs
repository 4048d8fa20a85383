pub mod aggregator;
pub mod imbalance;
pub mod pipeline;

pub use aggregator::nearest_untested;
pub use imbalance::{detect, Imbalance, COUNT_SKIP_CANDLES};
pub use pipeline::{ImbalanceScreener, ScreenError, ScreenReports};
