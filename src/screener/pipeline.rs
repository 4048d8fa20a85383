use crate::data::{
    AssetList, AssetRecord, CandleSeries, ImbalanceSummary, Polarity, ReportTable, Timeframe,
};
use crate::exchange::source::{DownloadError, OhlcSource};
use crate::screener::aggregator::nearest_untested;
use crate::utils::config::HistoryConfig;
use crate::utils::LOG_SEPARATOR;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info};

/// Why one asset dropped out of a screening run
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("download failed for {symbol} {timeframe}: {source}")]
    Download {
        symbol: String,
        timeframe: Timeframe,
        #[source]
        source: DownloadError,
    },

    #[error("computation failed for {symbol}: {reason}")]
    Computation { symbol: String, reason: String },
}

/// Both polarity reports of one screening run
#[derive(Debug)]
pub struct ScreenReports {
    pub buyer: ReportTable,
    pub seller: ReportTable,
}

/// Everything computed for one successfully screened asset.
/// Summaries follow report order: 4h, M, W, D.
struct ScreenedAsset {
    last_price: Decimal,
    last_date: DateTime<Utc>,
    buyer: [ImbalanceSummary; 4],
    seller: [ImbalanceSummary; 4],
}

/// Multi-timeframe imbalance screening over an asset list
///
/// Assets are processed strictly in input order, one at a time, so every
/// download shares the source's rate limiter. A failed asset is logged,
/// contributes a bare row to both reports and never aborts the run; the
/// output row count always matches the input.
pub struct ImbalanceScreener<S> {
    source: S,
    history: HistoryConfig,
}

impl<S: OhlcSource> ImbalanceScreener<S> {
    pub fn new(source: S, history: HistoryConfig) -> Self {
        Self { source, history }
    }

    pub async fn run(&self, assets: &AssetList) -> ScreenReports {
        info!("{LOG_SEPARATOR}");
        info!("Start crypto imbalance screening step");
        info!("{LOG_SEPARATOR}");

        let mut buyer = ReportTable::new(assets.columns(), Polarity::Buyer);
        let mut seller = ReportTable::new(assets.columns(), Polarity::Seller);

        let total = assets.len();
        let mut failed = 0usize;

        for (index, asset) in assets.iter().enumerate() {
            info!("Process asset - {} ({}/{})", asset.symbol, index + 1, total);

            match self.screen_asset(asset).await {
                Ok(screened) => {
                    buyer.push_screened(asset, screened.last_price, screened.last_date, &screened.buyer);
                    seller.push_screened(asset, screened.last_price, screened.last_date, &screened.seller);
                }
                Err(err) => {
                    failed += 1;
                    error!("Problem with compute imbalance on coin {}: {err:#}", asset.symbol);
                    buyer.push_degraded(asset);
                    seller.push_degraded(asset);
                }
            }
        }

        info!(
            "Finished crypto imbalance screening step: {} screened, {} failed",
            total - failed,
            failed
        );
        info!("{LOG_SEPARATOR}");

        ScreenReports { buyer, seller }
    }

    /// One asset's walk through Downloading and Computing; any error is the
    /// Failed terminal state folded into the reports by the caller
    async fn screen_asset(&self, asset: &AssetRecord) -> Result<ScreenedAsset, ScreenError> {
        let four_hours = self.download(asset, Timeframe::FourHours).await?;
        let daily = self.download(asset, Timeframe::Daily).await?;
        let weekly = self.download(asset, Timeframe::Weekly).await?;
        let monthly = self.download(asset, Timeframe::Monthly).await?;

        // Last price and date come from the daily snapshot
        let last = daily.last().ok_or_else(|| ScreenError::Computation {
            symbol: asset.symbol.clone(),
            reason: "empty daily series".to_string(),
        })?;
        let last_price = last.close;
        let last_date = last.timestamp;

        if last_price <= Decimal::ZERO {
            return Err(ScreenError::Computation {
                symbol: asset.symbol.clone(),
                reason: format!("non-positive last price {last_price}"),
            });
        }

        let ordered = [&four_hours, &monthly, &weekly, &daily];
        let buyer = ordered.map(|series| nearest_untested(series, Polarity::Buyer, last_price));
        let seller = ordered.map(|series| nearest_untested(series, Polarity::Seller, last_price));

        Ok(ScreenedAsset {
            last_price,
            last_date,
            buyer,
            seller,
        })
    }

    async fn download(
        &self,
        asset: &AssetRecord,
        timeframe: Timeframe,
    ) -> Result<CandleSeries, ScreenError> {
        let limit = self.history.candle_count(timeframe);
        self.source
            .fetch(&asset.exchange, &asset.symbol, timeframe, limit)
            .await
            .map_err(|source| ScreenError::Download {
                symbol: asset.symbol.clone(),
                timeframe,
                source,
            })
    }
}
