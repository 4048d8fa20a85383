use crate::data::asset::AssetRecord;
use crate::data::candle::{Polarity, Timeframe};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Nearest-untested imbalance for one asset, timeframe and polarity
///
/// `date` and `price` are empty when no untested imbalance exists; the
/// distance then falls back to the polarity's sentinel value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImbalanceSummary {
    pub date: Option<DateTime<Utc>>,
    pub price: Option<Decimal>,
    pub distance: Decimal,
}

impl ImbalanceSummary {
    pub fn found(date: DateTime<Utc>, price: Decimal, distance: Decimal) -> Self {
        Self {
            date: Some(date),
            price: Some(price),
            distance,
        }
    }

    /// Sentinel summary: no untested imbalance on this timeframe
    pub fn missing(polarity: Polarity) -> Self {
        Self {
            date: None,
            price: None,
            distance: polarity.sentinel_distance(),
        }
    }
}

/// One polarity's report: a header plus one row per input asset
///
/// Rows are plain strings ready for the CSV writer. Header layout: the asset
/// columns as read, then LastPrice and LastDate, then a date/price/%distance
/// block per timeframe in report order (4h, M, W, D).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(asset_columns: &[String], polarity: Polarity) -> Self {
        let mut header = asset_columns.to_vec();
        header.push("LastPrice".to_string());
        header.push("LastDate".to_string());

        for timeframe in Timeframe::REPORT_ORDER {
            let prefix = polarity.column_prefix();
            let label = timeframe.label();
            header.push(format!("{prefix}_{label} date"));
            header.push(format!("{prefix}_{label} price"));
            header.push(format!("{prefix}_{label} %distance"));
        }

        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Append a fully screened asset. Summaries must follow report order.
    pub fn push_screened(
        &mut self,
        asset: &AssetRecord,
        last_price: Decimal,
        last_date: DateTime<Utc>,
        summaries: &[ImbalanceSummary; 4],
    ) {
        let mut row = asset.values().to_vec();
        row.push(display_price(last_price));
        row.push(display_date(last_date));

        for summary in summaries {
            row.push(summary.date.map(display_date).unwrap_or_default());
            row.push(summary.price.map(display_price).unwrap_or_default());
            row.push(display_price(summary.distance));
        }

        self.rows.push(row);
    }

    /// Append a failed asset: original columns only, everything else empty
    pub fn push_degraded(&mut self, asset: &AssetRecord) {
        let mut row = asset.values().to_vec();
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by column name, for tests and spot checks
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.header.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }
}

fn display_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn display_price(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn asset() -> AssetRecord {
        AssetRecord::new(
            "BTCUSDT",
            "binance",
            vec!["BTCUSDT".into(), "binance".into(), "L1".into()],
        )
    }

    fn asset_columns() -> Vec<String> {
        vec!["Asset".into(), "Exchange".into(), "Tier".into()]
    }

    fn date(day: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(day * 86_400, 0).unwrap()
    }

    #[test]
    fn test_buyer_header_layout() {
        let table = ReportTable::new(&asset_columns(), Polarity::Buyer);

        assert_eq!(
            table.header(),
            [
                "Asset",
                "Exchange",
                "Tier",
                "LastPrice",
                "LastDate",
                "IMB_BUY_4h date",
                "IMB_BUY_4h price",
                "IMB_BUY_4h %distance",
                "IMB_BUY_M date",
                "IMB_BUY_M price",
                "IMB_BUY_M %distance",
                "IMB_BUY_W date",
                "IMB_BUY_W price",
                "IMB_BUY_W %distance",
                "IMB_BUY_D date",
                "IMB_BUY_D price",
                "IMB_BUY_D %distance",
            ]
        );
    }

    #[test]
    fn test_seller_header_uses_sell_prefix() {
        let table = ReportTable::new(&asset_columns(), Polarity::Seller);

        assert!(table.header().iter().any(|c| c == "IMB_SELL_4h date"));
        assert!(table.header().iter().all(|c| !c.starts_with("IMB_BUY_")));
    }

    #[test]
    fn test_screened_row_cells() {
        let mut table = ReportTable::new(&asset_columns(), Polarity::Buyer);
        let summaries = [
            ImbalanceSummary::found(date(3), dec!(25000.50), dec!(0.05)),
            ImbalanceSummary::missing(Polarity::Buyer),
            ImbalanceSummary::missing(Polarity::Buyer),
            ImbalanceSummary::found(date(7), dec!(26000), dec!(0.10)),
        ];

        table.push_screened(&asset(), dec!(27123.40000000), date(10), &summaries);

        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "Asset"), Some("BTCUSDT"));
        assert_eq!(table.cell(0, "LastPrice"), Some("27123.4"));
        assert_eq!(table.cell(0, "LastDate"), Some("1970-01-11 00:00:00"));
        assert_eq!(table.cell(0, "IMB_BUY_4h price"), Some("25000.5"));
        assert_eq!(table.cell(0, "IMB_BUY_4h %distance"), Some("0.05"));
        assert_eq!(table.cell(0, "IMB_BUY_M date"), Some(""));
        assert_eq!(table.cell(0, "IMB_BUY_M %distance"), Some("1"));
        assert_eq!(table.cell(0, "IMB_BUY_D %distance"), Some("0.1"));
    }

    #[test]
    fn test_degraded_row_keeps_only_asset_columns() {
        let mut table = ReportTable::new(&asset_columns(), Polarity::Seller);
        table.push_degraded(&asset());

        let row = &table.rows()[0];
        assert_eq!(row.len(), table.header().len());
        assert_eq!(&row[..3], ["BTCUSDT", "binance", "L1"]);
        assert!(row[3..].iter().all(String::is_empty));
    }

    #[test]
    fn test_missing_summary_sentinels() {
        assert_eq!(ImbalanceSummary::missing(Polarity::Buyer).distance, dec!(1));
        assert_eq!(ImbalanceSummary::missing(Polarity::Seller).distance, dec!(-1));
        assert!(ImbalanceSummary::missing(Polarity::Buyer).date.is_none());
        assert!(ImbalanceSummary::missing(Polarity::Buyer).price.is_none());
    }
}
