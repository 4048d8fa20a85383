use crate::data::{AssetList, AssetRecord, ReportTable};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

/// Read the input universe from a CSV file.
///
/// `Asset` and `Exchange` columns are required; any other columns ride along
/// unchanged and reappear in the reports.
pub fn read_asset_list<P: AsRef<Path>>(path: P) -> Result<AssetList> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading asset list {}", path.display()))?;

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let asset_index = require_column(&columns, "Asset", path)?;
    let exchange_index = require_column(&columns, "Exchange", path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("reading asset list {}", path.display()))?;
        let values: Vec<String> = row.iter().map(str::to_string).collect();
        records.push(AssetRecord::new(
            values[asset_index].clone(),
            values[exchange_index].clone(),
            values,
        ));
    }

    info!("Loaded {} assets from {}", records.len(), path.display());
    Ok(AssetList::new(columns, records))
}

fn require_column(columns: &[String], name: &str, path: &Path) -> Result<usize> {
    match columns.iter().position(|c| c == name) {
        Some(index) => Ok(index),
        None => bail!(
            "asset list {} is missing the required column {name}",
            path.display()
        ),
    }
}

/// Write one polarity's report, creating parent directories as needed
pub fn write_report<P: AsRef<Path>>(path: P, table: &ReportTable) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("writing report {}", path.display()))?;
    writer.write_record(table.header())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Read any CSV as a header plus string rows, for database loading
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading table {}", path.display()))?;

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("reading table {}", path.display()))?;
        rows.push(row.iter().map(str::to_string).collect());
    }

    Ok((header, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Polarity;
    use tempfile::tempdir;

    #[test]
    fn test_read_asset_list_keeps_extra_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.csv");
        std::fs::write(
            &path,
            "Asset,Exchange,Tier\nBTCUSDT,binance,L1\nETHUSDT,binance,L1\n",
        )
        .unwrap();

        let assets = read_asset_list(&path).unwrap();

        assert_eq!(assets.columns(), ["Asset", "Exchange", "Tier"]);
        assert_eq!(assets.len(), 2);
        assert_eq!(assets.records()[0].symbol, "BTCUSDT");
        assert_eq!(assets.records()[0].exchange, "binance");
        assert_eq!(assets.records()[1].values(), ["ETHUSDT", "binance", "L1"]);
    }

    #[test]
    fn test_read_asset_list_accepts_shuffled_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.csv");
        std::fs::write(&path, "Exchange,Asset\nbinance,SOLUSDT\n").unwrap();

        let assets = read_asset_list(&path).unwrap();

        assert_eq!(assets.records()[0].symbol, "SOLUSDT");
        assert_eq!(assets.records()[0].exchange, "binance");
    }

    #[test]
    fn test_read_asset_list_requires_exchange_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.csv");
        std::fs::write(&path, "Asset\nBTCUSDT\n").unwrap();

        let err = read_asset_list(&path).unwrap_err();

        assert!(err.to_string().contains("Exchange"));
    }

    #[test]
    fn test_write_report_round_trips_through_read_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("buyer.csv");

        let columns = vec!["Asset".to_string(), "Exchange".to_string()];
        let mut table = ReportTable::new(&columns, Polarity::Buyer);
        table.push_degraded(&AssetRecord::new(
            "BTCUSDT",
            "binance",
            vec!["BTCUSDT".into(), "binance".into()],
        ));
        write_report(&path, &table).unwrap();

        let (header, rows) = read_table(&path).unwrap();

        assert_eq!(header, table.header());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "BTCUSDT");
        assert!(rows[0][2..].iter().all(String::is_empty));
    }
}
