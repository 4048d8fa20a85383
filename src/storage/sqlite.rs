use crate::storage::csv::read_table;
use crate::utils::config::StorageConfig;
use crate::utils::LOG_SEPARATOR;
use anyhow::{bail, Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// SQLite-backed store for screening reports
pub struct ReportStore {
    pool: Pool<Sqlite>,
}

impl ReportStore {
    /// Open (or create) the database file
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating database directory {}", parent.display()))?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
            .with_context(|| format!("opening database {}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .with_context(|| format!("opening database {}", path.display()))?;

        Ok(Self { pool })
    }

    /// In-memory database. A single connection keeps every query on the same
    /// database instance.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Drop and recreate `table` with the given header and rows.
    /// Every column is TEXT; report cells are already display strings.
    pub async fn replace_table(
        &self,
        table: &str,
        header: &[String],
        rows: &[Vec<String>],
    ) -> Result<()> {
        if header.is_empty() {
            bail!("cannot create table {table} from an empty header");
        }

        let columns = header
            .iter()
            .map(|column| format!("\"{}\" TEXT", column.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; header.len()].join(", ");
        let insert = format!("INSERT INTO \"{table}\" VALUES ({placeholders})");

        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!("DROP TABLE IF EXISTS \"{table}\""))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("CREATE TABLE \"{table}\" ({columns})"))
            .execute(&mut *tx)
            .await?;
        for row in rows {
            let mut query = sqlx::query(&insert);
            for value in row {
                query = query.bind(value);
            }
            query.execute(&mut *tx).await?;
        }
        tx.commit().await?;

        info!("Replaced table {table} with {} rows", rows.len());
        Ok(())
    }

    pub async fn count(&self, table: &str) -> Result<i64> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{table}\""))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Load the four processed report files into their database tables,
/// replacing previous contents
pub async fn load_report_files(store: &ReportStore, storage: &StorageConfig) -> Result<()> {
    info!("{LOG_SEPARATOR}");
    info!("Start load processed imbalances to database step");
    info!("{LOG_SEPARATOR}");

    let jobs = [
        (storage.buyer_processed_path.as_str(), "buyer_imbalances_processed"),
        (storage.seller_processed_path.as_str(), "seller_imbalances_processed"),
        (storage.buyer_interest_path.as_str(), "buyer_imbalances_interest"),
        (storage.seller_interest_path.as_str(), "seller_imbalances_interest"),
    ];

    for (path, table) in jobs {
        let (header, rows) = read_table(path).with_context(|| format!("loading {path}"))?;
        store.replace_table(table, &header, &rows).await?;
    }

    info!("Finished load processed imbalances to database step");
    info!("{LOG_SEPARATOR}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_replace_table_replaces_previous_contents() {
        let store = ReportStore::open_in_memory().await.unwrap();

        store
            .replace_table(
                "buyer_imbalances_processed",
                &header(&["Asset", "LastPrice"]),
                &[row(&["BTCUSDT", "27000"]), row(&["ETHUSDT", "1800"])],
            )
            .await
            .unwrap();
        assert_eq!(store.count("buyer_imbalances_processed").await.unwrap(), 2);

        // A second load with a different shape fully replaces the first
        store
            .replace_table(
                "buyer_imbalances_processed",
                &header(&["Asset", "Exchange", "Note"]),
                &[row(&["SOLUSDT", "binance", ""])],
            )
            .await
            .unwrap();
        assert_eq!(store.count("buyer_imbalances_processed").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_table_rejects_empty_header() {
        let store = ReportStore::open_in_memory().await.unwrap();

        let err = store
            .replace_table("buyer_imbalances_processed", &[], &[])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("empty header"));
    }

    #[tokio::test]
    async fn test_load_report_files_fills_all_four_tables() {
        let dir = tempdir().unwrap();
        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, body).unwrap();
            path.to_string_lossy().into_owned()
        };

        let storage = StorageConfig {
            enable: true,
            database_path: String::new(),
            buyer_processed_path: write("bp.csv", "Asset,LastPrice\nBTCUSDT,27000\n"),
            seller_processed_path: write("sp.csv", "Asset,LastPrice\nBTCUSDT,27000\nETHUSDT,1800\n"),
            buyer_interest_path: write("bi.csv", "Asset\n"),
            seller_interest_path: write("si.csv", "Asset\nSOLUSDT\n"),
        };

        let store = ReportStore::open_in_memory().await.unwrap();
        load_report_files(&store, &storage).await.unwrap();

        assert_eq!(store.count("buyer_imbalances_processed").await.unwrap(), 1);
        assert_eq!(store.count("seller_imbalances_processed").await.unwrap(), 2);
        assert_eq!(store.count("buyer_imbalances_interest").await.unwrap(), 0);
        assert_eq!(store.count("seller_imbalances_interest").await.unwrap(), 1);
    }
}
