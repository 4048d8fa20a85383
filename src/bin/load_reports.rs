use clap::Parser;
use imbalance_screener::storage::{load_report_files, ReportStore};
use imbalance_screener::utils::{init_from_config, Config};
use tracing::info;

/// Load the processed imbalance report files into the screener database
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file (defaults to CONFIG_FILE or config/screener.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("╔════════════════════════════════════════════════╗");
    println!("║         REPORT DATABASE LOADER                 ║");
    println!("╚════════════════════════════════════════════════╝");
    println!();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    init_from_config(&config.logging);

    println!("Database: {}", config.storage.database_path);
    println!();

    let store = ReportStore::open(&config.storage.database_path).await?;
    load_report_files(&store, &config.storage).await?;

    info!("Database load finished");
    Ok(())
}
