use clap::Parser;
use imbalance_screener::storage::{load_report_files, read_asset_list, write_report, ReportStore};
use imbalance_screener::utils::{init_from_config, Config};
use imbalance_screener::{ImbalanceScreener, KlineDownloader};
use tracing::info;

/// Screen crypto assets for untested price imbalances
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
    println!("║         CRYPTO IMBALANCE SCREENER              ║");
    println!("╚════════════════════════════════════════════════╝");
    println!();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    init_from_config(&config.logging);

    println!("Assets: {}", config.screener.assets_path);
    println!(
        "Reports: {} / {}",
        config.screener.buyer_report_path, config.screener.seller_report_path
    );
    println!();

    if config.screener.enable {
        let assets = read_asset_list(&config.screener.assets_path)?;
        let downloader = KlineDownloader::from_config(&config.downloader)?;
        let screener = ImbalanceScreener::new(downloader, config.history.clone());

        let reports = screener.run(&assets).await;

        write_report(&config.screener.buyer_report_path, &reports.buyer)?;
        write_report(&config.screener.seller_report_path, &reports.seller)?;
    } else {
        info!("Screening step disabled in configuration");
    }

    if config.storage.enable {
        let store = ReportStore::open(&config.storage.database_path).await?;
        load_report_files(&store, &config.storage).await?;
    } else {
        info!("Storage step disabled in configuration");
    }

    info!("All steps finished");
    Ok(())
}
