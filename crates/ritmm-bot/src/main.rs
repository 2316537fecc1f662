//! ritmm - RIT market-making client entry point.

use anyhow::Result;
use clap::Parser;
use ritmm_bot::config::CONFIG_ENV;
use tracing::{info, warn};

/// Market-making client for the RIT case simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via RITMM_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    ritmm_telemetry::init_logging()?;

    info!("Starting ritmm v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > RITMM_CONFIG > config/default.toml
    let config_path = args.config.or_else(|| std::env::var(CONFIG_ENV).ok());
    info!(config_path = ?config_path, "Loading configuration");

    let config = ritmm_bot::AppConfig::load(config_path.as_deref())?;
    info!(
        api_url = %config.gateway.api_url,
        tickers = config.strategy.tickers.len(),
        depth = config.strategy.depth,
        "Configuration loaded"
    );

    let mut app = ritmm_bot::Application::new(config)?;

    let shutdown = app.shutdown_token();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping after current round");
                shutdown.cancel();
            }
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });

    app.run().await?;

    Ok(())
}
