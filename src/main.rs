//! kraken_webhook - Main Entry Point
//!
//! Starts the webhook HTTP server that turns TradingView alerts into
//! post-only limit orders on Kraken.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use kraken_webhook::config::loader;
use kraken_webhook::engine::TradeService;
use kraken_webhook::kraken::KrakenRestClient;
use kraken_webhook::server::{router, AppState};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Force dry-run mode: orders are validated by the exchange but never rest
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting kraken_webhook");
    info!("Configuration file: {}", args.config);

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    // A config file takes precedence; without one, fall back to the flat
    // deployment env vars (KRAKEN_KEY, SHARED_SECRET, ALLOC_PCT, ...)
    let mut config = if std::path::Path::new(&args.config).exists() {
        loader::load_config(Some(&args.config))?
    } else {
        loader::load_from_env()?
    };
    if args.dry_run {
        config.trading.dry_run = true;
    }

    let client = KrakenRestClient::from_config(&config.kraken)?;
    if !client.has_credentials() {
        warn!("no API credentials configured; balance fetch and order placement will fail");
    }
    if config.trading.dry_run {
        info!("dry-run mode: orders will carry validate=true and never rest");
    }

    let service = Arc::new(TradeService::new(Arc::new(client), config.trading.clone()));
    let state = AppState {
        service,
        shared_secret: config.server.shared_secret.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    info!("Listening on {}", config.server.bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal, cleaning up...");
        })
        .await?;

    Ok(())
}
