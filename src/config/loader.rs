//! Configuration loader

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::types::AppConfig;
use crate::common::errors::{AppError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP_, e.g. APP__TRADING__DRY_RUN)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| AppError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| AppError::Configuration(e.to_string()))
}

/// Load configuration from flat environment variables only
///
/// Recognizes the deployment-style names: KRAKEN_KEY, KRAKEN_SECRET,
/// SHARED_SECRET, BIND_ADDR, ALLOC_PCT, MIN_NOTIONAL, SPREAD_BPS and
/// DRY_RUN (with VALIDATE accepted as a legacy alias).
pub fn load_from_env() -> Result<AppConfig> {
    // Pick up a .env file if present
    dotenvy::dotenv().ok();

    let mut config = AppConfig::default();

    config.kraken.api_key = std::env::var("KRAKEN_KEY").ok();
    config.kraken.api_secret = std::env::var("KRAKEN_SECRET").ok();
    if let Ok(url) = std::env::var("KRAKEN_REST_URL") {
        config.kraken.rest_url = url;
    }

    if let Ok(secret) = std::env::var("SHARED_SECRET") {
        config.server.shared_secret = secret;
    }
    if let Ok(addr) = std::env::var("BIND_ADDR") {
        config.server.bind_addr = addr;
    }

    if let Some(pct) = parse_env_decimal("ALLOC_PCT")? {
        config.trading.alloc_pct = pct;
    }
    if let Some(min) = parse_env_decimal("MIN_NOTIONAL")? {
        config.trading.min_notional = min;
    }
    if let Ok(bps) = std::env::var("SPREAD_BPS") {
        config.trading.spread_bps = bps
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid SPREAD_BPS: {}", e)))?;
    }

    // VALIDATE is the legacy name for the dry-run switch
    let dry_run = std::env::var("DRY_RUN")
        .or_else(|_| std::env::var("VALIDATE"))
        .ok();
    if let Some(flag) = dry_run {
        config.trading.dry_run = matches!(flag.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    Ok(config)
}

fn parse_env_decimal(name: &str) -> Result<Option<Decimal>> {
    match std::env::var(name) {
        Ok(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|e| AppError::Configuration(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}
