//! Configuration types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Kraken-specific configuration
    #[serde(default)]
    pub kraken: KrakenConfig,
    /// Webhook server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Order sizing and placement settings
    #[serde(default)]
    pub trading: TradingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            kraken: KrakenConfig::default(),
            server: ServerConfig::default(),
            trading: TradingConfig::default(),
        }
    }
}

/// Kraken exchange configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KrakenConfig {
    /// API key for private endpoints
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret (base64) for request signing
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Base URL for the REST API
    #[serde(default = "default_kraken_rest_url")]
    pub rest_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for KrakenConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            rest_url: default_kraken_rest_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_kraken_rest_url() -> String {
    "https://api.kraken.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Webhook server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Shared secret required in the Tradingview-Secret header
    #[serde(default = "default_shared_secret")]
    pub shared_secret: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            shared_secret: default_shared_secret(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shared_secret() -> String {
    "changeme".to_string()
}

/// Order sizing and placement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Fraction of free balance allocated per signal, in (0, 1]
    #[serde(default = "default_alloc_pct")]
    pub alloc_pct: Decimal,
    /// Minimum notional (quote currency) floor for buy orders
    #[serde(default)]
    pub min_notional: Decimal,
    /// Basis-point offset applied inside the touch when pricing
    #[serde(default = "default_spread_bps")]
    pub spread_bps: u32,
    /// When true, orders are submitted with the exchange validate flag
    /// and never rest
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            alloc_pct: default_alloc_pct(),
            min_notional: Decimal::ZERO,
            spread_bps: default_spread_bps(),
            dry_run: false,
        }
    }
}

fn default_alloc_pct() -> Decimal {
    // 20% of free balance
    Decimal::new(20, 2)
}

fn default_spread_bps() -> u32 {
    5
}

/// API credentials for signed requests
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trading_defaults() {
        let cfg = TradingConfig::default();
        assert_eq!(cfg.alloc_pct, dec!(0.20));
        assert_eq!(cfg.min_notional, Decimal::ZERO);
        assert_eq!(cfg.spread_bps, 5);
        assert!(!cfg.dry_run);
    }

    #[test]
    fn test_kraken_defaults() {
        let cfg = KrakenConfig::default();
        assert_eq!(cfg.rest_url, "https://api.kraken.com");
        assert_eq!(cfg.request_timeout_seconds, 30);
        assert!(cfg.api_key.is_none());
    }
}
