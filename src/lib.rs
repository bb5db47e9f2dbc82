//! kraken_webhook Library
//!
//! Receives trade signals from TradingView alert webhooks and places
//! balance-sized, maker-only limit orders on Kraken.

pub mod common;
pub mod config;
pub mod engine;
pub mod kraken;
pub mod server;

// Re-export commonly used types
pub use common::errors::{AppError, Result};
pub use common::traits::ExchangeClient;
pub use common::types::{
    BalanceSnapshot, MarketRules, OrderAck, OrderBookTop, Side, SizedOrder,
};
pub use config::types::AppConfig;
pub use kraken::rest::KrakenRestClient;

// Engine types
pub use engine::{maker_limit_price, size_order, OrderPlacement, TradeService, TradeSignal};

// Server plumbing
pub use server::{router, AppState, WebhookPayload};
