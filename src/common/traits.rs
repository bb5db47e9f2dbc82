//! Trait definitions for exchange collaborators

use async_trait::async_trait;

use super::errors::Result;
use super::types::{BalanceSnapshot, MarketRules, OrderAck, OrderBookTop, SizedOrder};

/// Capability set the sizing engine needs from an exchange
///
/// This is the explicit collaborator seam: the engine never holds a global
/// exchange handle, it is handed an implementation of this trait (or a
/// service struct owning one). Each method is a single blocking I/O call
/// against the exchange, bounded by the client's request timeout. No method
/// retries internally - retry and rate-limit policy belong to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Fetch the current top-of-book for a pair
    ///
    /// Fails with `MarketDataUnavailable` if the exchange cannot be
    /// reached or returns an empty/malformed book.
    async fn order_book_top(&self, pair: &str) -> Result<OrderBookTop>;

    /// Fetch free account balances by asset key
    async fn balances(&self) -> Result<BalanceSnapshot>;

    /// Fetch trading rules (lot step, base/quote asset keys) for a pair
    async fn market_rules(&self, pair: &str) -> Result<MarketRules>;

    /// Submit a single limit order; returns the exchange acknowledgement
    ///
    /// Fails with `OrderRejected` if the exchange refuses the submission.
    /// Never retried - blind retry of a priced order risks duplicate
    /// exposure.
    async fn add_order(&self, order: &SizedOrder) -> Result<OrderAck>;

    /// Exchange server time, used as a reachability probe
    async fn server_time(&self) -> Result<i64>;
}
