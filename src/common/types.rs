//! Unified exchange-facing types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Top-of-book snapshot for a trading pair
///
/// Fetched fresh per order, never cached across calls. Both prices are
/// strictly positive; the client rejects empty or malformed book data
/// before constructing this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBookTop {
    /// Best (highest) bid price
    pub best_bid: Decimal,
    /// Best (lowest) ask price
    pub best_ask: Decimal,
}

impl OrderBookTop {
    pub fn new(best_bid: Decimal, best_ask: Decimal) -> Self {
        Self { best_bid, best_ask }
    }
}

/// Account free balances by asset symbol
///
/// "Free" means available and unencumbered - funds already committed to
/// open orders are not included. Fetched fresh per order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    balances: HashMap<String, Decimal>,
}

impl BalanceSnapshot {
    pub fn new(balances: HashMap<String, Decimal>) -> Self {
        Self { balances }
    }

    /// Free balance for an asset, zero if the asset is not present
    pub fn free(&self, asset: &str) -> Decimal {
        self.balances.get(asset).copied().unwrap_or_default()
    }

    /// Insert or replace a balance entry
    pub fn set(&mut self, asset: impl Into<String>, amount: Decimal) {
        self.balances.insert(asset.into(), amount);
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Exchange-imposed trading rules for a pair
///
/// `base`/`quote` are the exchange's own asset keys for balance lookups,
/// taken from pair metadata - the engine never derives them by slicing
/// the pair name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRules {
    /// Canonical pair identifier as the exchange knows it
    pub pair: String,
    /// Base asset key (what is bought/sold), e.g. "XXBT"
    pub base: String,
    /// Quote asset key (what it is priced in), e.g. "ZUSD"
    pub quote: String,
    /// Minimum tradable volume increment; all volumes must be exact
    /// multiples of this
    pub volume_step: Decimal,
}

/// A fully priced and sized limit order, ready for submission
///
/// Constructed by the sizing engine, never mutated afterwards, and
/// submitted exactly once. `volume` is always an exact multiple of the
/// pair's volume step; `limit_price` sits strictly on the maker side of
/// the touch so the order cannot cross and fill as taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizedOrder {
    pub pair: String,
    pub side: Side,
    /// Limit price rounded to 2-decimal currency precision
    pub limit_price: Decimal,
    /// Order volume in base asset units
    pub volume: Decimal,
    /// Always true - the exchange-side flag is defense in depth on top of
    /// the inside-the-spread pricing
    pub post_only: bool,
    /// When true the exchange validates parameters without resting a
    /// real order
    pub validate_only: bool,
}

/// Exchange acknowledgement of a placed (or validated) order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Human-readable order description from the exchange
    pub descr: String,
    /// Transaction IDs; empty when the order was validate-only
    #[serde(default)]
    pub txid: Vec<String>,
}
