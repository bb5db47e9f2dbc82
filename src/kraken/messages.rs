//! Wire types for the Kraken REST API

use serde::Deserialize;
use std::collections::HashMap;

/// Standard Kraken envelope - every endpoint wraps its payload in
/// `{"error": [...], "result": {...}}` and reports failures through the
/// error array rather than HTTP status codes
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenResponse<T> {
    #[serde(default)]
    pub error: Vec<String>,
    pub result: Option<T>,
}

/// `Time` endpoint payload
#[derive(Debug, Clone, Deserialize)]
pub struct TimeResult {
    pub unixtime: i64,
}

/// One order book level: `[price, volume, timestamp]`
///
/// Price and volume arrive as strings; the timestamp is a bare number we
/// never consume.
#[derive(Debug, Clone, Deserialize)]
pub struct DepthLevel(pub String, pub String, pub serde_json::Value);

/// `Depth` payload for a single pair
#[derive(Debug, Clone, Deserialize)]
pub struct DepthEntry {
    #[serde(default)]
    pub asks: Vec<DepthLevel>,
    #[serde(default)]
    pub bids: Vec<DepthLevel>,
}

/// `Depth` payload, keyed by the canonical pair name
pub type DepthResult = HashMap<String, DepthEntry>;

/// `Balance` payload - asset key to free amount, amounts as strings
pub type BalanceResult = HashMap<String, String>;

/// `AssetPairs` payload entry - the subset of pair metadata we consume
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPairInfo {
    /// Base asset key as used in balance lookups
    pub base: String,
    /// Quote asset key as used in balance lookups
    pub quote: String,
    /// Number of decimals of volume granularity (lot step = 10^-n)
    pub lot_decimals: u32,
}

/// `AssetPairs` payload, keyed by the canonical pair name
pub type AssetPairsResult = HashMap<String, AssetPairInfo>;

/// `AddOrder` payload
#[derive(Debug, Clone, Deserialize)]
pub struct AddOrderResult {
    pub descr: AddOrderDescr,
    /// Absent when the order was validate-only
    #[serde(default)]
    pub txid: Vec<String>,
}

/// Order description block inside an `AddOrder` response
#[derive(Debug, Clone, Deserialize)]
pub struct AddOrderDescr {
    #[serde(default)]
    pub order: String,
}
