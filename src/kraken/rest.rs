//! REST client for the Kraken spot exchange
//!
//! Market data (Depth, AssetPairs, Time) uses the public endpoints;
//! balances and order placement use the signed private endpoints. Every
//! call is a single bounded request - no retries, no caching. Rate-limit
//! and backoff policy belong to whoever dispatches signals at us.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument};

use super::auth::{next_nonce, sign_request};
use super::messages::*;
use crate::common::errors::{AppError, Result};
use crate::common::traits::ExchangeClient;
use crate::common::types::{BalanceSnapshot, MarketRules, OrderAck, OrderBookTop, SizedOrder};
use crate::config::types::{ApiCredentials, KrakenConfig};

/// REST API client for Kraken
#[derive(Debug, Clone)]
pub struct KrakenRestClient {
    /// HTTP client
    client: Client,
    /// Base URL for the REST API
    base_url: String,
    /// Optional API credentials for private endpoints
    credentials: Option<ApiCredentials>,
}

impl KrakenRestClient {
    /// Create a new REST client (public endpoints only)
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    /// Set API credentials for private endpoints
    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Build a client from configuration
    pub fn from_config(config: &KrakenConfig) -> Result<Self> {
        let client = Self::with_timeout(
            &config.rest_url,
            Duration::from_secs(config.request_timeout_seconds),
        )?;

        Ok(match (&config.api_key, &config.api_secret) {
            (Some(key), Some(secret)) => {
                client.with_credentials(ApiCredentials::new(key.clone(), secret.clone()))
            }
            _ => client,
        })
    }

    /// Whether private endpoints can be called
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Send a signed POST to a private endpoint
    ///
    /// The body string handed to the signer and the body string sent over
    /// the wire must be byte-identical, so it is built once here.
    async fn private_post(&self, endpoint: &str, params: &[(&str, String)]) -> Result<reqwest::Response> {
        let creds = self.credentials.as_ref().ok_or_else(|| {
            AppError::Authentication("API credentials not configured".to_string())
        })?;

        let nonce = next_nonce();
        let mut postdata = format!("nonce={}", nonce);
        for (key, value) in params {
            postdata.push('&');
            postdata.push_str(key);
            postdata.push('=');
            postdata.push_str(value);
        }

        let path = format!("/0/private/{}", endpoint);
        let signature = sign_request(&creds.api_secret, &path, nonce, &postdata)?;
        let url = format!("{}{}", self.base_url, path);
        debug!("Posting to private endpoint: {}", path);

        let response = self
            .client
            .post(&url)
            .header("API-Key", &creds.api_key)
            .header("API-Sign", signature)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(postdata)
            .send()
            .await?;

        Ok(response)
    }

    /// Get exchange server time (reachability probe)
    #[instrument(skip(self))]
    pub async fn get_server_time(&self) -> Result<i64> {
        let url = format!("{}/0/public/Time", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::MarketDataUnavailable(format!("time request failed: {}", e)))?;

        let envelope: KrakenResponse<TimeResult> = response
            .json()
            .await
            .map_err(|e| AppError::MarketDataUnavailable(format!("invalid time response: {}", e)))?;

        if !envelope.error.is_empty() {
            return Err(AppError::MarketDataUnavailable(envelope.error.join("; ")));
        }

        envelope
            .result
            .map(|t| t.unixtime)
            .ok_or_else(|| AppError::MarketDataUnavailable("empty time result".to_string()))
    }

    /// Get the current top-of-book for a pair
    #[instrument(skip(self))]
    pub async fn get_order_book_top(&self, pair: &str) -> Result<OrderBookTop> {
        let url = format!("{}/0/public/Depth?pair={}&count=1", self.base_url, pair);
        debug!("Fetching order book from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::MarketDataUnavailable(format!("depth request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::MarketDataUnavailable(format!(
                "depth request returned status {}",
                response.status()
            )));
        }

        let envelope: KrakenResponse<DepthResult> = response.json().await.map_err(|e| {
            AppError::MarketDataUnavailable(format!("invalid depth response: {}", e))
        })?;

        if !envelope.error.is_empty() {
            return Err(AppError::MarketDataUnavailable(envelope.error.join("; ")));
        }

        let entry = envelope
            .result
            .and_then(|r| r.into_values().next())
            .ok_or_else(|| {
                AppError::MarketDataUnavailable(format!("no order book returned for {}", pair))
            })?;

        let best_bid = parse_level_price(entry.bids.first(), pair, "bid")?;
        let best_ask = parse_level_price(entry.asks.first(), pair, "ask")?;

        if best_bid <= Decimal::ZERO || best_ask <= Decimal::ZERO {
            return Err(AppError::MarketDataUnavailable(format!(
                "non-positive touch prices for {}: bid={} ask={}",
                pair, best_bid, best_ask
            )));
        }

        Ok(OrderBookTop::new(best_bid, best_ask))
    }

    /// Get trading rules (lot step, base/quote asset keys) for a pair
    #[instrument(skip(self))]
    pub async fn get_market_rules(&self, pair: &str) -> Result<MarketRules> {
        let url = format!("{}/0/public/AssetPairs?pair={}", self.base_url, pair);
        debug!("Fetching pair metadata from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::MarketDataUnavailable(format!("pair request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::MarketDataUnavailable(format!(
                "pair request returned status {}",
                response.status()
            )));
        }

        let envelope: KrakenResponse<AssetPairsResult> = response.json().await.map_err(|e| {
            AppError::MarketDataUnavailable(format!("invalid pair response: {}", e))
        })?;

        if !envelope.error.is_empty() {
            return Err(AppError::MarketDataUnavailable(envelope.error.join("; ")));
        }

        let (name, info) = envelope
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| {
                AppError::MarketDataUnavailable(format!("unknown trading pair {}", pair))
            })?;

        Ok(MarketRules {
            pair: name,
            base: info.base,
            quote: info.quote,
            volume_step: Decimal::new(1, info.lot_decimals),
        })
    }

    /// Get free account balances
    #[instrument(skip(self))]
    pub async fn get_balances(&self) -> Result<BalanceSnapshot> {
        let response = self
            .private_post("Balance", &[])
            .await
            .map_err(|e| match e {
                AppError::Authentication(_) => e,
                other => AppError::MarketDataUnavailable(format!("balance fetch failed: {}", other)),
            })?;

        let envelope: KrakenResponse<BalanceResult> = response.json().await.map_err(|e| {
            AppError::MarketDataUnavailable(format!("invalid balance response: {}", e))
        })?;

        if !envelope.error.is_empty() {
            return Err(AppError::MarketDataUnavailable(envelope.error.join("; ")));
        }

        let raw = envelope
            .result
            .ok_or_else(|| AppError::MarketDataUnavailable("empty balance result".to_string()))?;

        let mut snapshot = BalanceSnapshot::default();
        for (asset, amount) in raw {
            let amount: Decimal = amount.parse().map_err(|e| {
                AppError::MarketDataUnavailable(format!("invalid balance for {}: {}", asset, e))
            })?;
            snapshot.set(asset, amount);
        }

        Ok(snapshot)
    }

    /// Submit a single limit order
    ///
    /// Carries `oflags=post` always, and `validate=true` when the order is
    /// validate-only. A failed submission is reported as `OrderRejected`,
    /// never retried.
    #[instrument(skip(self), fields(pair = %order.pair, side = %order.side))]
    pub async fn submit_order(&self, order: &SizedOrder) -> Result<OrderAck> {
        let mut params = vec![
            ("pair", order.pair.clone()),
            ("type", order.side.to_string()),
            ("ordertype", "limit".to_string()),
            ("price", order.limit_price.to_string()),
            ("volume", order.volume.to_string()),
            ("oflags", "post".to_string()),
        ];
        if order.validate_only {
            params.push(("validate", "true".to_string()));
        }

        let response = self
            .private_post("AddOrder", &params)
            .await
            .map_err(|e| match e {
                AppError::Authentication(_) => e,
                other => AppError::OrderRejected(format!("submission failed: {}", other)),
            })?;

        let envelope: KrakenResponse<AddOrderResult> = response
            .json()
            .await
            .map_err(|e| AppError::OrderRejected(format!("invalid AddOrder response: {}", e)))?;

        if !envelope.error.is_empty() {
            return Err(AppError::OrderRejected(envelope.error.join("; ")));
        }

        let result = envelope
            .result
            .ok_or_else(|| AppError::OrderRejected("empty AddOrder result".to_string()))?;

        Ok(OrderAck {
            descr: result.descr.order,
            txid: result.txid,
        })
    }
}

/// Parse the price out of a depth level, rejecting empty books
fn parse_level_price(level: Option<&DepthLevel>, pair: &str, side: &str) -> Result<Decimal> {
    let level = level.ok_or_else(|| {
        AppError::MarketDataUnavailable(format!("no {}s in order book for {}", side, pair))
    })?;
    level.0.parse().map_err(|e| {
        AppError::MarketDataUnavailable(format!("invalid {} price for {}: {}", side, pair, e))
    })
}

#[async_trait]
impl ExchangeClient for KrakenRestClient {
    async fn order_book_top(&self, pair: &str) -> Result<OrderBookTop> {
        self.get_order_book_top(pair).await
    }

    async fn balances(&self) -> Result<BalanceSnapshot> {
        self.get_balances().await
    }

    async fn market_rules(&self, pair: &str) -> Result<MarketRules> {
        self.get_market_rules(pair).await
    }

    async fn add_order(&self, order: &SizedOrder) -> Result<OrderAck> {
        self.submit_order(order).await
    }

    async fn server_time(&self) -> Result<i64> {
        self.get_server_time().await
    }
}
