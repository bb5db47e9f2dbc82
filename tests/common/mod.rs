//! Common test utilities and fixtures

use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::sync::Mutex;

use kraken_webhook::common::errors::{AppError, Result};
use kraken_webhook::common::traits::ExchangeClient;
use kraken_webhook::common::types::{
    BalanceSnapshot, MarketRules, OrderAck, OrderBookTop, SizedOrder,
};

/// Trading rules for the canonical test pair
pub fn sample_rules() -> MarketRules {
    MarketRules {
        pair: "XXBTZUSD".to_string(),
        base: "XXBT".to_string(),
        quote: "ZUSD".to_string(),
        volume_step: dec!(0.0001),
    }
}

/// Top-of-book used by the worked examples (bid 3000.00 / ask 3000.50)
pub fn sample_book_top() -> OrderBookTop {
    OrderBookTop::new(dec!(3000.00), dec!(3000.50))
}

/// Balances: 1000 USD free, 0.5 BTC free
pub fn sample_balances() -> BalanceSnapshot {
    let mut snapshot = BalanceSnapshot::default();
    snapshot.set("ZUSD", dec!(1000));
    snapshot.set("XXBT", dec!(0.5));
    snapshot
}

/// In-memory exchange stand-in for server round-trip tests
///
/// Serves fixed snapshot data, records every submitted order, and can be
/// flipped into failure modes per test.
pub struct StubExchange {
    pub rules: MarketRules,
    pub book: OrderBookTop,
    pub balances: BalanceSnapshot,
    /// Fail market data fetches with `MarketDataUnavailable`
    pub fail_market_data: bool,
    /// Refuse submissions with `OrderRejected`
    pub reject_orders: bool,
    /// Every order handed to `add_order`, in arrival order
    pub submitted: Mutex<Vec<SizedOrder>>,
}

impl StubExchange {
    pub fn new() -> Self {
        Self {
            rules: sample_rules(),
            book: sample_book_top(),
            balances: sample_balances(),
            fail_market_data: false,
            reject_orders: false,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn submitted_orders(&self) -> Vec<SizedOrder> {
        self.submitted.lock().unwrap().clone()
    }
}

impl Default for StubExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeClient for StubExchange {
    async fn order_book_top(&self, pair: &str) -> Result<OrderBookTop> {
        if self.fail_market_data {
            return Err(AppError::MarketDataUnavailable(format!(
                "no order book for {}",
                pair
            )));
        }
        Ok(self.book)
    }

    async fn balances(&self) -> Result<BalanceSnapshot> {
        if self.fail_market_data {
            return Err(AppError::MarketDataUnavailable("balances down".to_string()));
        }
        Ok(self.balances.clone())
    }

    async fn market_rules(&self, _pair: &str) -> Result<MarketRules> {
        if self.fail_market_data {
            return Err(AppError::MarketDataUnavailable("pairs down".to_string()));
        }
        Ok(self.rules.clone())
    }

    async fn add_order(&self, order: &SizedOrder) -> Result<OrderAck> {
        if self.reject_orders {
            return Err(AppError::OrderRejected(
                "EOrder:Insufficient funds".to_string(),
            ));
        }
        self.submitted.lock().unwrap().push(order.clone());
        Ok(OrderAck {
            descr: format!(
                "{} {} {} @ limit {} post",
                order.side, order.volume, order.pair, order.limit_price
            ),
            txid: if order.validate_only {
                vec![]
            } else {
                vec!["OTEST-0001".to_string()]
            },
        })
    }

    async fn server_time(&self) -> Result<i64> {
        if self.fail_market_data {
            return Err(AppError::MarketDataUnavailable("exchange down".to_string()));
        }
        Ok(1_700_000_000)
    }
}
