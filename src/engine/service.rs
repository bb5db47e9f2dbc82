//! Per-signal orchestration: snapshot fetch, sizing, submission

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::sizing::size_order;
use super::types::{OrderPlacement, TradeSignal};
use crate::common::errors::Result;
use crate::common::traits::ExchangeClient;
use crate::config::types::TradingConfig;

/// Stateless per-signal order placement service
///
/// Holds the exchange collaborator and sizing configuration, nothing else:
/// no order tracking, no cached snapshots, no shared mutable state across
/// concurrent signals. Concurrent signals for the same pair are NOT
/// serialized here; operators who need that guarantee must serialize
/// dispatch upstream.
pub struct TradeService<C: ExchangeClient> {
    exchange: Arc<C>,
    trading: TradingConfig,
}

impl<C: ExchangeClient> TradeService<C> {
    pub fn new(exchange: Arc<C>, trading: TradingConfig) -> Self {
        Self { exchange, trading }
    }

    pub fn exchange(&self) -> &C {
        &self.exchange
    }

    pub fn trading_config(&self) -> &TradingConfig {
        &self.trading
    }

    /// Handle one signal end to end
    ///
    /// Fetches pair rules, top-of-book and balances fresh, sizes the
    /// order, submits it once, and returns the computed order together
    /// with the exchange acknowledgement. A failure at any step is
    /// terminal for this signal; nothing is submitted after a sizing
    /// failure and nothing is retried after a submission failure.
    #[instrument(skip(self), fields(pair = %signal.pair, side = %signal.side))]
    pub async fn handle_signal(&self, signal: &TradeSignal) -> Result<OrderPlacement> {
        let rules = self.exchange.market_rules(&signal.pair).await?;
        let book = self.exchange.order_book_top(&signal.pair).await?;
        let balances = self.exchange.balances().await?;

        let order = size_order(signal, &book, &balances, &rules, &self.trading).inspect_err(
            |e| warn!("signal rejected during sizing: {}", e),
        )?;

        info!(
            "submitting {} {} {} @ {} (validate_only={})",
            order.side, order.volume, order.pair, order.limit_price, order.validate_only
        );

        let ack = self.exchange.add_order(&order).await?;
        info!("exchange accepted order: {}", ack.descr);

        Ok(OrderPlacement {
            order,
            exchange: ack,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::AppError;
    use crate::common::traits::MockExchangeClient;
    use crate::common::types::{
        BalanceSnapshot, MarketRules, OrderAck, OrderBookTop, Side,
    };
    use rust_decimal_macros::dec;

    fn rules() -> MarketRules {
        MarketRules {
            pair: "XXBTZUSD".to_string(),
            base: "XXBT".to_string(),
            quote: "ZUSD".to_string(),
            volume_step: dec!(0.0001),
        }
    }

    fn signal() -> TradeSignal {
        TradeSignal::new(Side::Buy, "XBTUSD", dec!(0.20)).unwrap()
    }

    fn mock_with_snapshot(quote: rust_decimal::Decimal) -> MockExchangeClient {
        let mut mock = MockExchangeClient::new();
        mock.expect_market_rules().returning(|_| Ok(rules()));
        mock.expect_order_book_top()
            .returning(|_| Ok(OrderBookTop::new(dec!(3000.00), dec!(3000.50))));
        mock.expect_balances().returning(move || {
            let mut snapshot = BalanceSnapshot::default();
            snapshot.set("ZUSD", quote);
            Ok(snapshot)
        });
        mock
    }

    #[tokio::test]
    async fn test_happy_path_submits_sized_order() {
        let mut mock = mock_with_snapshot(dec!(1000));
        mock.expect_add_order()
            .withf(|order| {
                order.limit_price == dec!(2998.50)
                    && order.volume == dec!(0.0667)
                    && order.post_only
            })
            .times(1)
            .returning(|_| {
                Ok(OrderAck {
                    descr: "buy 0.0667 XBTUSD @ limit 2998.50 post".to_string(),
                    txid: vec!["OABC-123".to_string()],
                })
            });

        let service = TradeService::new(Arc::new(mock), TradingConfig::default());
        let placement = service.handle_signal(&signal()).await.unwrap();

        assert_eq!(placement.order.volume, dec!(0.0667));
        assert_eq!(placement.exchange.txid, vec!["OABC-123"]);
    }

    #[tokio::test]
    async fn test_sizing_failure_issues_no_submission() {
        let mut mock = mock_with_snapshot(dec!(40));
        // add_order must never be called when sizing fails
        mock.expect_add_order().times(0);

        let mut trading = TradingConfig::default();
        trading.min_notional = dec!(50);

        let service = TradeService::new(Arc::new(mock), trading);
        let result = service.handle_signal(&signal()).await;
        assert!(matches!(result, Err(AppError::InsufficientBalance(_))));
    }

    #[tokio::test]
    async fn test_market_data_failure_is_terminal() {
        let mut mock = MockExchangeClient::new();
        mock.expect_market_rules().returning(|_| Ok(rules()));
        mock.expect_order_book_top().times(1).returning(|_| {
            Err(AppError::MarketDataUnavailable("no bids".to_string()))
        });
        mock.expect_balances().times(0);
        mock.expect_add_order().times(0);

        let service = TradeService::new(Arc::new(mock), TradingConfig::default());
        let result = service.handle_signal(&signal()).await;
        assert!(matches!(result, Err(AppError::MarketDataUnavailable(_))));
    }

    #[tokio::test]
    async fn test_submission_rejection_is_not_retried() {
        let mut mock = mock_with_snapshot(dec!(1000));
        mock.expect_add_order().times(1).returning(|_| {
            Err(AppError::OrderRejected("EOrder:Insufficient funds".to_string()))
        });

        let service = TradeService::new(Arc::new(mock), TradingConfig::default());
        let result = service.handle_signal(&signal()).await;
        assert!(matches!(result, Err(AppError::OrderRejected(_))));
    }
}
