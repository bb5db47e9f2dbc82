//! Signal and placement types owned by the sizing engine

use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::errors::{AppError, Result};
use crate::common::types::{OrderAck, Side, SizedOrder};

/// A validated inbound trade signal
///
/// Constructed once per request and never mutated. `allocation` is the
/// fraction of free balance to commit, in (0, 1].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeSignal {
    pub side: Side,
    pub pair: String,
    pub allocation: Decimal,
    /// Sell the entire free base balance, ignoring `allocation`
    pub liquidate_all: bool,
}

impl TradeSignal {
    /// Build a signal, rejecting empty pairs and out-of-range allocations
    pub fn new(side: Side, pair: impl Into<String>, allocation: Decimal) -> Result<Self> {
        let pair = pair.into();
        if pair.trim().is_empty() {
            return Err(AppError::BadSignal("pair must not be empty".to_string()));
        }
        if allocation <= Decimal::ZERO || allocation > Decimal::ONE {
            return Err(AppError::BadSignal(format!(
                "allocation must be in (0, 1], got {}",
                allocation
            )));
        }
        Ok(Self {
            side,
            pair,
            allocation,
            liquidate_all: false,
        })
    }

    /// Mark this sell signal as a full liquidation
    pub fn with_liquidate_all(mut self, liquidate_all: bool) -> Self {
        self.liquidate_all = liquidate_all;
        self
    }
}

/// Outcome of a handled signal: the order we computed plus the exchange's
/// acknowledgement, surfaced verbatim for observability
#[derive(Debug, Clone, Serialize)]
pub struct OrderPlacement {
    #[serde(flatten)]
    pub order: SizedOrder,
    pub exchange: OrderAck,
}
