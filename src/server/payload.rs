//! Inbound webhook payload parsing
//!
//! TradingView alert bodies are half-structured: numbers and booleans
//! arrive as JSON numbers, strings, or string-wrapped values depending on
//! how the alert template was written. Everything is normalized here,
//! before the engine sees it, and anything ambiguous is a `BadSignal`.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use crate::common::errors::{AppError, Result};
use crate::common::types::Side;
use crate::engine::types::TradeSignal;

/// Raw webhook body as sent by the alerting service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    /// "buy" or "sell"
    pub action: Option<String>,
    /// Trading pair identifier, e.g. "XBTUSD"
    pub symbol: Option<String>,
    /// Percentage of free balance to allocate (number or string)
    #[serde(default)]
    pub usd_pct: Option<Value>,
    /// Alias for `usd_pct`
    #[serde(default)]
    pub alloc_pct: Option<Value>,
    /// Boolean-like flag: sell the entire free base balance
    #[serde(default)]
    pub sell_all: Option<Value>,
    /// Alias for `sell_all`
    #[serde(default)]
    pub liquidate_all: Option<Value>,
}

impl WebhookPayload {
    /// Validate and convert into a `TradeSignal`
    ///
    /// `default_allocation` is used when the payload carries no
    /// percentage field.
    pub fn into_signal(self, default_allocation: Decimal) -> Result<TradeSignal> {
        let action = self
            .action
            .ok_or_else(|| AppError::BadSignal("missing action".to_string()))?;
        let side = match action.trim().to_lowercase().as_str() {
            "buy" => Side::Buy,
            "sell" => Side::Sell,
            other => {
                return Err(AppError::BadSignal(format!(
                    "action must be buy or sell, got {:?}",
                    other
                )))
            }
        };

        let symbol = self
            .symbol
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::BadSignal("missing symbol".to_string()))?;

        let allocation = match self.usd_pct.or(self.alloc_pct) {
            Some(raw) => parse_allocation(&raw)?,
            None => default_allocation,
        };

        let liquidate_all = match self.sell_all.or(self.liquidate_all) {
            Some(raw) => parse_flag(&raw)?,
            None => false,
        };
        if liquidate_all && side != Side::Sell {
            return Err(AppError::BadSignal(
                "sell_all is only valid on a sell signal".to_string(),
            ));
        }

        TradeSignal::new(side, symbol.trim(), allocation)
            .map(|signal| signal.with_liquidate_all(liquidate_all))
    }
}

/// Parse an allocation percentage into a fraction in (0, 1]
///
/// Accepts fractions ("0.2") and percentages ("20", "20%"); anything above
/// 1 is read as a percent.
fn parse_allocation(raw: &Value) -> Result<Decimal> {
    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().to_string(),
        other => {
            return Err(AppError::BadSignal(format!(
                "allocation must be a number or string, got {}",
                other
            )))
        }
    };

    let value = Decimal::from_str(&text)
        .map_err(|e| AppError::BadSignal(format!("invalid allocation {:?}: {}", text, e)))?;

    let fraction = if value > Decimal::ONE {
        value / Decimal::from(100)
    } else {
        value
    };

    if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
        return Err(AppError::BadSignal(format!(
            "allocation must be in (0, 100], got {}",
            value
        )));
    }

    Ok(fraction)
}

/// Parse a boolean-like JSON value ("true"/"1"/"yes", bool, 0/1)
fn parse_flag(raw: &Value) -> Result<bool> {
    match raw {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i != 0)
            } else {
                // alert templates sometimes emit float-typed flags
                match n.as_f64() {
                    Some(f) if f == 1.0 => Ok(true),
                    Some(f) if f == 0.0 => Ok(false),
                    _ => Err(AppError::BadSignal(format!("invalid boolean flag {}", n))),
                }
            }
        }
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            other => Err(AppError::BadSignal(format!(
                "invalid boolean flag {:?}",
                other
            ))),
        },
        Value::Null => Ok(false),
        other => Err(AppError::BadSignal(format!(
            "invalid boolean flag {}",
            other
        ))),
    }
}
