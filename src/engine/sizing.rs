//! Balance-fraction order sizing
//!
//! Turns a signal plus a fresh market snapshot into an exchange-compliant
//! order volume: fractional allocation of free balance, lot-step flooring,
//! and the minimum-notional / balance-sufficiency checks.

use rust_decimal::Decimal;

use super::pricing::maker_limit_price;
use super::types::TradeSignal;
use crate::common::errors::{AppError, Result};
use crate::common::types::{BalanceSnapshot, MarketRules, OrderBookTop, Side, SizedOrder};
use crate::config::types::TradingConfig;

/// Size a signal against a snapshot, producing an order ready to submit
///
/// Pure with respect to its inputs: identical snapshots yield identical
/// orders. Balance keys come from `rules.base`/`rules.quote` - the pair
/// name is never sliced.
pub fn size_order(
    signal: &TradeSignal,
    book: &OrderBookTop,
    balances: &BalanceSnapshot,
    rules: &MarketRules,
    config: &TradingConfig,
) -> Result<SizedOrder> {
    let limit_price = maker_limit_price(signal.side, book, config.spread_bps)?;

    let volume = match signal.side {
        Side::Buy => buy_volume(
            signal.allocation,
            balances.free(&rules.quote),
            limit_price,
            rules.volume_step,
            config.min_notional,
        )?,
        Side::Sell => sell_volume(signal, balances.free(&rules.base), rules.volume_step)?,
    };

    Ok(SizedOrder {
        pair: rules.pair.clone(),
        side: signal.side,
        limit_price,
        volume,
        post_only: true,
        validate_only: config.dry_run,
    })
}

/// Buy sizing: spend a fraction of the free quote balance
///
/// The candidate spend is lifted to `min_notional` when configured, fails
/// outright if the account cannot meet that floor, and is clamped so we
/// never attempt to spend more than is free.
fn buy_volume(
    allocation: Decimal,
    free_quote: Decimal,
    limit_price: Decimal,
    volume_step: Decimal,
    min_notional: Decimal,
) -> Result<Decimal> {
    if free_quote < min_notional {
        return Err(AppError::InsufficientBalance(format!(
            "free quote balance {} below minimum notional {}",
            free_quote, min_notional
        )));
    }

    let candidate_spend = (free_quote * allocation)
        .max(min_notional)
        .min(free_quote);

    let volume = round_down_to_step(candidate_spend / limit_price, volume_step);
    if volume.is_zero() {
        return Err(AppError::VolumeTooSmall(format!(
            "spend {} at price {} rounds below lot step {}",
            candidate_spend, limit_price, volume_step
        )));
    }

    Ok(volume)
}

/// Sell sizing: a fraction of the free base balance, or all of it
fn sell_volume(signal: &TradeSignal, free_base: Decimal, volume_step: Decimal) -> Result<Decimal> {
    let raw_volume = if signal.liquidate_all {
        free_base
    } else {
        free_base * signal.allocation
    };

    let volume = round_down_to_step(raw_volume, volume_step);
    if volume.is_zero() {
        return Err(AppError::VolumeTooSmall(format!(
            "sell volume {} rounds below lot step {}",
            raw_volume, volume_step
        )));
    }

    Ok(volume)
}

/// Floor a raw volume to an exact multiple of the lot step
fn round_down_to_step(raw: Decimal, step: Decimal) -> Decimal {
    (raw / step).floor() * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rules() -> MarketRules {
        MarketRules {
            pair: "XXBTZUSD".to_string(),
            base: "XXBT".to_string(),
            quote: "ZUSD".to_string(),
            volume_step: dec!(0.0001),
        }
    }

    fn book() -> OrderBookTop {
        OrderBookTop::new(dec!(3000.00), dec!(3000.50))
    }

    fn balances(quote: Decimal, base: Decimal) -> BalanceSnapshot {
        let mut snapshot = BalanceSnapshot::default();
        snapshot.set("ZUSD", quote);
        snapshot.set("XXBT", base);
        snapshot
    }

    fn config() -> TradingConfig {
        TradingConfig::default()
    }

    fn buy_signal(allocation: Decimal) -> TradeSignal {
        TradeSignal::new(Side::Buy, "XBTUSD", allocation).unwrap()
    }

    fn sell_signal(allocation: Decimal) -> TradeSignal {
        TradeSignal::new(Side::Sell, "XBTUSD", allocation).unwrap()
    }

    #[test]
    fn test_buy_worked_example() {
        // freeQuote=1000, alloc=0.20 -> spend 200 at 2998.50 -> 0.0667
        let order = size_order(
            &buy_signal(dec!(0.20)),
            &book(),
            &balances(dec!(1000), dec!(0)),
            &rules(),
            &config(),
        )
        .unwrap();

        assert_eq!(order.limit_price, dec!(2998.50));
        assert_eq!(order.volume, dec!(0.0667));
        assert!(order.post_only);
        assert!(!order.validate_only);
        assert_eq!(order.pair, "XXBTZUSD");
    }

    #[test]
    fn test_volume_is_exact_step_multiple() {
        for (quote, alloc) in [
            (dec!(1000), dec!(0.20)),
            (dec!(123.45), dec!(0.37)),
            (dec!(99999.99), dec!(1.0)),
            (dec!(7.77), dec!(0.5)),
        ] {
            let order = size_order(
                &buy_signal(alloc),
                &book(),
                &balances(quote, dec!(0)),
                &rules(),
                &config(),
            );
            if let Ok(order) = order {
                assert!(order.volume > Decimal::ZERO);
                assert_eq!(order.volume % dec!(0.0001), Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_buy_spend_never_exceeds_free_quote() {
        let free_quote = dec!(250);
        let order = size_order(
            &buy_signal(dec!(1.0)),
            &book(),
            &balances(free_quote, dec!(0)),
            &rules(),
            &config(),
        )
        .unwrap();

        assert!(order.volume * order.limit_price <= free_quote);
    }

    #[test]
    fn test_buy_min_notional_lifts_spend() {
        let mut config = config();
        config.min_notional = dec!(150);

        // 0.20 of 500 is 100, lifted to the 150 floor
        let order = size_order(
            &buy_signal(dec!(0.20)),
            &book(),
            &balances(dec!(500), dec!(0)),
            &rules(),
            &config,
        )
        .unwrap();

        // floor(150 / 2998.50 / 0.0001) * 0.0001 = 0.0500
        assert_eq!(order.volume, dec!(0.0500));
    }

    #[test]
    fn test_buy_insufficient_balance_below_floor() {
        let mut config = config();
        config.min_notional = dec!(50);

        let result = size_order(
            &buy_signal(dec!(0.20)),
            &book(),
            &balances(dec!(40), dec!(0)),
            &rules(),
            &config,
        );
        assert!(matches!(result, Err(AppError::InsufficientBalance(_))));
    }

    #[test]
    fn test_buy_volume_too_small() {
        let result = size_order(
            &buy_signal(dec!(0.20)),
            &book(),
            &balances(dec!(1), dec!(0)),
            &rules(),
            &config(),
        );
        assert!(matches!(result, Err(AppError::VolumeTooSmall(_))));
    }

    #[test]
    fn test_sell_fractional_allocation() {
        let order = size_order(
            &sell_signal(dec!(0.50)),
            &book(),
            &balances(dec!(0), dec!(0.5)),
            &rules(),
            &config(),
        )
        .unwrap();

        assert_eq!(order.volume, dec!(0.2500));
        assert!(order.limit_price > book().best_ask);
    }

    #[test]
    fn test_sell_all_ignores_allocation() {
        let order = size_order(
            &sell_signal(dec!(0.10)).with_liquidate_all(true),
            &book(),
            &balances(dec!(0), dec!(0.73219)),
            &rules(),
            &config(),
        )
        .unwrap();

        // full balance floored to the 0.0001 step
        assert_eq!(order.volume, dec!(0.7321));
    }

    #[test]
    fn test_sell_all_of_nothing_is_too_small() {
        let result = size_order(
            &sell_signal(dec!(0.20)).with_liquidate_all(true),
            &book(),
            &balances(dec!(1000), dec!(0)),
            &rules(),
            &config(),
        );
        assert!(matches!(result, Err(AppError::VolumeTooSmall(_))));
    }

    #[test]
    fn test_sell_uses_resolved_base_key() {
        // Balance is held under the exchange's base key, not the pair name
        let mut snapshot = BalanceSnapshot::default();
        snapshot.set("XXBT", dec!(1.0));

        let order = size_order(
            &sell_signal(dec!(0.25)),
            &book(),
            &snapshot,
            &rules(),
            &config(),
        )
        .unwrap();
        assert_eq!(order.volume, dec!(0.2500));
    }

    #[test]
    fn test_sizing_is_idempotent() {
        let signal = buy_signal(dec!(0.20));
        let snapshot = balances(dec!(1000), dec!(0));
        let a = size_order(&signal, &book(), &snapshot, &rules(), &config()).unwrap();
        let b = size_order(&signal, &book(), &snapshot, &rules(), &config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dry_run_sets_validate_flag() {
        let mut config = config();
        config.dry_run = true;

        let order = size_order(
            &buy_signal(dec!(0.20)),
            &book(),
            &balances(dec!(1000), dec!(0)),
            &rules(),
            &config,
        )
        .unwrap();
        assert!(order.validate_only);
    }
}
