//! Maker-side limit price computation

use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::errors::{AppError, Result};
use crate::common::types::{OrderBookTop, Side};

/// Currency precision for limit prices
const PRICE_DECIMALS: u32 = 2;

/// Compute a post-only limit price from the current touch
///
/// Buys are priced below the best bid, sells above the best ask, offset by
/// `spread_bps` and rounded to 2 decimals. Rounding is directional (down
/// for buys, up for sells) so the price stays strictly on the maker side
/// after rounding and the resting order can never cross as taker.
pub fn maker_limit_price(side: Side, book: &OrderBookTop, spread_bps: u32) -> Result<Decimal> {
    let offset = Decimal::from(spread_bps) / Decimal::from(10_000);

    let price = match side {
        Side::Buy => (book.best_bid * (Decimal::ONE - offset))
            .round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::ToZero),
        Side::Sell => (book.best_ask * (Decimal::ONE + offset))
            .round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::AwayFromZero),
    };

    if price <= Decimal::ZERO {
        return Err(AppError::MarketDataUnavailable(format!(
            "limit price rounds to zero at 2dp (bid={} ask={})",
            book.best_bid, book.best_ask
        )));
    }

    Ok(price)
}
