//! Order sizing & placement engine
//!
//! The decision core of the bridge. Each inbound signal is handled as one
//! self-contained pass with no state carried between calls:
//!
//! ```text
//! TradeSignal
//!      │
//!      ▼
//! snapshot fetch (rules, top-of-book, balances - fresh every time)
//!      │
//!      ▼
//! size_order: maker price inside the spread, fractional allocation,
//!             lot-step flooring, notional/balance checks
//!      │
//!      ▼
//! single AddOrder submission (post-only, validate flag in dry-run)
//! ```
//!
//! # Components
//!
//! - [`TradeSignal`]: validated inbound signal
//! - [`pricing::maker_limit_price`]: post-only price strictly inside the touch
//! - [`sizing::size_order`]: pure sizing function, snapshot in, order out
//! - [`TradeService`]: fetch-size-submit orchestration over an [`ExchangeClient`]
//!
//! [`ExchangeClient`]: crate::common::traits::ExchangeClient

pub mod pricing;
pub mod service;
pub mod sizing;
pub mod types;

pub use pricing::maker_limit_price;
pub use service::TradeService;
pub use sizing::size_order;
pub use types::{OrderPlacement, TradeSignal};
