//! Common module - error taxonomy, exchange-facing types, collaborator traits

pub mod errors;
pub mod traits;
pub mod types;
