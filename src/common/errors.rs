//! Error types for the application

use thiserror::Error;

/// Result type alias using our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for signal handling and exchange operations
///
/// Every failure is terminal for the signal being processed - nothing here
/// is retried internally. `kind()` gives the stable wire name surfaced in
/// error responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Order book or balance fetch failed, or the exchange returned
    /// malformed/empty market data
    #[error("Market data unavailable: {0}")]
    MarketDataUnavailable(String),

    /// Free balance below the required floor
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    /// Computed volume rounds to zero after lot-step rounding
    #[error("Volume too small: {0}")]
    VolumeTooSmall(String),

    /// Missing or invalid side, pair, or allocation in the inbound signal
    #[error("Bad signal: {0}")]
    BadSignal(String),

    /// Exchange refused the order submission
    #[error("Order rejected by exchange: {0}")]
    OrderRejected(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind, used in JSON error responses
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MarketDataUnavailable(_) => "market_data_unavailable",
            AppError::InsufficientBalance(_) => "insufficient_balance",
            AppError::VolumeTooSmall(_) => "volume_too_small",
            AppError::BadSignal(_) => "bad_signal",
            AppError::OrderRejected(_) => "order_rejected",
            AppError::Authentication(_) => "authentication",
            AppError::Configuration(_) => "configuration",
            AppError::HttpRequest(_) | AppError::JsonParse(_) | AppError::Internal(_) => "internal",
        }
    }
}
