//! Webhook HTTP routing and handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::payload::WebhookPayload;
use crate::common::errors::AppError;
use crate::common::traits::ExchangeClient;
use crate::engine::service::TradeService;

/// Header carrying the shared secret, as sent by TradingView alert setups
pub const SECRET_HEADER: &str = "Tradingview-Secret";

/// Shared handler state
pub struct AppState<C: ExchangeClient> {
    pub service: Arc<TradeService<C>>,
    pub shared_secret: String,
}

impl<C: ExchangeClient> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            shared_secret: self.shared_secret.clone(),
        }
    }
}

/// Build the application router
pub fn router<C: ExchangeClient + 'static>(state: AppState<C>) -> Router {
    Router::new()
        .route("/webhook", post(webhook::<C>))
        .route("/health", get(health::<C>))
        .with_state(state)
}

/// `POST /webhook` - authenticate, parse, size, place
///
/// The shared-secret check runs before the body is even parsed; the body
/// is read as raw bytes (TradingView does not always send a JSON
/// content type).
#[instrument(skip(state, headers, body))]
async fn webhook<C: ExchangeClient + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !is_authorized(&headers, &state.shared_secret) {
        warn!("webhook rejected: bad or missing shared secret");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "status": "error",
                "kind": "forbidden",
                "message": "invalid shared secret",
            })),
        )
            .into_response();
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            return error_response(&AppError::BadSignal(format!("invalid JSON body: {}", e)))
        }
    };

    let default_allocation = state.service.trading_config().alloc_pct;
    let signal = match payload.into_signal(default_allocation) {
        Ok(signal) => signal,
        Err(e) => return error_response(&e),
    };

    info!(
        "webhook accepted: {} {} alloc={} liquidate_all={}",
        signal.side, signal.pair, signal.allocation, signal.liquidate_all
    );

    match state.service.handle_signal(&signal).await {
        Ok(placement) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "side": placement.order.side,
                "pair": placement.order.pair,
                "price": placement.order.limit_price,
                "volume": placement.order.volume,
                "validate_only": placement.order.validate_only,
                "exchange": placement.exchange,
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /health` - exchange reachability probe
async fn health<C: ExchangeClient + 'static>(State(state): State<AppState<C>>) -> Response {
    match state.service.exchange().server_time().await {
        Ok(unixtime) => (
            StatusCode::OK,
            Json(json!({"status": "ok", "exchange_time": unixtime})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "degraded", "message": e.to_string()})),
        )
            .into_response(),
    }
}

fn is_authorized(headers: &HeaderMap, shared_secret: &str) -> bool {
    headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == shared_secret)
        .unwrap_or(false)
}

/// Map an engine error onto an HTTP status and JSON body
fn error_response(error: &AppError) -> Response {
    let status = match error {
        AppError::BadSignal(_) => StatusCode::BAD_REQUEST,
        AppError::InsufficientBalance(_) | AppError::VolumeTooSmall(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AppError::MarketDataUnavailable(_) | AppError::OrderRejected(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    warn!("signal failed ({}): {}", error.kind(), error);

    (
        status,
        Json(json!({
            "status": "error",
            "kind": error.kind(),
            "message": error.to_string(),
        })),
    )
        .into_response()
}
