//! Server module - webhook HTTP plumbing around the sizing engine

pub mod payload;
pub mod routes;

pub use payload::WebhookPayload;
pub use routes::{router, AppState, SECRET_HEADER};
