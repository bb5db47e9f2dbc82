//! Authentication utilities for the Kraken private API

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

use crate::common::errors::{AppError, Result};

type HmacSha512 = Hmac<Sha512>;

/// Generate the API-Sign value for a private endpoint request
///
/// Kraken's scheme: `HMAC-SHA512(path || SHA256(nonce || postdata))` keyed
/// with the base64-decoded API secret, output base64 encoded. The nonce
/// also appears inside `postdata` as the `nonce=` field.
///
/// # Arguments
/// * `secret` - API secret (base64 encoded)
/// * `path` - URI path of the endpoint, e.g. `/0/private/AddOrder`
/// * `nonce` - Monotonically increasing nonce (milliseconds timestamp)
/// * `postdata` - URL-encoded request body, including the nonce field
pub fn sign_request(secret: &str, path: &str, nonce: u64, postdata: &str) -> Result<String> {
    let secret_bytes = BASE64
        .decode(secret)
        .map_err(|e| AppError::Authentication(format!("Failed to decode secret: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(nonce.to_string().as_bytes());
    hasher.update(postdata.as_bytes());
    let digest = hasher.finalize();

    let mut mac = HmacSha512::new_from_slice(&secret_bytes)
        .map_err(|e| AppError::Authentication(format!("Failed to create HMAC: {}", e)))?;
    mac.update(path.as_bytes());
    mac.update(&digest);

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Fresh nonce for a private request
pub fn next_nonce() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
