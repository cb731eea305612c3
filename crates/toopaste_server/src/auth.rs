//! HTTP basic auth guard for admin-only routes.

use crate::AppError;
use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine};
use toopaste_core::constants::ADMIN_USERNAME;

/// Decode `Authorization: Basic ...` into `(user, password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value
        .strip_prefix("Basic ")
        .or_else(|| value.strip_prefix("basic "))?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Require the admin user with `password`.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] when credentials are missing or wrong.
pub fn require_admin(headers: &HeaderMap, password: &str) -> Result<(), AppError> {
    match basic_credentials(headers) {
        Some((user, given)) if user == ADMIN_USERNAME && given == password => Ok(()),
        Some((user, _)) => {
            tracing::warn!("Rejected admin credentials for user '{}'", user);
            Err(AppError::Unauthorized)
        }
        None => Err(AppError::Unauthorized),
    }
}
