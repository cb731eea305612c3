//! HTTP mapping for core [`AppError`]s.

use crate::AppError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Realm advertised by admin-only routes.
pub const ADMIN_REALM: &str = "Basic realm=\"Restricted Area\"";

/// Handler error wrapper so core errors can become responses.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        match self.0 {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
            }
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message, "fields": fields })),
            )
                .into_response(),
            AppError::Unauthorized => {
                let mut response = (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Not authorized" })),
                )
                    .into_response();
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(ADMIN_REALM),
                );
                response
            }
            AppError::AllocationExhausted { attempts } => {
                tracing::error!("Could not allocate a paste id after {} attempts", attempts);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": "No paste identifiers available" })),
                )
                    .into_response()
            }
            AppError::Database(ref err) => {
                tracing::error!("Database error: {}", err);
                internal("Database error")
            }
            AppError::StorageMessage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                internal("Database error")
            }
            other => {
                tracing::error!("Internal error: {:?}", other);
                internal("Internal server error")
            }
        }
    }
}

fn internal(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
