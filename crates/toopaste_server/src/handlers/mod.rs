//! HTTP request handlers.

/// Index, language, and theme metadata endpoints.
pub mod meta;
pub(crate) mod normalize;
/// Paste creation, delivery, listing, and deletion endpoints.
pub mod paste;

use crate::{error::HttpError, AppError};

/// Run blocking store work off the async executor.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, HttpError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(HttpError::from),
        Err(err) => {
            tracing::error!("Blocking store task failed: {}", err);
            Err(AppError::Internal.into())
        }
    }
}
