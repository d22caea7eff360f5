use crate::error::AppError;
use axum::BoxError;

/// Error handler for `HandleErrorLayer` in front of `tower::timeout`.
///
/// Expiry becomes the usual JSON error body with status 408.
pub async fn handle_timeout_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::RequestTimeout
    } else {
        AppError::InternalError(anyhow::anyhow!("unhandled middleware error: {}", err))
    }
}
