//! HTTP handlers.
//!
//! Dependency errors are converted to [`AppError`] here and nowhere else.

pub mod advice;
pub mod budgets;
pub mod chat;
pub mod health;
pub mod metrics;
pub mod summary;
pub mod transactions;

use crate::services::{ProviderError, StoreError};
use serde::Deserialize;
use service_core::error::AppError;

/// `?user_id=` plus the optional `month` used by the summary.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
    pub month: Option<String>,
}

impl UserQuery {
    /// Blank ids are rejected; anything else is matched exactly as sent.
    pub fn require_user_id(&self) -> Result<&str, AppError> {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::InvalidInput("user_id is required".to_string()))
    }
}

/// Provider failure as seen by the summary and chat endpoints.
pub(crate) fn completion_error(err: ProviderError) -> AppError {
    match err {
        ProviderError::NotConfigured(_) => {
            AppError::Unconfigured("OpenAI API key not configured".to_string())
        }
        ProviderError::Unauthorized(_) => {
            AppError::Unauthorized("Invalid OpenAI API key".to_string())
        }
        ProviderError::RateLimited { retry_after } => AppError::RateLimited(
            "Rate limit exceeded. Please try again later.".to_string(),
            retry_after,
        ),
        ProviderError::ApiError(_) => {
            AppError::ProviderError("OpenAI API error. Please try again.".to_string())
        }
        ProviderError::InvalidResponse(_)
        | ProviderError::NetworkError(_)
        | ProviderError::Timeout => AppError::ProviderError("Internal server error".to_string()),
    }
}

/// Store failures surface with the store's own text.
pub(crate) fn store_error(err: StoreError) -> AppError {
    AppError::StoreError(err.to_string())
}
