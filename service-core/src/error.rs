use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy shared by every handler.
///
/// Handlers convert dependency errors into one of these at their own
/// boundary; nothing else escapes into the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not configured: {0}")]
    Unconfigured(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String, Option<u64>),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Request timed out")]
    RequestTimeout,

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimited(..) => StatusCode::TOO_MANY_REQUESTS,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Unconfigured(_)
            | AppError::ProviderError(_)
            | AppError::StoreError(_)
            | AppError::ConfigError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = err.errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        AppError::InvalidInput(format!("Invalid fields: {}", fields.join(", ")))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let status = self.status();
        let (error_message, details, retry_after) = match self {
            AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::Unconfigured(msg)
            | AppError::Unauthorized(msg)
            | AppError::ProviderError(msg)
            | AppError::StoreError(msg) => (msg, None, None),
            AppError::RateLimited(msg, retry) => (msg, None, retry),
            AppError::RequestTimeout => ("Request timed out".to_string(), None, None),
            AppError::ConfigError(err) => (
                "Configuration error".to_string(),
                Some(err.to_string()),
                None,
            ),
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Unhandled internal error");
                ("Internal server error".to_string(), None, None)
            }
        };

        let mut res = (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
            }),
        )
            .into_response();

        if let Some(retry) = retry_after {
            res.headers_mut()
                .insert(axum::http::header::RETRY_AFTER, retry.into());
        }

        res
    }
}
