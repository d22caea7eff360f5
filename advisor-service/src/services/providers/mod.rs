//! Chat completion provider abstraction.
//!
//! Handlers only see [`CompletionProvider`]; the OpenAI adapter and the
//! scripted mock are interchangeable behind it.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Rate limited")]
    RateLimited { retry_after: Option<u64> },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider call timed out")]
    Timeout,
}

impl ProviderError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::Unauthorized(_) => "unauthorized",
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::Timeout => "timeout",
        }
    }
}

/// One system/user message pair plus sampling bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Trait for chat completion backends.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion and return the generated text, untrimmed.
    async fn complete(
        &self,
        request: &CompletionRequest,
        request_id: Option<&str>,
    ) -> Result<String, ProviderError>;

    /// Provider name used in metrics labels.
    fn name(&self) -> &'static str;
}
