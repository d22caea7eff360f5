//! OpenAI chat completions adapter.
//!
//! Non-streaming `POST {base_url}/chat/completions`. Status codes are mapped
//! to [`ProviderError`] variants; no retries are attempted.

use super::{CompletionProvider, CompletionRequest, ProviderError};
use crate::config::OpenAiConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use service_core::observability::outbound_headers;

pub struct OpenAiProvider {
    api_key: Option<Secret<String>>,
    base_url: String,
    model: String,
    client: Client,
}

impl OpenAiProvider {
    /// Build the adapter around a shared HTTP client.
    ///
    /// Deadlines are owned by the admission gate wrapping this provider, so
    /// the client carries none of its own.
    pub fn new(config: &OpenAiConfig, client: Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        }
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
        request_id: Option<&str>,
    ) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().trim().is_empty())
            .ok_or_else(|| ProviderError::NotConfigured("OpenAI API key not set".to_string()))?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(
            model = %self.model,
            prompt_len = request.user.len(),
            max_tokens = request.max_tokens,
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .post(self.api_url())
            .headers(outbound_headers(request_id))
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, retry_after, &error_text));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("Response had no content".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

fn map_error_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited { retry_after },
        _ => ProviderError::ApiError(format!("OpenAI API error {}: {}", status, message)),
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
