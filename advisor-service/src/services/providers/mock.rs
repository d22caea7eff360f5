//! Mock provider for testing and local runs without a provider account.

use super::{CompletionProvider, CompletionRequest, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted completion provider that records every request it receives.
pub struct MockCompletionProvider {
    outcome: Result<String, ProviderError>,
    delay: Option<Duration>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionProvider {
    /// Always answer with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering, to exercise deadlines and admission limits.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
        _request_id: Option<&str>,
    ) -> Result<String, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.outcome.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
