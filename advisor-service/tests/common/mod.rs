#![allow(dead_code)]

use advisor_service::config::AdvisorConfig;
use advisor_service::services::providers::mock::MockCompletionProvider;
use advisor_service::services::store::memory::InMemoryStore;
use advisor_service::startup::{AppState, Application};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_USER_ID: &str = "user-123";
pub const MOCK_REPLY: &str = "  Save 20% of your income in a SACCO.  ";

pub struct TestApp {
    pub address: String,
    pub provider: Arc<MockCompletionProvider>,
    pub store: Arc<InMemoryStore>,
    client: reqwest::Client,
}

/// In-memory store, a provider key set, random port.
pub fn test_config() -> AdvisorConfig {
    let mut config = AdvisorConfig::local().with_openai_key("sk-test");
    config.common.host = "127.0.0.1".to_string();
    config.common.port = 0;
    config
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config(), MockCompletionProvider::replying(MOCK_REPLY)).await
    }

    pub async fn spawn_with(config: AdvisorConfig, provider: MockCompletionProvider) -> Self {
        let provider = Arc::new(provider);
        let store = Arc::new(InMemoryStore::new());

        let state = AppState::new(config, provider.clone(), store.clone());
        let app = Application::with_state(state)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/api/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            provider,
            store,
            client,
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Status plus parsed JSON body.
pub async fn read_json(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json().await.expect("Failed to parse response");
    (status, body)
}
