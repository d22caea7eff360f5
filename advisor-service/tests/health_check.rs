mod common;

use advisor_service::config::AdvisorConfig;
use advisor_service::services::providers::mock::MockCompletionProvider;
use common::{read_json, test_config, TestApp};

#[tokio::test]
async fn health_check_reports_configured_provider() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.get("/api/health").await;

    // Assert
    assert!(response.headers().contains_key("x-request-id"));
    let (status, body) = read_json(response).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["openai_configured"], true);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn health_check_without_key() {
    let mut config = AdvisorConfig::local();
    config.common.host = "127.0.0.1".to_string();
    config.common.port = 0;
    let app = TestApp::spawn_with(config, MockCompletionProvider::replying("unused")).await;

    let (status, body) = read_json(app.get("/api/health").await).await;

    assert_eq!(status, 200);
    assert_eq!(body["openai_configured"], false);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .get(format!("{}/api/health", app.address))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn cors_preflight_allows_frontend_origin() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/summary", app.address),
        )
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    let app = TestApp::spawn().await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn whole_request_timeout_returns_408() {
    let mut config = test_config();
    config.limits.request_timeout = std::time::Duration::from_millis(50);
    config.limits.provider_timeout = std::time::Duration::from_secs(5);
    let provider = MockCompletionProvider::replying("late")
        .with_delay(std::time::Duration::from_millis(500));
    let app = TestApp::spawn_with(config, provider).await;

    let (status, body) = read_json(
        app.post_json("/api/summary", &serde_json::json!({"text": "rent 10000"}))
            .await,
    )
    .await;

    assert_eq!(status, 408);
    assert_eq!(body["error"], "Request timed out");
}
