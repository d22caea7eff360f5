mod common;

use advisor_service::models::BUDGETS_TABLE;
use advisor_service::services::RowStore;
use common::{read_json, TestApp, TEST_USER_ID};
use serde_json::json;

#[tokio::test]
async fn create_budget_defaults_to_monthly() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let (status, body) = read_json(
        app.post_json(
            "/api/budgets",
            &json!({"user_id": TEST_USER_ID, "category": " Transport ", "amount": 6000}),
        )
        .await,
    )
    .await;

    // Assert
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["category"], "Transport");
    assert_eq!(body["data"][0]["period"], "monthly");
    assert_eq!(app.store.rows(BUDGETS_TABLE).await.len(), 1);
}

#[tokio::test]
async fn invalid_budget_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, body) = read_json(
        app.post_json(
            "/api/budgets",
            &json!({"user_id": TEST_USER_ID, "category": "Food", "amount": 0}),
        )
        .await,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid fields: amount");

    let (status, _) = read_json(
        app.post_json("/api/budgets", &json!({"user_id": TEST_USER_ID, "amount": 10}))
            .await,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(app.store.call_count(), 0);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = TestApp::spawn().await;
    for (category, created_at) in [
        ("Food", "2024-01-01T00:00:00Z"),
        ("Rent", "2024-02-01T00:00:00Z"),
    ] {
        app.store
            .insert(
                BUDGETS_TABLE,
                &json!({
                    "user_id": TEST_USER_ID,
                    "category": category,
                    "amount": 100,
                    "period": "monthly",
                    "created_at": created_at,
                }),
                None,
            )
            .await
            .unwrap();
    }

    let (status, body) =
        read_json(app.get(&format!("/api/budgets?user_id={}", TEST_USER_ID)).await).await;

    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["category"], "Rent");
    assert_eq!(body["data"][1]["category"], "Food");
}

#[tokio::test]
async fn delete_requires_owner() {
    let app = TestApp::spawn().await;
    let (_, created) = read_json(
        app.post_json(
            "/api/budgets",
            &json!({"user_id": TEST_USER_ID, "category": "Food", "amount": 5000, "period": "weekly"}),
        )
        .await,
    )
    .await;
    let id = created["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = read_json(app.delete(&format!("/api/budgets/{}", id)).await).await;
    assert_eq!(status, 400);

    let (status, body) =
        read_json(app.delete(&format!("/api/budgets/{}?user_id=intruder", id)).await).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Budget not found");

    let (status, body) = read_json(
        app.delete(&format!("/api/budgets/{}?user_id={}", id, TEST_USER_ID))
            .await,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["id"], id.as_str());
    assert!(app.store.rows(BUDGETS_TABLE).await.is_empty());

    let (status, _) = read_json(
        app.delete(&format!("/api/budgets/{}?user_id={}", id, TEST_USER_ID))
            .await,
    )
    .await;
    assert_eq!(status, 404);
}
