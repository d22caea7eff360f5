//! Supabase adapter against a local fake PostgREST endpoint.

use advisor_service::config::{StoreBackend, StoreConfig};
use advisor_service::services::store::supabase::SupabaseStore;
use advisor_service::services::{EqFilter, RowStore, SelectQuery, StoreError};
use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::any,
    Json, Router,
};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Call {
    method: Method,
    query: Option<String>,
    headers: HeaderMap,
}

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

async fn fake_postgrest(status: StatusCode, reply: Value) -> (String, Recorder) {
    let recorder = Recorder::default();

    let app = Router::new()
        .route(
            "/rest/v1/transactions",
            any(
                move |State(recorder): State<Recorder>,
                      method: Method,
                      RawQuery(query): RawQuery,
                      headers: HeaderMap| {
                    let reply = reply.clone();
                    async move {
                        recorder.calls.lock().unwrap().push(Call {
                            method,
                            query,
                            headers,
                        });
                        (status, Json(reply)).into_response()
                    }
                },
            ),
        )
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://127.0.0.1:{}", port), recorder)
}

fn store(url: &str) -> SupabaseStore {
    let config = StoreConfig {
        backend: StoreBackend::Supabase,
        url: url.to_string(),
        key: Secret::new("anon-key".to_string()),
    };
    SupabaseStore::new(&config, reqwest::Client::new()).unwrap()
}

#[tokio::test]
async fn insert_returns_representation() {
    let (url, recorder) =
        fake_postgrest(StatusCode::CREATED, json!([{"id": "t1", "amount": 10}])).await;

    let data = store(&url)
        .insert("transactions", &json!({"amount": 10}), Some("req-1"))
        .await
        .unwrap();

    assert_eq!(data, json!([{"id": "t1", "amount": 10}]));

    let calls = recorder.calls.lock().unwrap();
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].headers["apikey"], "anon-key");
    assert_eq!(calls[0].headers["authorization"], "Bearer anon-key");
    assert_eq!(calls[0].headers["prefer"], "return=representation");
    assert_eq!(calls[0].headers["x-request-id"], "req-1");
}

#[tokio::test]
async fn select_sends_filter_and_order() {
    let (url, recorder) = fake_postgrest(StatusCode::OK, json!([{"id": "a"}, {"id": "b"}])).await;

    let rows = store(&url)
        .select(
            "transactions",
            &SelectQuery::default()
                .filter_eq("user_id", "u1")
                .order_desc("date"),
            None,
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    let calls = recorder.calls.lock().unwrap();
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(
        calls[0].query.as_deref(),
        Some("select=*&user_id=eq.u1&order=date.desc")
    );
}

#[tokio::test]
async fn rejection_keeps_store_message() {
    let (url, _) = fake_postgrest(
        StatusCode::BAD_REQUEST,
        json!({"code": "22P02", "message": "invalid input syntax for type numeric: \"abc\""}),
    )
    .await;

    let err = store(&url)
        .insert("transactions", &json!({"amount": "abc"}), None)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid input syntax for type numeric: \"abc\""
    );
    assert!(matches!(err, StoreError::Rejected { status: 400, .. }));
}

#[tokio::test]
async fn delete_uses_filters() {
    let (url, recorder) = fake_postgrest(StatusCode::OK, json!([{"id": "b1"}])).await;

    let deleted = store(&url)
        .delete(
            "transactions",
            &[EqFilter::new("id", "b1"), EqFilter::new("user_id", "u1")],
            None,
        )
        .await
        .unwrap();

    assert_eq!(deleted.len(), 1);
    let calls = recorder.calls.lock().unwrap();
    assert_eq!(calls[0].method, Method::DELETE);
    assert_eq!(calls[0].query.as_deref(), Some("id=eq.b1&user_id=eq.u1"));
}
