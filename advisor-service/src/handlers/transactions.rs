use super::{store_error, UserQuery};
use crate::models::{missing_fields, summarize, Month, TRANSACTIONS_TABLE};
use crate::services::SelectQuery;
use crate::startup::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;

/// `POST /api/transactions`: the body is stored as-is once the
/// required keys are present.
pub async fn create_transaction(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let payload = body.map(|Json(v)| v).unwrap_or(Value::Null);

    let missing = missing_fields(&payload);
    if !missing.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let data = state
        .store
        .insert(TRANSACTIONS_TABLE, &payload, Some(request_id.as_str()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, kind = e.kind(), "Failed to insert transaction");
            store_error(e)
        })?;

    let user_id = payload
        .get("user_id")
        .and_then(Value::as_str)
        .unwrap_or_default();
    tracing::info!(user_id = %user_id, "Transaction created");

    Ok(Json(json!({ "status": "success", "data": data })))
}

/// `GET /api/transactions?user_id=`, newest `date` first.
pub async fn list_transactions(
    State(state): State<AppState>,
    request_id: RequestId,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let user_id = query.require_user_id()?;

    let rows = select_for_user(&state, user_id, &request_id).await?;

    tracing::debug!(user_id = %user_id, rows = rows.len(), "Transactions fetched");

    Ok(Json(json!({ "status": "success", "data": rows })))
}

/// `GET /api/transactions/summary?user_id=&month=YYYY-MM`.
pub async fn transaction_summary(
    State(state): State<AppState>,
    request_id: RequestId,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let user_id = query.require_user_id()?;

    let month = match query.month.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(Month::parse(raw).ok_or_else(|| {
            AppError::InvalidInput("month must be in YYYY-MM format".to_string())
        })?),
    };

    let rows = select_for_user(&state, user_id, &request_id).await?;
    let summary = summarize(&rows, month.as_ref());

    Ok(Json(json!({ "status": "success", "data": summary })))
}

async fn select_for_user(
    state: &AppState,
    user_id: &str,
    request_id: &RequestId,
) -> Result<Vec<Value>, AppError> {
    let query = SelectQuery::default()
        .filter_eq("user_id", user_id)
        .order_desc("date");

    state
        .store
        .select(TRANSACTIONS_TABLE, &query, Some(request_id.as_str()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, kind = e.kind(), "Failed to fetch transactions");
            store_error(e)
        })
}
