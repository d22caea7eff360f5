use super::{store_error, UserQuery};
use crate::models::{BudgetRow, NewBudget, BUDGETS_TABLE};
use crate::services::{EqFilter, SelectQuery};
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;

pub async fn create_budget(
    State(state): State<AppState>,
    request_id: RequestId,
    ValidatedJson(budget): ValidatedJson<NewBudget>,
) -> Result<Json<Value>, AppError> {
    let row = serde_json::to_value(BudgetRow::from(budget))
        .map_err(|e| AppError::InternalError(e.into()))?;

    let data = state
        .store
        .insert(BUDGETS_TABLE, &row, Some(request_id.as_str()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, kind = e.kind(), "Failed to insert budget");
            store_error(e)
        })?;

    Ok(Json(json!({ "status": "success", "data": data })))
}

/// Newest budgets first.
pub async fn list_budgets(
    State(state): State<AppState>,
    request_id: RequestId,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let user_id = query.require_user_id()?;

    let select = SelectQuery::default()
        .filter_eq("user_id", user_id)
        .order_desc("created_at");

    let rows = state
        .store
        .select(BUDGETS_TABLE, &select, Some(request_id.as_str()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, kind = e.kind(), "Failed to fetch budgets");
            store_error(e)
        })?;

    Ok(Json(json!({ "status": "success", "data": rows })))
}

/// Deletes only when both the id and the owner match.
pub async fn delete_budget(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let user_id = query.require_user_id()?;

    let filters = [EqFilter::new("id", id.as_str()), EqFilter::new("user_id", user_id)];
    let deleted = state
        .store
        .delete(BUDGETS_TABLE, &filters, Some(request_id.as_str()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, kind = e.kind(), "Failed to delete budget");
            store_error(e)
        })?;

    if deleted.is_empty() {
        return Err(AppError::NotFound("Budget not found".to_string()));
    }

    tracing::info!(budget_id = %id, "Budget deleted");

    Ok(Json(json!({ "status": "success", "data": deleted })))
}
