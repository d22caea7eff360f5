use super::completion_error;
use crate::prompts::summary_prompt;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;

/// `POST /api/summary`: free-text financial data in, summary out.
pub async fn generate_summary(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let payload = body.map(|Json(v)| v).unwrap_or(Value::Null);

    let text = payload
        .get("text")
        .ok_or_else(|| AppError::InvalidInput("Text payload is required".to_string()))?
        .as_str()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Text cannot be empty".to_string()))?;

    if !state.config.openai.is_configured() {
        tracing::warn!("Summary requested but no OpenAI API key is configured");
        return Err(AppError::Unconfigured(
            "OpenAI API key not configured".to_string(),
        ));
    }

    let summary = state
        .provider
        .complete(&summary_prompt(text), Some(request_id.as_str()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, kind = e.kind(), "Summary generation failed");
            completion_error(e)
        })?;

    tracing::info!(text_len = text.len(), "Generated summary");

    Ok(Json(json!({
        "summary": summary.trim(),
        "status": "success",
    })))
}
