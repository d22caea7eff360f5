use super::completion_error;
use crate::models::ChatRequest;
use crate::prompts::chat_prompt;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;

/// `POST /api/advisor/chat`.
pub async fn advisor_chat(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::InvalidInput("Message is required".to_string()));
    }

    if !state.config.openai.is_configured() {
        return Err(AppError::Unconfigured(
            "OpenAI API key not configured".to_string(),
        ));
    }

    let reply = state
        .provider
        .complete(
            &chat_prompt(message, req.context.as_ref()),
            Some(request_id.as_str()),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, kind = e.kind(), "Advisor chat failed");
            completion_error(e)
        })?;

    tracing::info!(
        message_len = message.len(),
        has_context = req.context.is_some(),
        "Advisor chat answered"
    );

    Ok(Json(json!({
        "response": reply.trim(),
        "status": "success",
    })))
}
