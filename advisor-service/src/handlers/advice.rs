use crate::models::{mistyped_fields, AdviceProfile, AdviceRequest};
use crate::prompts::advice_prompt;
use crate::startup::AppState;
use crate::utils::parse_validated;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;

const ADVICE_FAILED: &str = "Failed to generate advice";

/// `POST /api/financial-advice`.
///
/// Input problems are 400s; every other failure is the same 500.
pub async fn financial_advice(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let payload = match body {
        Ok(Json(v)) if v.as_object().is_some_and(|o| !o.is_empty()) => v,
        _ => {
            return Err(AppError::InvalidInput(
                "Request data is required".to_string(),
            ))
        }
    };

    let mistyped = mistyped_fields(&payload);
    if !mistyped.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Invalid fields: {}",
            mistyped.join(", ")
        )));
    }
    let profile = AdviceProfile::from(parse_validated::<AdviceRequest>(payload)?);

    if !state.config.openai.is_configured() {
        tracing::warn!("Advice requested but no OpenAI API key is configured");
        return Err(AppError::ProviderError(ADVICE_FAILED.to_string()));
    }

    let advice = state
        .provider
        .complete(&advice_prompt(&profile), Some(request_id.as_str()))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, kind = e.kind(), "Error generating financial advice");
            AppError::ProviderError(ADVICE_FAILED.to_string())
        })?;

    tracing::info!(goals = profile.goals.len(), "Generated financial advice");

    Ok(Json(json!({
        "advice": advice.trim(),
        "status": "success",
    })))
}
