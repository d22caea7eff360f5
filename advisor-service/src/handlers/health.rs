use crate::startup::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Liveness plus whether a provider key was configured. Never fails.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Advisor backend is running",
        "openai_configured": state.config.openai.is_configured(),
    }))
}
