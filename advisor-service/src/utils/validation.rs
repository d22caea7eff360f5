use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use service_core::error::AppError;
use validator::Validate;

/// JSON body that has passed `validator` checks.
///
/// Both malformed JSON and rule violations reject with a 400 `AppError`.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::InvalidInput(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Same policy for a body already read as a JSON value.
pub fn parse_validated<T>(value: Value) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(value)
        .map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e)))?;
    parsed.validate()?;
    Ok(parsed)
}
