//! JSON body extractor that deserializes and validates in one step.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

/// JSON extractor with validation through the `validator` crate.
///
/// Failures are reported as [`AppError`]s:
/// - missing content type or malformed JSON keep axum's status (415 / 400)
/// - well-formed JSON of the wrong shape (missing field, wrong type,
///   unknown key) is a 400 carrying serde's message
/// - field rule violations are a 400 with per-field details
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateItem {
///     #[validate(length(min = 1))]
///     design_name: String,
/// }
///
/// async fn create(ValidatedJson(payload): ValidatedJson<CreateItem>) -> StatusCode { ... }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;

        let data: T =
            serde_json::from_value(value).map_err(|e| AppError::InvalidBody(e.to_string()))?;
        data.validate()?;

        Ok(ValidatedJson(data))
    }
}
