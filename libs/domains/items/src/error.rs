use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found")]
    NotFound,

    #[error("Item already exists")]
    Duplicate,

    #[error("Invalid item ID format: {0}")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

impl ItemError {
    /// Replaces database and internal failures with `public_message`, logging
    /// the underlying detail. Client errors pass through unchanged.
    pub fn masked(self, public_message: &str) -> Self {
        match self {
            ItemError::Database(detail) | ItemError::Internal(detail) => {
                tracing::error!(error = %detail, "{}", public_message);
                ItemError::Internal(public_message.to_string())
            }
            other => other,
        }
    }
}

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound => AppError::NotFound("Item not found".to_string()),
            ItemError::Duplicate => AppError::Duplicate("Item already exists".to_string()),
            ItemError::InvalidId(raw) => {
                tracing::debug!(id = %raw, "Rejected malformed item id");
                AppError::InvalidId("Invalid item ID format".to_string())
            }
            ItemError::Validation(msg) => AppError::InvalidBody(msg),
            ItemError::Database(detail) => {
                tracing::error!(error = %detail, "Unmasked database error");
                AppError::InternalServerError(ErrorCode::InternalError.default_message().to_string())
            }
            ItemError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for ItemError {
    fn from(err: mongodb::error::Error) -> Self {
        ItemError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ItemError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ItemError::Internal(format!("BSON serialization failed: {}", err))
    }
}
