//! Single path parameter parsed through [`FromStr`].

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::str::FromStr;

/// Extracts the route's single path parameter and parses it as `T`.
///
/// Parse failures become whatever `AppError` the type's error converts to,
/// so an identifier type decides its own status code and message.
///
/// ```ignore
/// async fn delete_item(ParsedPath(id): ParsedPath<ItemId>) -> impl IntoResponse { ... }
///
/// let app = Router::new().route("/{id}", delete(delete_item));
/// ```
pub struct ParsedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ParsedPath<T>
where
    T: FromStr + Send,
    T::Err: Into<AppError>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        raw.parse::<T>().map(ParsedPath).map_err(Into::into)
    }
}
