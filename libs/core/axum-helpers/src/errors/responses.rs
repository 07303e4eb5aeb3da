//! Reusable OpenAPI response components so every route documents its
//! errors with the same [`ErrorResponse`] shape.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "error": "Failed to fetch the items",
        "code": "INTERNAL_ERROR"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "error": "photo: must not be empty",
        "code": "VALIDATION_ERROR",
        "details": {
            "photo": [{
                "code": "length",
                "message": "must not be empty",
                "params": {"min": 1, "value": ""}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Malformed identifier",
    content_type = "application/json",
    example = json!({
        "error": "Invalid item ID format",
        "code": "INVALID_ID"
    })
)]
pub struct BadRequestIdResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Resource already exists",
    content_type = "application/json",
    example = json!({
        "error": "Item already exists",
        "code": "DUPLICATE"
    })
)]
pub struct DuplicateResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "error": "Item not found",
        "code": "NOT_FOUND"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);
