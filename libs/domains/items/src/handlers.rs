use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use axum_helpers::{
    ErrorCode, ErrorResponse, ParsedPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, DuplicateResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ItemResult;
use crate::models::{Item, ItemCreated, ItemId, ItemPayload, ItemReplacement, MessageResponse};
use crate::repository::ItemRepository;
use crate::service::ItemService;

const FETCH_FAILED: &str = "Failed to fetch the items";
const ADD_FAILED: &str = "Failed to add item";
const UPDATE_FAILED: &str = "Failed to update item";
const DELETE_FAILED: &str = "Failed to delete item";

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_items,
        list_by_category,
        list_by_designer,
        create_item,
        replace_item,
        delete_item,
        delete_item_by_design_name,
    ),
    components(
        schemas(Item, ItemPayload, ItemCreated, MessageResponse, ErrorResponse, ErrorCode),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            DuplicateResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Furniture design catalogue")
    )
)]
pub struct ApiDoc;

/// Create the items router with all HTTP endpoints
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_items))
        .route("/category/{category}", get(list_by_category))
        .route("/designer/{designer}", get(list_by_designer))
        .route("/design/{design_name}", delete(delete_item_by_design_name))
        // POST takes a category here, PUT and DELETE an item id
        .route(
            "/{id}",
            post(create_item).put(replace_item).delete(delete_item),
        )
        .with_state(shared_service)
}

/// List every item
#[utoipa::path(
    get,
    path = "",
    tag = "Items",
    responses(
        (status = 200, description = "All items", body = Vec<Item>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
) -> ItemResult<Json<Vec<Item>>> {
    let items = service
        .list_items()
        .await
        .map_err(|e| e.masked(FETCH_FAILED))?;
    Ok(Json(items))
}

/// List items in a category (exact match)
#[utoipa::path(
    get,
    path = "/category/{category}",
    tag = "Items",
    params(
        ("category" = String, Path, description = "Category, case-sensitive")
    ),
    responses(
        (status = 200, description = "Items in the category", body = Vec<Item>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_category<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(category): Path<String>,
) -> ItemResult<Json<Vec<Item>>> {
    let items = service
        .list_by_category(&category)
        .await
        .map_err(|e| e.masked(FETCH_FAILED))?;
    Ok(Json(items))
}

/// List items by designer, ignoring case
#[utoipa::path(
    get,
    path = "/designer/{designer}",
    tag = "Items",
    params(
        ("designer" = String, Path, description = "Designer name, matched whole and case-insensitively")
    ),
    responses(
        (status = 200, description = "Items by the designer", body = Vec<Item>),
        (status = 404, description = "No items for this designer", body = MessageResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_designer<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(designer): Path<String>,
) -> ItemResult<Response> {
    let items = service
        .list_by_designer(&designer)
        .await
        .map_err(|e| e.masked(FETCH_FAILED))?;

    if items.is_empty() {
        let body = MessageResponse::new("No products found for this designer");
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    }
    Ok(Json(items).into_response())
}

/// Add an item to a category
#[utoipa::path(
    post,
    path = "/{category}",
    tag = "Items",
    params(
        ("category" = String, Path, description = "Category the item is filed under")
    ),
    request_body = ItemPayload,
    responses(
        (status = 201, description = "Item created", body = ItemCreated),
        (status = 400, response = BadRequestValidationResponse),
        (status = 400, response = DuplicateResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(category): Path<String>,
    ValidatedJson(payload): ValidatedJson<ItemPayload>,
) -> ItemResult<impl IntoResponse> {
    let inserted_id = service
        .create_item(category, payload)
        .await
        .map_err(|e| e.masked(ADD_FAILED))?;

    Ok((
        StatusCode::CREATED,
        Json(ItemCreated {
            message: "Item successfully added".to_string(),
            inserted_id,
        }),
    ))
}

/// Replace an item's fields
///
/// `_id` and `category` in the body are ignored. Optional fields left out
/// are removed from the stored item.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = String, Path, description = "Item ID (24 hex characters)")
    ),
    request_body = ItemPayload,
    responses(
        (status = 200, description = "Item updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ParsedPath(id): ParsedPath<ItemId>,
    ValidatedJson(ItemReplacement(payload)): ValidatedJson<ItemReplacement>,
) -> ItemResult<Json<MessageResponse>> {
    service
        .replace_item(id, payload)
        .await
        .map_err(|e| e.masked(UPDATE_FAILED))?;
    Ok(Json(MessageResponse::new("Item successfully updated")))
}

/// Delete an item by ID
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = String, Path, description = "Item ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ParsedPath(id): ParsedPath<ItemId>,
) -> ItemResult<Json<MessageResponse>> {
    service
        .delete_item(id)
        .await
        .map_err(|e| e.masked(DELETE_FAILED))?;
    Ok(Json(MessageResponse::new("Item deleted successfully")))
}

/// Delete the first item with a design name, ignoring case
#[utoipa::path(
    delete,
    path = "/design/{design_name}",
    tag = "Items",
    params(
        ("design_name" = String, Path, description = "Design name, matched whole and case-insensitively")
    ),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item_by_design_name<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(design_name): Path<String>,
) -> ItemResult<Json<MessageResponse>> {
    service
        .delete_item_by_design_name(&design_name)
        .await
        .map_err(|e| e.masked(DELETE_FAILED))?;
    Ok(Json(MessageResponse::new("Item deleted successfully")))
}
