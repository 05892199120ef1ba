use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    extract_ip_from_headers, extract_user_agent, ActingUser, AuditEvent, AuditOutcome, UuidPath,
    ValidatedJson,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::collaborators::{BookingLookup, UserDirectory};
use crate::error::ItemResult;
use crate::models::{
    BookingBrief, Comment, CreateComment, CreateItem, Item, ItemFilter, ItemWithDetails,
    SearchFilter, UpdateItem,
};
use crate::repository::ItemRepository;
use crate::service::ItemService;

const TAG: &str = "items";

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_item,
        own_items,
        search_items,
        get_item,
        update_item,
        add_comment,
    ),
    components(
        schemas(
            Item,
            CreateItem,
            UpdateItem,
            ItemWithDetails,
            Comment,
            CreateComment,
            BookingBrief
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Item listing endpoints")
    )
)]
pub struct ApiDoc;

/// Create the item router with all HTTP endpoints
pub fn router<R, U, B>(service: ItemService<R, U, B>) -> Router
where
    R: ItemRepository + 'static,
    U: UserDirectory + 'static,
    B: BookingLookup + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(own_items).post(create_item))
        .route("/search", get(search_items))
        .route("/{id}", get(get_item).patch(update_item))
        .route("/{id}/comment", post(add_comment))
        .with_state(shared_service)
}

/// List a new item
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created successfully", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    ActingUser(user_id): ActingUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateItem>,
) -> ItemResult<impl IntoResponse>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingLookup,
{
    let item = service.create_item(user_id, input).await?;

    // Audit log successful creation
    AuditEvent::new(
        Some(user_id.to_string()),
        "item.create",
        Some(format!("item:{}", item.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "name": item.name,
        "available": item.available,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(item)))
}

/// The caller's items with comments and booking context, ordered by id
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ItemFilter),
    responses(
        (status = 200, description = "The caller's items", body = Vec<ItemWithDetails>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn own_items<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    ActingUser(user_id): ActingUser,
    Query(filter): Query<ItemFilter>,
) -> ItemResult<Json<Vec<ItemWithDetails>>>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingLookup,
{
    let items = service.own_items(user_id, filter).await?;
    Ok(Json(items))
}

/// Search available items by name or description
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(SearchFilter),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_items<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    Query(filter): Query<SearchFilter>,
) -> ItemResult<Json<Vec<Item>>>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingLookup,
{
    let items = service.search_items(filter).await?;
    Ok(Json(items))
}

/// Get an item with its comments; owners also see booking context
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = ItemWithDetails),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    ActingUser(user_id): ActingUser,
    UuidPath(id): UuidPath,
) -> ItemResult<Json<ItemWithDetails>>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingLookup,
{
    let item = service.get_item(user_id, id).await?;
    Ok(Json(item))
}

/// Update an item (owner only, partial update)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated successfully", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    ActingUser(user_id): ActingUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateItem>,
) -> ItemResult<Json<Item>>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingLookup,
{
    let item = service.update_item(user_id, id, input).await?;
    Ok(Json(item))
}

/// Comment on an item after renting it
#[utoipa::path(
    post,
    path = "/{id}/comment",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_comment<R, U, B>(
    State(service): State<Arc<ItemService<R, U, B>>>,
    ActingUser(user_id): ActingUser,
    UuidPath(id): UuidPath,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateComment>,
) -> ItemResult<impl IntoResponse>
where
    R: ItemRepository,
    U: UserDirectory,
    B: BookingLookup,
{
    let comment = service.add_comment(user_id, id, input).await?;

    // Audit log successful comment
    AuditEvent::new(
        Some(user_id.to_string()),
        "item.comment",
        Some(format!("item:{}", id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok((StatusCode::CREATED, Json(comment)))
}
