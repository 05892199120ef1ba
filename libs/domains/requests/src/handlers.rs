use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
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

use crate::collaborators::{ItemProvider, UserDirectory};
use crate::error::RequestResult;
use crate::models::{
    AnsweringItem, CreateItemRequest, ItemRequest, RequestFilter, RequestWithItems,
};
use crate::repository::RequestRepository;
use crate::service::RequestService;

const TAG: &str = "requests";

/// OpenAPI documentation for Item Requests API
#[derive(OpenApi)]
#[openapi(
    paths(create_request, own_requests, all_requests, get_request),
    components(
        schemas(ItemRequest, CreateItemRequest, RequestWithItems, AnsweringItem),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Item request endpoints")
    )
)]
pub struct ApiDoc;

/// Create the item-request router with all HTTP endpoints
pub fn router<R, U, I>(service: RequestService<R, U, I>) -> Router
where
    R: RequestRepository + 'static,
    U: UserDirectory + 'static,
    I: ItemProvider + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(own_requests).post(create_request))
        .route("/all", get(all_requests))
        .route("/{id}", get(get_request))
        .with_state(shared_service)
}

/// Create an item request
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item request created successfully", body = ItemRequest),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_request<R, U, I>(
    State(service): State<Arc<RequestService<R, U, I>>>,
    ActingUser(user_id): ActingUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateItemRequest>,
) -> RequestResult<impl IntoResponse>
where
    R: RequestRepository,
    U: UserDirectory,
    I: ItemProvider,
{
    let request = service.create_request(user_id, input).await?;

    // Audit log successful creation
    AuditEvent::new(
        Some(user_id.to_string()),
        "request.create",
        Some(format!("request:{}", request.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "description": request.description,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(request)))
}

/// The caller's own item requests, newest first, with answering items
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "The caller's item requests", body = Vec<RequestWithItems>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn own_requests<R, U, I>(
    State(service): State<Arc<RequestService<R, U, I>>>,
    ActingUser(user_id): ActingUser,
) -> RequestResult<Json<Vec<RequestWithItems>>>
where
    R: RequestRepository,
    U: UserDirectory,
    I: ItemProvider,
{
    let requests = service.own_requests(user_id).await?;
    Ok(Json(requests))
}

/// Other users' item requests, newest first, paginated
#[utoipa::path(
    get,
    path = "/all",
    tag = TAG,
    params(RequestFilter),
    responses(
        (status = 200, description = "Other users' item requests", body = Vec<RequestWithItems>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn all_requests<R, U, I>(
    State(service): State<Arc<RequestService<R, U, I>>>,
    ActingUser(user_id): ActingUser,
    Query(filter): Query<RequestFilter>,
) -> RequestResult<Json<Vec<RequestWithItems>>>
where
    R: RequestRepository,
    U: UserDirectory,
    I: ItemProvider,
{
    let requests = service.all_requests(user_id, filter).await?;
    Ok(Json(requests))
}

/// Get an item request by ID with its answering items
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Item request ID")
    ),
    responses(
        (status = 200, description = "Item request found", body = RequestWithItems),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_request<R, U, I>(
    State(service): State<Arc<RequestService<R, U, I>>>,
    ActingUser(user_id): ActingUser,
    UuidPath(id): UuidPath,
) -> RequestResult<Json<RequestWithItems>>
where
    R: RequestRepository,
    U: UserDirectory,
    I: ItemProvider,
{
    let request = service.get_request(user_id, id).await?;
    Ok(Json(request))
}
