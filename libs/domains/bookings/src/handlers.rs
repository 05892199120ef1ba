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
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::collaborators::{ItemDirectory, UserDirectory};
use crate::error::BookingResult;
use crate::models::{Booking, BookingStatus, CreateBooking, ListParams};
use crate::repository::BookingRepository;
use crate::service::BookingService;

const TAG: &str = "bookings";

/// OpenAPI documentation for Bookings API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_booking,
        decide_booking,
        get_booking,
        list_for_booker,
        list_for_owner,
    ),
    components(
        schemas(Booking, CreateBooking, BookingStatus),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Booking lifecycle endpoints")
    )
)]
pub struct ApiDoc;

/// Create the booking router with all HTTP endpoints
pub fn router<R, U, I>(service: BookingService<R, U, I>) -> Router
where
    R: BookingRepository + 'static,
    U: UserDirectory + 'static,
    I: ItemDirectory + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_for_booker).post(create_booking))
        .route("/owner", get(list_for_owner))
        .route("/{id}", get(get_booking).patch(decide_booking))
        .with_state(shared_service)
}

/// The owner's verdict on a waiting booking
#[derive(Debug, Deserialize, IntoParams)]
pub struct DecideParams {
    pub approved: bool,
}

/// Book an item for a time span
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created waiting for the owner's decision", body = Booking),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_booking<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    ActingUser(user_id): ActingUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateBooking>,
) -> BookingResult<impl IntoResponse>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let booking = service.create_booking(user_id, input).await?;

    // Audit log successful creation
    AuditEvent::new(
        Some(user_id.to_string()),
        "booking.create",
        Some(format!("booking:{}", booking.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "item_id": booking.item_id,
        "start": booking.start,
        "end": booking.end,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Approve or reject a waiting booking (owner only, single-shot)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Booking ID"),
        DecideParams
    ),
    responses(
        (status = 200, description = "Booking decided", body = Booking),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn decide_booking<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    ActingUser(user_id): ActingUser,
    UuidPath(id): UuidPath,
    Query(params): Query<DecideParams>,
    headers: HeaderMap,
) -> BookingResult<Json<Booking>>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let booking = service
        .decide_booking(user_id, id, params.approved)
        .await?;

    // Audit log the decision
    AuditEvent::new(
        Some(user_id.to_string()),
        "booking.decide",
        Some(format!("booking:{}", id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "approved": params.approved,
    }))
    .log();

    Ok(Json(booking))
}

/// Get a booking (visible to its booker and the item's owner)
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_booking<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    ActingUser(user_id): ActingUser,
    UuidPath(id): UuidPath,
) -> BookingResult<Json<Booking>>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let booking = service.get_booking(user_id, id).await?;
    Ok(Json(booking))
}

/// The caller's bookings in a state bucket, newest start first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListParams),
    responses(
        (status = 200, description = "The caller's bookings", body = Vec<Booking>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_for_booker<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    ActingUser(user_id): ActingUser,
    Query(params): Query<ListParams>,
) -> BookingResult<Json<Vec<Booking>>>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let bookings = service.list_for_booker(user_id, params).await?;
    Ok(Json(bookings))
}

/// Bookings of the caller's items in a state bucket, newest start first
#[utoipa::path(
    get,
    path = "/owner",
    tag = TAG,
    params(ListParams),
    responses(
        (status = 200, description = "Bookings of the caller's items", body = Vec<Booking>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_for_owner<R, U, I>(
    State(service): State<Arc<BookingService<R, U, I>>>,
    ActingUser(user_id): ActingUser,
    Query(params): Query<ListParams>,
) -> BookingResult<Json<Vec<Booking>>>
where
    R: BookingRepository,
    U: UserDirectory,
    I: ItemDirectory,
{
    let bookings = service.list_for_owner(user_id, params).await?;
    Ok(Json(bookings))
}
