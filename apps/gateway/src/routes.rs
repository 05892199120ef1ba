//! Edge validation and forwarding for every API route
//!
//! Each handler validates headers, query parameters and DTOs before
//! anything leaves the process; valid requests are forwarded verbatim
//! and the upstream response passes through unchanged.

use axum::extract::{Query, RawQuery, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::AppError;
use axum_helpers::extractors::{ActingUser, UuidPath};
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;
use validator::Validate;

use crate::client::ApiClient;
use domain_bookings::{CreateBooking, ListParams, SearchState};
use domain_items::{CreateComment, CreateItem, ItemFilter, SearchFilter, UpdateItem};
use domain_requests::{CreateItemRequest, RequestFilter};
use domain_users::{CreateUser, UpdateUser};

pub fn router(client: ApiClient) -> Router {
    Router::new()
        .nest("/users", users_routes())
        .nest("/items", items_routes())
        .nest("/bookings", bookings_routes())
        .nest("/requests", requests_routes())
        .with_state(client)
}

fn users_routes() -> Router<ApiClient> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

fn items_routes() -> Router<ApiClient> {
    Router::new()
        .route("/", get(own_items).post(create_item))
        .route("/search", get(search_items))
        .route("/{id}", get(get_item).patch(update_item))
        .route("/{id}/comment", axum::routing::post(add_comment))
}

fn bookings_routes() -> Router<ApiClient> {
    Router::new()
        .route("/", get(list_for_booker).post(create_booking))
        .route("/owner", get(list_for_owner))
        .route("/{id}", get(get_booking).patch(decide_booking))
}

fn requests_routes() -> Router<ApiClient> {
    Router::new()
        .route("/", get(own_requests).post(create_request))
        .route("/all", get(all_requests))
        .route("/{id}", get(get_request))
}

/// Deserialize and validate a request body without altering it.
fn parse_body<T>(body: &Value) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let input: T = serde_json::from_value(body.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;
    input.validate()?;
    Ok(input)
}

fn check_size(size: u64) -> Result<(), AppError> {
    if size < 1 {
        return Err(AppError::BadRequest("size must be at least 1".to_string()));
    }
    Ok(())
}

fn check_state(state: Option<&str>) -> Result<(), AppError> {
    if let Some(value) = state {
        SearchState::from_str(value)
            .map_err(|_| AppError::BadRequest(format!("Unknown state: {}", value)))?;
    }
    Ok(())
}

// --- users ---

async fn create_user(
    State(client): State<ApiClient>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    parse_body::<CreateUser>(&body)?;
    client
        .forward(Method::POST, "/users", None, None, Some(&body))
        .await
}

async fn list_users(State(client): State<ApiClient>) -> Result<Response, AppError> {
    client.forward(Method::GET, "/users", None, None, None).await
}

async fn get_user(
    State(client): State<ApiClient>,
    UuidPath(id): UuidPath,
) -> Result<Response, AppError> {
    client
        .forward(Method::GET, &format!("/users/{}", id), None, None, None)
        .await
}

async fn update_user(
    State(client): State<ApiClient>,
    UuidPath(id): UuidPath,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    parse_body::<UpdateUser>(&body)?;
    client
        .forward(
            Method::PATCH,
            &format!("/users/{}", id),
            None,
            None,
            Some(&body),
        )
        .await
}

async fn delete_user(
    State(client): State<ApiClient>,
    UuidPath(id): UuidPath,
) -> Result<Response, AppError> {
    client
        .forward(Method::DELETE, &format!("/users/{}", id), None, None, None)
        .await
}

// --- items ---

async fn create_item(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    parse_body::<CreateItem>(&body)?;
    client
        .forward(Method::POST, "/items", Some(user), None, Some(&body))
        .await
}

async fn own_items(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    Query(filter): Query<ItemFilter>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    check_size(filter.size)?;
    client
        .forward(Method::GET, "/items", Some(user), query.as_deref(), None)
        .await
}

async fn get_item(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    UuidPath(id): UuidPath,
) -> Result<Response, AppError> {
    client
        .forward(
            Method::GET,
            &format!("/items/{}", id),
            Some(user),
            None,
            None,
        )
        .await
}

async fn update_item(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    UuidPath(id): UuidPath,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    parse_body::<UpdateItem>(&body)?;
    client
        .forward(
            Method::PATCH,
            &format!("/items/{}", id),
            Some(user),
            None,
            Some(&body),
        )
        .await
}

/// Search needs no identity header; blank text short-circuits to an
/// empty page without touching the upstream API.
async fn search_items(
    State(client): State<ApiClient>,
    Query(filter): Query<SearchFilter>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    if filter.text.trim().is_empty() {
        return Ok(Json(Vec::<Value>::new()).into_response());
    }
    check_size(filter.size)?;
    client
        .forward(Method::GET, "/items/search", None, query.as_deref(), None)
        .await
}

async fn add_comment(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    UuidPath(id): UuidPath,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    parse_body::<CreateComment>(&body)?;
    client
        .forward(
            Method::POST,
            &format!("/items/{}/comment", id),
            Some(user),
            None,
            Some(&body),
        )
        .await
}

// --- bookings ---

#[derive(Debug, Deserialize)]
struct ApproveParams {
    approved: bool,
}

async fn create_booking(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let input: CreateBooking = parse_body(&body)?;
    if input.start >= input.end {
        return Err(AppError::BadRequest(
            "start must be before end".to_string(),
        ));
    }
    client
        .forward(Method::POST, "/bookings", Some(user), None, Some(&body))
        .await
}

async fn decide_booking(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    UuidPath(id): UuidPath,
    Query(params): Query<ApproveParams>,
) -> Result<Response, AppError> {
    client
        .forward(
            Method::PATCH,
            &format!("/bookings/{}", id),
            Some(user),
            Some(&format!("approved={}", params.approved)),
            None,
        )
        .await
}

async fn get_booking(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    UuidPath(id): UuidPath,
) -> Result<Response, AppError> {
    client
        .forward(
            Method::GET,
            &format!("/bookings/{}", id),
            Some(user),
            None,
            None,
        )
        .await
}

async fn list_for_booker(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    Query(params): Query<ListParams>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    check_state(params.state.as_deref())?;
    check_size(params.size)?;
    client
        .forward(Method::GET, "/bookings", Some(user), query.as_deref(), None)
        .await
}

async fn list_for_owner(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    Query(params): Query<ListParams>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    check_state(params.state.as_deref())?;
    check_size(params.size)?;
    client
        .forward(
            Method::GET,
            "/bookings/owner",
            Some(user),
            query.as_deref(),
            None,
        )
        .await
}

// --- requests ---

async fn create_request(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    parse_body::<CreateItemRequest>(&body)?;
    client
        .forward(Method::POST, "/requests", Some(user), None, Some(&body))
        .await
}

async fn own_requests(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
) -> Result<Response, AppError> {
    client
        .forward(Method::GET, "/requests", Some(user), None, None)
        .await
}

async fn all_requests(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    Query(filter): Query<RequestFilter>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    check_size(filter.size)?;
    client
        .forward(
            Method::GET,
            "/requests/all",
            Some(user),
            query.as_deref(),
            None,
        )
        .await
}

async fn get_request(
    State(client): State<ApiClient>,
    ActingUser(user): ActingUser,
    UuidPath(id): UuidPath,
) -> Result<Response, AppError> {
    client
        .forward(
            Method::GET,
            &format!("/requests/{}", id),
            Some(user),
            None,
            None,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    // Rejections happen before any forwarding, so the upstream address
    // only needs to exist as a string.
    fn app() -> Router {
        router(ApiClient::new("http://127.0.0.1:9".to_string()))
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn json_request(method: &str, uri: &str, user: Option<Uuid>, body: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(user) = user {
            builder = builder.header("X-Sharer-User-Id", user.to_string());
        }
        builder
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_user_header_is_rejected() {
        let body = serde_json::json!({
            "name": "Drill",
            "description": "Cordless drill",
            "available": true
        });
        let response = app()
            .oneshot(json_request("POST", "/items", None, &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_user_header_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/items")
                    .header("X-Sharer-User-Id", "not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let body = serde_json::json!({ "name": "Ann", "email": "not-an-email" });
        let response = app()
            .oneshot(json_request("POST", "/users", None, &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_item_name_is_rejected() {
        let body = serde_json::json!({
            "name": "   ",
            "description": "Cordless drill",
            "available": true
        });
        let response = app()
            .oneshot(json_request("POST", "/items", Some(Uuid::now_v7()), &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_state_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/bookings?state=UNSUPPORTED_STATUS")
                    .header("X-Sharer-User-Id", Uuid::now_v7().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert!(body.contains("Unknown state: UNSUPPORTED_STATUS"));
    }

    #[tokio::test]
    async fn test_zero_size_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/requests/all?size=0")
                    .header("X-Sharer-User-Id", Uuid::now_v7().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_negative_from_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/bookings?from=-1")
                    .header("X-Sharer-User-Id", Uuid::now_v7().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_search_short_circuits() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/items/search?text=%20%20")
                    .header("X-Sharer-User-Id", Uuid::now_v7().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn test_search_needs_no_user_header() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/items/search?text=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn test_booking_start_after_end_is_rejected() {
        let body = serde_json::json!({
            "item_id": Uuid::now_v7(),
            "start": "2026-09-10T12:00:00Z",
            "end": "2026-09-10T10:00:00Z"
        });
        let response = app()
            .oneshot(json_request("POST", "/bookings", Some(Uuid::now_v7()), &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
