//! Extractor for the trusted `X-Sharer-User-Id` identity header.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::errors::{ErrorCode, ErrorResponse};

/// Header carrying the id of the user a request acts on behalf of.
pub const USER_ID_HEADER: &str = "x-sharer-user-id";

/// Extracts the acting user's id from the `X-Sharer-User-Id` header.
///
/// Upstream infrastructure is trusted to have authenticated the caller;
/// this extractor only checks that the header is present and a valid UUID.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ActingUser;
///
/// async fn list_bookings(ActingUser(user_id): ActingUser) -> String {
///     format!("Bookings for {}", user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ActingUser(pub Uuid);

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| rejection(ErrorCode::MissingUserHeader))?;

        let user_id = Uuid::parse_str(raw).map_err(|_| rejection(ErrorCode::InvalidUuid))?;

        Ok(ActingUser(user_id))
    }
}

fn rejection(code: ErrorCode) -> Response {
    let body = ErrorResponse {
        code: code.code(),
        error: code.as_str().to_string(),
        message: code.default_message().to_string(),
        details: None,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
