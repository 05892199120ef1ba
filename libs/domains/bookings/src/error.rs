use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors for booking operations
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    // The fixed message is part of the API contract; the offending
    // value is kept for debug output only.
    #[error("Unknown state: UNSUPPORTED_STATUS")]
    UnknownState(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Convert BookingError to AppError for standardized error responses
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(id) => AppError::NotFound(format!("Booking {} not found", id)),
            BookingError::UserNotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            BookingError::ItemNotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            BookingError::UnknownState(_) => {
                AppError::BadRequest("Unknown state: UNSUPPORTED_STATUS".to_string())
            }
            BookingError::InvalidRequest(msg) => AppError::BadRequest(msg),
            BookingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
