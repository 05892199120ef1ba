use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors for item-request operations
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Item request not found: {0}")]
    NotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RequestResult<T> = Result<T, RequestError>;

/// Convert RequestError to AppError for standardized error responses
impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::NotFound(id) => {
                AppError::NotFound(format!("Item request {} not found", id))
            }
            RequestError::UserNotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            RequestError::Validation(msg) => AppError::BadRequest(msg),
            RequestError::InvalidRequest(msg) => AppError::BadRequest(msg),
            RequestError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
