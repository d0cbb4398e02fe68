// Central error type and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{error, warn};

/// Error type shared by all services and handlers.
///
/// Each variant maps to one HTTP status code. Internal detail is logged
/// server-side and never included in the client response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or invalid client input, maps to 400
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Failed or absent credential/token, maps to 401
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// No such resource, maps to 404
    #[error("not found: {0}")]
    NotFound(String),

    /// Database failure, maps to 500
    #[error("database error: {0}")]
    DatabaseError(String),

    /// Any other internal failure, maps to 500
    #[error("system error: {0}")]
    SystemError(String),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::DatabaseError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => {
                warn!("unauthorized request: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                error!("database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ApiError::SystemError(msg) => {
                error!("system error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
