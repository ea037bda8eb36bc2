use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use aula_services::CoreError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
    Validation(String),
    /// External session provider failure; retryable by the client.
    Provider(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation", msg),
            ApiError::Provider(msg) => (StatusCode::BAD_GATEWAY, "provider", msg),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Forbidden => ApiError::Forbidden("Insufficient privilege".to_string()),
            CoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            CoreError::InvalidInput(msg) => ApiError::BadRequest(msg),
            CoreError::InvalidTransition | CoreError::NoOpenSession => {
                ApiError::Validation(err.to_string())
            }
            CoreError::Store(e) => ApiError::Internal(e.to_string()),
            CoreError::Provider(e) => ApiError::Provider(e.to_string()),
        }
    }
}
