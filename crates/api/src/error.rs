//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

use crate::dto::ValidationErrors;

/// API-level error type that maps to HTTP responses.
///
/// All bodies are JSON: `{ "message": … }` for domain and request errors,
/// `{ "errors": { field: [messages] } }` for schema validation failures.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Missing or invalid bearer token.
    Unauthorized(String),
    /// Authenticated but lacking the required role.
    Forbidden(String),
    /// Schema-level field constraint violations.
    Validation(ValidationErrors),
    /// Domain logic error.
    Domain(DomainError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Validation(errors) => {
                let body = serde_json::json!({ "errors": errors });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "message": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::NotFound(_) | DomainError::ProductMissing(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        DomainError::InsufficientStock(_)
        | DomainError::DuplicateEmail
        | DomainError::CustomerHasOrders
        | DomainError::InvalidStatus
        | DomainError::EmptyOrder
        | DomainError::InvalidQuantity => (StatusCode::BAD_REQUEST, err.to_string()),
        DomainError::Conflict => (StatusCode::CONFLICT, err.to_string()),
        DomainError::Store(store_err) => {
            tracing::error!(error = %store_err, "store error");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}
