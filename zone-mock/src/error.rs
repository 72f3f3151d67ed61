//! Error responses of the mock service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::{ErrorObject, ErrorResponse};
use thiserror::Error;

/// Error code for a malformed field value
pub const INVALID_FIELD: &str = "InvalidField";
/// Error code for an unsupported or malformed query input
pub const INVALID_INPUT: &str = "InvalidInput";

/// A failed request: HTTP status plus the error object sent back
#[derive(Debug, Clone, Error)]
#[error("{status}: {}", error.message)]
pub struct MockError {
    pub status: StatusCode,
    pub error: ErrorObject,
}

impl MockError {
    pub fn new(status: StatusCode, error: ErrorObject) -> Self {
        Self { status, error }
    }

    // ==================== Convenience constructors ====================

    pub fn not_found(id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorObject::resource_not_found(id))
    }

    pub fn concurrent_modification(id: &str, expected: i64, current: i64) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            ErrorObject::concurrent_modification(id, expected, current),
        )
    }

    pub fn duplicate_key(key: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorObject::duplicate_field("key", key),
        )
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorObject::invalid_operation(message),
        )
    }

    pub fn invalid_field(field: &str, value: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorObject::new(
                INVALID_FIELD,
                format!("The value '\"{value}\"' is not valid for field '{field}'."),
            )
            .with_field("field", field)
            .with_field("invalidValue", value),
        )
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorObject::new(INVALID_INPUT, message),
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorObject::invalid_token())
    }

    pub fn code(&self) -> &str {
        &self.error.code
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.status, self.error);
        (self.status, Json(body)).into_response()
    }
}

/// Result type for store and handler operations
pub type MockResult<T> = Result<T, MockError>;
