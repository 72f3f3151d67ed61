//! Structured error body returned by the API
//!
//! Every non-2xx response carries this format:
//! ```json
//! {
//!     "statusCode": 409,
//!     "message": "Object abc has a different version than expected. Expected: 1 - Actual: 2.",
//!     "errors": [{ "code": "ConcurrentModification", "message": "...", "currentVersion": 2 }]
//! }
//! ```

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error code for a stale version on update/delete
pub const CONCURRENT_MODIFICATION: &str = "ConcurrentModification";
/// Error code for an unknown resource
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFound";
/// Error code for a unique field collision (e.g. zone key)
pub const DUPLICATE_FIELD: &str = "DuplicateField";
/// Error code for a request the service refuses to run
pub const INVALID_OPERATION: &str = "InvalidOperation";
/// Error code for a missing or wrong bearer token
pub const INVALID_TOKEN: &str = "invalid_token";

/// Top-level error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorObject>,
}

impl ErrorResponse {
    /// Build a response carrying a single error object
    pub fn new(status: StatusCode, error: ErrorObject) -> Self {
        Self {
            status_code: status.as_u16(),
            message: error.message.clone(),
            errors: vec![error],
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// First error object with the given code
    pub fn find(&self, code: &str) -> Option<&ErrorObject> {
        self.errors.iter().find(|e| e.code == code)
    }
}

/// Individual error; code-specific fields are kept in `extra`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorObject {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            extra: Map::new(),
        }
    }

    /// Add a code-specific field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    pub fn concurrent_modification(id: &str, expected: i64, current: i64) -> Self {
        Self::new(
            CONCURRENT_MODIFICATION,
            format!(
                "Object {id} has a different version than expected. Expected: {expected} - Actual: {current}."
            ),
        )
        .with_field("currentVersion", current)
    }

    pub fn resource_not_found(id: &str) -> Self {
        Self::new(
            RESOURCE_NOT_FOUND,
            format!("The Resource with ID '{id}' was not found."),
        )
    }

    pub fn duplicate_field(field: &str, value: &str) -> Self {
        Self::new(
            DUPLICATE_FIELD,
            format!("A duplicate value '\"{value}\"' exists for field '{field}'."),
        )
        .with_field("field", field)
        .with_field("duplicateValue", value)
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(INVALID_OPERATION, message)
    }

    pub fn invalid_token() -> Self {
        Self::new(INVALID_TOKEN, "invalid_token")
    }

    /// `currentVersion` of a concurrent modification error
    pub fn current_version(&self) -> Option<i64> {
        self.extra.get("currentVersion").and_then(Value::as_i64)
    }
}
