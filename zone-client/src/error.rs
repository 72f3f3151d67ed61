//! Client error types

use reqwest::StatusCode;
use shared::ErrorObject;
use shared::error::{CONCURRENT_MODIFICATION, RESOURCE_NOT_FOUND};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Structured error body returned by the API
    #[error("API error ({status}): {message}")]
    Api {
        status: StatusCode,
        message: String,
        errors: Vec<ErrorObject>,
    },

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found (unstructured body)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx response without a structured error body
    #[error("Unexpected response ({status}): {body}")]
    Unexpected { status: StatusCode, body: String },

    /// Success response that carried no usable payload
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Base URL cannot carry path segments
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status of the failed response, if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } | Self::Unexpected { status, .. } => Some(*status),
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Stale version token on update/delete
    pub fn is_concurrent_modification(&self) -> bool {
        match self {
            Self::Api { status, errors, .. } => {
                *status == StatusCode::CONFLICT
                    || errors.iter().any(|e| e.code == CONCURRENT_MODIFICATION)
            }
            Self::Unexpected { status, .. } => *status == StatusCode::CONFLICT,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { status, errors, .. } => {
                *status == StatusCode::NOT_FOUND
                    || errors.iter().any(|e| e.code == RESOURCE_NOT_FOUND)
            }
            _ => false,
        }
    }

    /// Version the server currently holds, reported with a concurrent modification
    pub fn current_version(&self) -> Option<i64> {
        match self {
            Self::Api { errors, .. } => errors
                .iter()
                .filter(|e| e.code == CONCURRENT_MODIFICATION)
                .find_map(ErrorObject::current_version),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
