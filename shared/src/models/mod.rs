//! Data models
//!
//! Shared between the zone client and the mock zones service.
//! JSON field names are camelCase, as served by the API.

pub mod query;
pub mod zone;

// Re-exports
pub use query::*;
pub use zone::*;
