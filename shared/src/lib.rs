//! Shared types for the zone client workspace
//!
//! Wire models used by both the blocking client and the mock zones service:
//! resources, drafts, update actions, paged query results and the API's
//! structured error body.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ErrorObject, ErrorResponse};
pub use http;
pub use models::{
    Location, Zone, ZoneDraft, ZoneDraftBuilder, ZonePagedQueryResponse, ZoneUpdate,
    ZoneUpdateAction,
};
pub use serde::{Deserialize, Serialize};
