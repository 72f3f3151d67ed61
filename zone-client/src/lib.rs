//! Zone Client - blocking HTTP client and test fixtures for the zones API
//!
//! The client mirrors the fluent request-builder shape of the generated SDK
//! (`ApiRoot::with_project_key(..).zones().post(..)`); the `fixtures` module
//! builds self-cleaning zone helpers for integration tests on top of it.

pub mod api_root;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod http;
pub mod request;

pub use api_root::{ApiRoot, ProjectRequestBuilder, ZoneByRequestBuilder, ZonesRequestBuilder};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use fixtures::{FixtureContext, RandomSource, UuidRandom, ZoneFixtures, ZoneGuard};
pub use http::HttpClient;
pub use request::{ApiRequest, ZoneDeleteRequest, ZoneQueryRequest};

// Re-export shared types for convenience
pub use shared::{
    ErrorObject, ErrorResponse, Location, Zone, ZoneDraft, ZonePagedQueryResponse, ZoneUpdate,
    ZoneUpdateAction,
};
