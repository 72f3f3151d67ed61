//! In-memory zones service
//!
//! Implements the project-scoped zones endpoint (create, query, get, update,
//! delete) with server-side versioning and optimistic-concurrency checks.
//! Used as the remote side of the fixture integration tests and runnable
//! standalone through the `zone-mock` binary.

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod store;

pub use api::router;
pub use config::{ConfigError, MockConfig};
pub use error::{MockError, MockResult};
pub use server::MockServer;
pub use state::AppState;
pub use store::{DeletionRecord, ZoneSelector, ZoneStore};
