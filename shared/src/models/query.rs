//! Paged query results

use serde::{Deserialize, Serialize};

use super::zone::Zone;

/// Default page size for query endpoints
pub const DEFAULT_QUERY_LIMIT: u32 = 20;
/// Upper bound the service accepts for `limit`
pub const MAX_QUERY_LIMIT: u32 = 500;

/// One page of zones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePagedQueryResponse {
    pub limit: u32,
    pub offset: u32,
    /// Number of results on this page
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub results: Vec<Zone>,
}

impl ZonePagedQueryResponse {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
