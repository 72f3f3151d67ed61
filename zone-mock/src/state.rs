use crate::store::ZoneStore;

/// Shared handler state
#[derive(Debug, Default)]
pub struct AppState {
    pub store: ZoneStore,
    /// Bearer token every request must carry; `None` disables the check
    pub token: Option<String>,
}

impl AppState {
    pub fn new(token: Option<String>) -> Self {
        Self {
            store: ZoneStore::new(),
            token,
        }
    }
}
