//! Zone Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A country (and optional state) covered by a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Location {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            state: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

/// Zone entity, owned by the remote service
///
/// `version` is the optimistic-concurrency token: the service bumps it on
/// every mutation and rejects updates/deletes carrying a stale value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

/// Create zone payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl ZoneDraft {
    /// Start building a draft; `name` is the only required field.
    pub fn builder(name: impl Into<String>) -> ZoneDraftBuilder {
        ZoneDraftBuilder {
            draft: ZoneDraft {
                key: None,
                name: name.into(),
                description: None,
                locations: Vec::new(),
            },
        }
    }
}

/// Fluent builder for [`ZoneDraft`]
#[derive(Debug, Clone)]
pub struct ZoneDraftBuilder {
    draft: ZoneDraft,
}

impl ZoneDraftBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.draft.name = name.into();
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.draft.key = Some(key.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.draft.description = Some(description.into());
        self
    }

    /// Append a location (repeatable)
    pub fn location(mut self, location: Location) -> Self {
        self.draft.locations.push(location);
        self
    }

    pub fn build(self) -> ZoneDraft {
        self.draft
    }
}

/// Update zone payload: the expected version plus the actions to apply in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneUpdate {
    pub version: i64,
    pub actions: Vec<ZoneUpdateAction>,
}

impl ZoneUpdate {
    pub fn new(version: i64, actions: Vec<ZoneUpdateAction>) -> Self {
        Self { version, actions }
    }
}

/// Single update action, tagged by `action` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ZoneUpdateAction {
    ChangeName {
        name: String,
    },
    SetKey {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
    SetDescription {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    AddLocation {
        location: Location,
    },
    RemoveLocation {
        location: Location,
    },
}
