//! In-memory zone storage with versioning

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Utc;
use shared::models::{DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT};
use shared::{Zone, ZoneDraft, ZonePagedQueryResponse, ZoneUpdate, ZoneUpdateAction};
use tokio::sync::RwLock;

use crate::error::{MockError, MockResult};

/// How a single zone is addressed in the path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneSelector {
    Id(String),
    Key(String),
}

impl ZoneSelector {
    /// `key=<key>` selects by key, anything else is an id
    pub fn parse(segment: &str) -> Self {
        match segment.strip_prefix("key=") {
            Some(key) => Self::Key(key.to_string()),
            None => Self::Id(segment.to_string()),
        }
    }

    fn matches(&self, zone: &Zone) -> bool {
        match self {
            Self::Id(id) => zone.id == *id,
            Self::Key(key) => zone.key.as_deref() == Some(key.as_str()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Id(id) => id.clone(),
            Self::Key(key) => format!("key={key}"),
        }
    }
}

/// A successful deletion, as observed by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRecord {
    pub project_key: String,
    pub id: String,
    pub version: i64,
}

/// Paging, filtering and sorting for [`ZoneStore::query`]
#[derive(Debug, Clone, Default)]
pub struct ZoneQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// `field="value"` on `id`, `key` or `name`
    pub predicate: Option<String>,
    /// `<field> asc|desc` on `id`, `key`, `name`, `createdAt` or `lastModifiedAt`
    pub sort: Option<String>,
    pub with_total: Option<bool>,
}

#[derive(Debug, Default)]
struct Inner {
    /// project key -> zones of that project
    projects: HashMap<String, Vec<Zone>>,
    deletions: Vec<DeletionRecord>,
}

impl Inner {
    fn zones(&self, project_key: &str) -> &[Zone] {
        self.projects
            .get(project_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn position(&self, project_key: &str, selector: &ZoneSelector) -> MockResult<usize> {
        self.zones(project_key)
            .iter()
            .position(|z| selector.matches(z))
            .ok_or_else(|| MockError::not_found(&selector.describe()))
    }

    fn key_taken(&self, project_key: &str, key: &str, except_id: Option<&str>) -> bool {
        self.zones(project_key)
            .iter()
            .any(|z| z.key.as_deref() == Some(key) && Some(z.id.as_str()) != except_id)
    }
}

/// Zones of every project, plus a log of deletions
#[derive(Debug, Default)]
pub struct ZoneStore {
    inner: RwLock<Inner>,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zone at version 1
    pub async fn create(&self, project_key: &str, draft: ZoneDraft) -> MockResult<Zone> {
        if let Some(key) = &draft.key {
            validate_key(key)?;
        }
        if draft.name.trim().is_empty() {
            return Err(MockError::invalid_field("name", &draft.name));
        }

        let mut inner = self.inner.write().await;
        if let Some(key) = &draft.key
            && inner.key_taken(project_key, key, None)
        {
            return Err(MockError::duplicate_key(key));
        }

        let now = Utc::now();
        let zone = Zone {
            id: uuid::Uuid::new_v4().to_string(),
            version: 1,
            key: draft.key,
            name: draft.name,
            description: draft.description,
            locations: draft.locations,
            created_at: now,
            last_modified_at: now,
        };

        inner
            .projects
            .entry(project_key.to_string())
            .or_default()
            .push(zone.clone());
        tracing::info!(project = %project_key, id = %zone.id, "Zone created");
        Ok(zone)
    }

    pub async fn get(&self, project_key: &str, selector: &ZoneSelector) -> MockResult<Zone> {
        let inner = self.inner.read().await;
        let index = inner.position(project_key, selector)?;
        Ok(inner.zones(project_key)[index].clone())
    }

    pub async fn query(
        &self,
        project_key: &str,
        query: &ZoneQuery,
    ) -> MockResult<ZonePagedQueryResponse> {
        let limit = query.limit.unwrap_or(DEFAULT_QUERY_LIMIT);
        if limit > MAX_QUERY_LIMIT {
            return Err(MockError::invalid_input(format!(
                "The limit must be between 0 and {MAX_QUERY_LIMIT}."
            )));
        }
        let offset = query.offset.unwrap_or(0);

        let filter = query.predicate.as_deref().map(parse_predicate).transpose()?;
        let order = query.sort.as_deref().map(parse_sort).transpose()?;

        let inner = self.inner.read().await;
        let mut matched: Vec<&Zone> = inner
            .zones(project_key)
            .iter()
            .filter(|z| filter.as_ref().is_none_or(|f| f.matches(z)))
            .collect();
        if let Some(order) = &order {
            matched.sort_by(|a, b| order.compare(a, b));
        }

        let total = matched.len() as u64;
        let results: Vec<Zone> = matched
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(ZonePagedQueryResponse {
            limit,
            offset,
            count: results.len() as u32,
            total: query.with_total.unwrap_or(true).then_some(total),
            results,
        })
    }

    /// Apply all actions or none; the version moves by one per update
    pub async fn update(
        &self,
        project_key: &str,
        selector: &ZoneSelector,
        update: ZoneUpdate,
    ) -> MockResult<Zone> {
        let mut inner = self.inner.write().await;
        let index = inner.position(project_key, selector)?;
        let current = &inner.zones(project_key)[index];

        if current.version != update.version {
            return Err(MockError::concurrent_modification(
                &current.id,
                update.version,
                current.version,
            ));
        }

        let mut zone = current.clone();
        for action in update.actions {
            match action {
                ZoneUpdateAction::ChangeName { name } => {
                    if name.trim().is_empty() {
                        return Err(MockError::invalid_field("name", &name));
                    }
                    zone.name = name;
                }
                ZoneUpdateAction::SetKey { key } => {
                    if let Some(key) = &key {
                        validate_key(key)?;
                        if inner.key_taken(project_key, key, Some(&zone.id)) {
                            return Err(MockError::duplicate_key(key));
                        }
                    }
                    zone.key = key;
                }
                ZoneUpdateAction::SetDescription { description } => {
                    zone.description = description;
                }
                ZoneUpdateAction::AddLocation { location } => {
                    if zone.locations.contains(&location) {
                        return Err(MockError::invalid_operation(format!(
                            "Location '{}' is already part of the zone.",
                            location.country
                        )));
                    }
                    zone.locations.push(location);
                }
                ZoneUpdateAction::RemoveLocation { location } => {
                    let before = zone.locations.len();
                    zone.locations.retain(|l| *l != location);
                    if zone.locations.len() == before {
                        return Err(MockError::invalid_operation(format!(
                            "Location '{}' is not part of the zone.",
                            location.country
                        )));
                    }
                }
            }
        }

        zone.version += 1;
        zone.last_modified_at = Utc::now();

        if let Some(zones) = inner.projects.get_mut(project_key) {
            zones[index] = zone.clone();
        }
        tracing::info!(project = %project_key, id = %zone.id, version = zone.version, "Zone updated");
        Ok(zone)
    }

    /// Delete a zone if `version` is current
    pub async fn delete(
        &self,
        project_key: &str,
        selector: &ZoneSelector,
        version: i64,
    ) -> MockResult<Zone> {
        let mut inner = self.inner.write().await;
        let index = inner.position(project_key, selector)?;
        let current = &inner.zones(project_key)[index];

        if current.version != version {
            return Err(MockError::concurrent_modification(
                &current.id,
                version,
                current.version,
            ));
        }

        let zone = match inner.projects.get_mut(project_key) {
            Some(zones) => zones.remove(index),
            None => return Err(MockError::not_found(&selector.describe())),
        };
        inner.deletions.push(DeletionRecord {
            project_key: project_key.to_string(),
            id: zone.id.clone(),
            version,
        });
        tracing::info!(project = %project_key, id = %zone.id, version, "Zone deleted");
        Ok(zone)
    }

    /// Every successful deletion so far, oldest first
    pub async fn deletions(&self) -> Vec<DeletionRecord> {
        self.inner.read().await.deletions.clone()
    }

    pub async fn count(&self, project_key: &str) -> usize {
        self.inner.read().await.zones(project_key).len()
    }
}

fn validate_key(key: &str) -> MockResult<()> {
    let valid = (2..=256).contains(&key.len())
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(MockError::invalid_field("key", key))
    }
}

#[derive(Debug)]
struct Predicate {
    field: String,
    value: String,
}

impl Predicate {
    fn matches(&self, zone: &Zone) -> bool {
        match self.field.as_str() {
            "id" => zone.id == self.value,
            "key" => zone.key.as_deref() == Some(self.value.as_str()),
            _ => zone.name == self.value,
        }
    }
}

fn parse_predicate(raw: &str) -> MockResult<Predicate> {
    let unsupported = || MockError::invalid_input(format!("Malformed or unsupported predicate: {raw}"));

    let (field, value) = raw.split_once('=').ok_or_else(unsupported)?;
    let field = field.trim();
    let value = value
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(unsupported)?;

    match field {
        "id" | "key" | "name" => Ok(Predicate {
            field: field.to_string(),
            value: value.to_string(),
        }),
        _ => Err(unsupported()),
    }
}

#[derive(Debug)]
struct SortOrder {
    field: String,
    descending: bool,
}

impl SortOrder {
    fn compare(&self, a: &Zone, b: &Zone) -> Ordering {
        let ordering = match self.field.as_str() {
            "id" => a.id.cmp(&b.id),
            "key" => a.key.cmp(&b.key),
            "name" => a.name.cmp(&b.name),
            "lastModifiedAt" => a.last_modified_at.cmp(&b.last_modified_at),
            _ => a.created_at.cmp(&b.created_at),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

fn parse_sort(raw: &str) -> MockResult<SortOrder> {
    let malformed = || MockError::invalid_input(format!("Malformed sort: {raw}"));

    let parts: Vec<&str> = raw.split_whitespace().collect();
    let (field, descending) = match parts.as_slice() {
        [field] | [field, "asc"] => (*field, false),
        [field, "desc"] => (*field, true),
        _ => return Err(malformed()),
    };

    match field {
        "id" | "key" | "name" | "createdAt" | "lastModifiedAt" => Ok(SortOrder {
            field: field.to_string(),
            descending,
        }),
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Location;
    use shared::error::{CONCURRENT_MODIFICATION, DUPLICATE_FIELD, RESOURCE_NOT_FOUND};

    const PROJECT: &str = "demo";

    fn draft(name: &str, key: &str) -> ZoneDraft {
        ZoneDraft::builder(name).key(key).build()
    }

    #[tokio::test]
    async fn test_create_starts_at_version_one() {
        let store = ZoneStore::new();
        let zone = store.create(PROJECT, draft("n1", "k1")).await.unwrap();

        assert_eq!(zone.version, 1);
        assert_eq!(zone.key.as_deref(), Some("k1"));
        assert_eq!(zone.created_at, zone.last_modified_at);
        assert_eq!(store.count(PROJECT).await, 1);
        assert_eq!(store.count("other").await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_key_rejected_per_project() {
        let store = ZoneStore::new();
        store.create(PROJECT, draft("n1", "k1")).await.unwrap();

        let err = store.create(PROJECT, draft("n2", "k1")).await.unwrap_err();
        assert_eq!(err.code(), DUPLICATE_FIELD);

        // Keys are unique within a project only
        store.create("other", draft("n2", "k1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let store = ZoneStore::new();
        let err = store
            .create(PROJECT, draft("n1", "has space"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_FIELD);
    }

    #[tokio::test]
    async fn test_delete_then_stale_delete_fails() {
        let store = ZoneStore::new();
        let zone = store.create(PROJECT, draft("n1", "k1")).await.unwrap();
        let selector = ZoneSelector::Id(zone.id.clone());

        let deleted = store.delete(PROJECT, &selector, 1).await.unwrap();
        assert_eq!(deleted.id, zone.id);

        let err = store.delete(PROJECT, &selector, 1).await.unwrap_err();
        assert_eq!(err.code(), RESOURCE_NOT_FOUND);

        let deletions = store.deletions().await;
        assert_eq!(deletions.len(), 1);
        assert_eq!(deletions[0].version, 1);
    }

    #[tokio::test]
    async fn test_update_bumps_version_and_checks_it() {
        let store = ZoneStore::new();
        let zone = store.create(PROJECT, draft("n1", "k1")).await.unwrap();
        let selector = ZoneSelector::Key("k1".to_string());

        let updated = store
            .update(
                PROJECT,
                &selector,
                ZoneUpdate::new(
                    1,
                    vec![
                        ZoneUpdateAction::ChangeName {
                            name: "renamed".to_string(),
                        },
                        ZoneUpdateAction::AddLocation {
                            location: Location::new("DE"),
                        },
                    ],
                ),
            )
            .await
            .unwrap();
        assert_eq!(updated.id, zone.id);
        assert_eq!(updated.version, 2);
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.locations, vec![Location::new("DE")]);

        // Old version no longer accepted for delete
        let err = store
            .delete(PROJECT, &ZoneSelector::Id(zone.id.clone()), 1)
            .await
            .unwrap_err();
        assert_eq!(err.code(), CONCURRENT_MODIFICATION);
        assert_eq!(err.error.current_version(), Some(2));

        store
            .delete(PROJECT, &ZoneSelector::Id(zone.id), 2)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_action_leaves_zone_untouched() {
        let store = ZoneStore::new();
        let zone = store.create(PROJECT, draft("n1", "k1")).await.unwrap();
        let selector = ZoneSelector::Id(zone.id.clone());

        let err = store
            .update(
                PROJECT,
                &selector,
                ZoneUpdate::new(
                    1,
                    vec![
                        ZoneUpdateAction::ChangeName {
                            name: "renamed".to_string(),
                        },
                        ZoneUpdateAction::RemoveLocation {
                            location: Location::new("FR"),
                        },
                    ],
                ),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), shared::error::INVALID_OPERATION);

        let current = store.get(PROJECT, &selector).await.unwrap();
        assert_eq!(current.version, 1);
        assert_eq!(current.name, "n1");
    }

    #[tokio::test]
    async fn test_query_paging_filter_and_sort() {
        let store = ZoneStore::new();
        for (name, key) in [("b", "k-b"), ("a", "k-a"), ("c", "k-c")] {
            store.create(PROJECT, draft(name, key)).await.unwrap();
        }

        let page = store
            .query(
                PROJECT,
                &ZoneQuery {
                    limit: Some(2),
                    offset: Some(1),
                    sort: Some("name asc".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.total, Some(3));
        let names: Vec<_> = page.results.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);

        let filtered = store
            .query(
                PROJECT,
                &ZoneQuery {
                    predicate: Some(r#"key="k-c""#.to_string()),
                    with_total: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered.count, 1);
        assert_eq!(filtered.results[0].name, "c");
        assert!(filtered.total.is_none());
    }

    #[tokio::test]
    async fn test_query_rejects_bad_input() {
        let store = ZoneStore::new();
        for query in [
            ZoneQuery {
                limit: Some(MAX_QUERY_LIMIT + 1),
                ..Default::default()
            },
            ZoneQuery {
                predicate: Some("locations is not empty".to_string()),
                ..Default::default()
            },
            ZoneQuery {
                sort: Some("name sideways".to_string()),
                ..Default::default()
            },
        ] {
            let err = store.query(PROJECT, &query).await.unwrap_err();
            assert_eq!(err.code(), crate::error::INVALID_INPUT);
        }
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!(
            ZoneSelector::parse("key=europe"),
            ZoneSelector::Key("europe".to_string())
        );
        assert_eq!(ZoneSelector::parse("abc"), ZoneSelector::Id("abc".to_string()));
    }
}
