//! Zone fixtures for integration tests
//!
//! Helpers that create a zone with random name/key, hand it to the test and
//! delete it again. Contract violations by the service (a created zone with a
//! different key, a deleted zone with a different id) fail the test with a
//! panic; transport and API errors are returned unchanged.
//!
//! Cleanup is tied to [`ZoneGuard`]: a zone acquired through a guard is
//! deleted when the guard is released or dropped, including when the test
//! callback panics or returns an error.
//!
//! ```no_run
//! use zone_client::FixtureContext;
//!
//! # fn example() -> Result<(), zone_client::ClientError> {
//! let ctx = FixtureContext::from_env()?;
//! ctx.zones().with_zone(|zone| {
//!     assert!(zone.key.is_some());
//! })?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::ops::Deref;

use shared::{Zone, ZoneDraft, ZoneUpdate, ZoneUpdateAction};

use crate::api_root::{ApiRoot, ZonesRequestBuilder};
use crate::{ClientConfig, ClientResult};

/// Source of random test values
pub trait RandomSource: Send + Sync {
    /// Random free-text value (names, descriptions)
    fn random_string(&self) -> String;
    /// Random resource key
    fn random_key(&self) -> String;
}

/// UUID-backed [`RandomSource`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRandom;

impl RandomSource for UuidRandom {
    fn random_string(&self) -> String {
        shared::util::random_string()
    }

    fn random_key(&self) -> String {
        shared::util::random_key()
    }
}

/// Ambient test configuration: client, project and random values
pub struct FixtureContext {
    api_root: ApiRoot,
    project_key: String,
    random: Box<dyn RandomSource>,
}

impl FixtureContext {
    pub fn new(api_root: ApiRoot, project_key: impl Into<String>) -> Self {
        Self {
            api_root,
            project_key: project_key.into(),
            random: Box::new(UuidRandom),
        }
    }

    /// Replace the random value source
    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let http = config.build_http_client()?;
        Ok(Self::new(ApiRoot::new(http), config.project_key.clone()))
    }

    /// Build the context from `CTP_*` environment variables
    pub fn from_env() -> ClientResult<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    pub fn api_root(&self) -> &ApiRoot {
        &self.api_root
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn random_string(&self) -> String {
        self.random.random_string()
    }

    pub fn random_key(&self) -> String {
        self.random.random_key()
    }

    pub fn zones(&self) -> ZoneFixtures<'_> {
        ZoneFixtures { ctx: self }
    }
}

impl fmt::Debug for FixtureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureContext")
            .field("api_root", &self.api_root)
            .field("project_key", &self.project_key)
            .finish_non_exhaustive()
    }
}

/// Create/delete helpers for zones
#[derive(Debug, Clone, Copy)]
pub struct ZoneFixtures<'a> {
    ctx: &'a FixtureContext,
}

impl<'a> ZoneFixtures<'a> {
    fn endpoint(&self) -> ZonesRequestBuilder {
        self.ctx
            .api_root
            .with_project_key(&self.ctx.project_key)
            .zones()
    }

    /// Create a zone with a random name and key.
    ///
    /// # Panics
    /// If the created zone's key differs from the draft's.
    pub fn create_zone(&self) -> ClientResult<Zone> {
        let draft = ZoneDraft::builder(self.ctx.random_string())
            .key(self.ctx.random_key())
            .build();
        let expected_key = draft.key.clone();

        let zone = self.endpoint().post(draft).execute_blocking()?;

        assert_eq!(
            zone.key, expected_key,
            "created zone key does not match the draft"
        );
        tracing::debug!(id = %zone.id, version = zone.version, "Created zone fixture");
        Ok(zone)
    }

    /// Delete a zone at `version`.
    ///
    /// # Panics
    /// If the deleted zone's id differs from `id`.
    pub fn delete_zone(&self, id: &str, version: i64) -> ClientResult<Zone> {
        let zone = self.send_delete(id, version)?;
        assert_eq!(zone.id, id, "deleted zone id does not match the request");
        Ok(zone)
    }

    /// Apply update actions at the zone's current version.
    ///
    /// # Panics
    /// If the updated zone's id differs from `zone.id`.
    pub fn update_zone(&self, zone: &Zone, actions: Vec<ZoneUpdateAction>) -> ClientResult<Zone> {
        let updated = self
            .endpoint()
            .with_id(&zone.id)
            .post(ZoneUpdate::new(zone.version, actions))
            .execute_blocking()?;

        assert_eq!(updated.id, zone.id, "updated zone id does not match the request");
        tracing::debug!(id = %updated.id, version = updated.version, "Updated zone fixture");
        Ok(updated)
    }

    /// Create a zone owned by a guard that deletes it on release or drop
    pub fn zone_guard(&self) -> ClientResult<ZoneGuard<'a>> {
        let zone = self.create_zone()?;
        Ok(ZoneGuard {
            fixtures: *self,
            zone: Some(zone),
        })
    }

    /// Create a zone, pass it to `consumer`, then delete it with its
    /// original id and version.
    pub fn with_zone<F, R>(&self, consumer: F) -> ClientResult<R>
    where
        F: FnOnce(&Zone) -> R,
    {
        let guard = self.zone_guard()?;
        let result = consumer(guard.zone());
        guard.release()?;
        Ok(result)
    }

    /// Create a zone, pass it to `operator`, then delete the zone the
    /// operator returns (its version may have moved on through updates).
    ///
    /// Returns the deleted zone. If `operator` fails, the originally created
    /// zone is deleted and the operator's error is returned.
    pub fn with_updateable_zone<F>(&self, operator: F) -> ClientResult<Zone>
    where
        F: FnOnce(Zone) -> ClientResult<Zone>,
    {
        let mut guard = self.zone_guard()?;
        let updated = operator(guard.zone().clone())?;
        guard.replace(updated);
        guard.release()
    }

    fn send_delete(&self, id: &str, version: i64) -> ClientResult<Zone> {
        let zone = self
            .endpoint()
            .with_id(id)
            .delete()
            .add_version(version)
            .execute_blocking()?;
        tracing::debug!(id = %zone.id, version, "Deleted zone fixture");
        Ok(zone)
    }
}

/// Live zone that is deleted when the guard goes away
#[derive(Debug)]
pub struct ZoneGuard<'a> {
    fixtures: ZoneFixtures<'a>,
    // Some until release() or drop
    zone: Option<Zone>,
}

impl ZoneGuard<'_> {
    pub fn zone(&self) -> &Zone {
        self.zone.as_ref().expect("zone guard holds a zone until released")
    }

    /// Track a newer state of the zone (e.g. after an update bumped the
    /// version); cleanup will use its id and version.
    pub fn replace(&mut self, zone: Zone) -> Zone {
        self.zone
            .replace(zone)
            .expect("zone guard holds a zone until released")
    }

    /// Delete the zone now, surfacing failures to the caller
    pub fn release(mut self) -> ClientResult<Zone> {
        let zone = self
            .zone
            .take()
            .expect("zone guard holds a zone until released");
        self.fixtures.delete_zone(&zone.id, zone.version)
    }
}

impl Deref for ZoneGuard<'_> {
    type Target = Zone;

    fn deref(&self) -> &Zone {
        self.zone()
    }
}

impl Drop for ZoneGuard<'_> {
    fn drop(&mut self) {
        let Some(zone) = self.zone.take() else {
            return;
        };

        let panicking = std::thread::panicking();
        match self.fixtures.send_delete(&zone.id, zone.version) {
            Ok(deleted) if deleted.id == zone.id => {
                tracing::debug!(id = %zone.id, panicking, "Zone fixture cleaned up on drop");
            }
            Ok(deleted) => {
                tracing::warn!(
                    requested = %zone.id,
                    returned = %deleted.id,
                    "Zone fixture cleanup returned a different zone"
                );
            }
            Err(e) => {
                tracing::warn!(
                    id = %zone.id,
                    version = zone.version,
                    panicking,
                    error = %e,
                    "Failed to clean up zone fixture"
                );
            }
        }
    }
}
