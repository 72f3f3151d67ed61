// zone-client/tests/fixtures_integration.rs
// Zone fixtures against the in-memory mock service

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use zone_client::{
    ClientConfig, ClientError, FixtureContext, RandomSource, ZoneUpdateAction,
};
use zone_mock::{DeletionRecord, MockServer};

const PROJECT: &str = "fixture-test";

/// Deterministic names `n1, n2, ...` and keys `k1, k2, ...`
#[derive(Default)]
struct SequenceRandom {
    names: AtomicUsize,
    keys: AtomicUsize,
}

impl RandomSource for SequenceRandom {
    fn random_string(&self) -> String {
        format!("n{}", self.names.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn random_key(&self) -> String {
        format!("k{}", self.keys.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zone_client=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn context(server: &MockServer) -> FixtureContext {
    init_tracing();
    let config = ClientConfig::new(server.base_url(), PROJECT).with_timeout(5);
    FixtureContext::from_config(&config)
        .expect("Failed to build fixture context")
        .with_random(SequenceRandom::default())
}

fn start_server() -> MockServer {
    MockServer::start().expect("Failed to start mock server")
}

#[test]
fn test_create_then_delete_scenario() {
    let server = start_server();
    let ctx = context(&server);
    let zones = ctx.zones();

    let zone = zones.create_zone().expect("Failed to create zone");
    assert_eq!(zone.key.as_deref(), Some("k1"));
    assert_eq!(zone.name, "n1");
    assert_eq!(zone.version, 1);
    assert!(!zone.id.is_empty());

    let deleted = zones
        .delete_zone(&zone.id, zone.version)
        .expect("Failed to delete zone");
    assert_eq!(deleted.id, zone.id);

    // Version tokens are single-use: a repeated delete fails
    let err = zones.delete_zone(&zone.id, zone.version).unwrap_err();
    assert!(err.is_not_found() || err.is_concurrent_modification());

    assert_eq!(server.deletions().len(), 1);
    assert_eq!(server.zone_count(PROJECT), 0);
}

#[test]
fn test_delete_with_stale_version_conflicts() {
    let server = start_server();
    let ctx = context(&server);
    let zones = ctx.zones();

    let zone = zones.create_zone().expect("Failed to create zone");
    let updated = zones
        .update_zone(
            &zone,
            vec![ZoneUpdateAction::SetDescription {
                description: Some("bumped".to_string()),
            }],
        )
        .expect("Failed to update zone");
    assert_eq!(updated.version, 2);

    let err = zones.delete_zone(&zone.id, zone.version).unwrap_err();
    assert!(err.is_concurrent_modification());
    assert_eq!(err.current_version(), Some(2));

    zones
        .delete_zone(&updated.id, updated.version)
        .expect("Failed to delete zone");
}

#[test]
fn test_with_zone_deletes_original_once() {
    let server = start_server();
    let ctx = context(&server);

    let seen = ctx
        .zones()
        .with_zone(|zone| {
            assert_eq!(server.zone_count(PROJECT), 1);
            (zone.id.clone(), zone.version)
        })
        .expect("with_zone failed");

    assert_eq!(
        server.deletions(),
        vec![DeletionRecord {
            project_key: PROJECT.to_string(),
            id: seen.0,
            version: seen.1,
        }]
    );
    assert_eq!(server.zone_count(PROJECT), 0);
}

#[test]
fn test_with_updateable_zone_deletes_returned_version() {
    let server = start_server();
    let ctx = context(&server);
    let zones = ctx.zones();

    let deleted = zones
        .with_updateable_zone(|zone| {
            let zone = zones.update_zone(
                &zone,
                vec![ZoneUpdateAction::ChangeName {
                    name: "renamed".to_string(),
                }],
            )?;
            zones.update_zone(
                &zone,
                vec![ZoneUpdateAction::SetDescription {
                    description: Some("twice".to_string()),
                }],
            )
        })
        .expect("with_updateable_zone failed");

    assert_eq!(deleted.version, 3);
    assert_eq!(deleted.name, "renamed");

    let deletions = server.deletions();
    assert_eq!(deletions.len(), 1);
    assert_eq!(deletions[0].id, deleted.id);
    assert_eq!(deletions[0].version, 3);
}

#[test]
fn test_with_updateable_zone_cleans_up_on_operator_error() {
    let server = start_server();
    let ctx = context(&server);

    let err = ctx
        .zones()
        .with_updateable_zone(|_zone| Err(ClientError::InvalidResponse("operator gave up".into())))
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(msg) if msg == "operator gave up"));

    let deletions = server.deletions();
    assert_eq!(deletions.len(), 1);
    assert_eq!(deletions[0].version, 1);
    assert_eq!(server.zone_count(PROJECT), 0);
}

#[test]
fn test_with_zone_cleans_up_when_consumer_panics() {
    let server = start_server();
    let ctx = context(&server);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        ctx.zones().with_zone(|_zone| -> () { panic!("consumer failed") })
    }));
    assert!(outcome.is_err());

    assert_eq!(server.deletions().len(), 1);
    assert_eq!(server.zone_count(PROJECT), 0);
}

#[test]
fn test_guard_follows_replaced_zone() {
    let server = start_server();
    let ctx = context(&server);
    let zones = ctx.zones();

    {
        let mut guard = zones.zone_guard().expect("Failed to create guarded zone");
        let updated = zones
            .update_zone(
                &guard,
                vec![ZoneUpdateAction::ChangeName {
                    name: "moved on".to_string(),
                }],
            )
            .expect("Failed to update zone");
        let previous = guard.replace(updated);
        assert_eq!(previous.version, 1);
        assert_eq!(guard.version, 2);
        // Dropped here without release
    }

    let deletions = server.deletions();
    assert_eq!(deletions.len(), 1);
    assert_eq!(deletions[0].version, 2);
}

#[test]
fn test_failed_drop_cleanup_does_not_panic() {
    let server = start_server();
    let ctx = context(&server);
    let zones = ctx.zones();

    let guard = zones.zone_guard().expect("Failed to create guarded zone");
    // Someone else deletes the zone first; the guard's cleanup only logs
    zones
        .delete_zone(&guard.id, guard.version)
        .expect("Failed to delete zone");
    drop(guard);

    assert_eq!(server.deletions().len(), 1);
}

#[test]
fn test_transport_error_propagates() {
    init_tracing();
    // Reserve a port, then free it so nothing listens there
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("Failed to reserve port");

    let config = ClientConfig::new(format!("http://{addr}"), PROJECT).with_timeout(2);
    let ctx = FixtureContext::from_config(&config).expect("Failed to build fixture context");

    let err = ctx.zones().create_zone().unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}

#[test]
fn test_token_is_sent() {
    init_tracing();
    let server = MockServer::start_with_token("secret").expect("Failed to start mock server");

    let anonymous = FixtureContext::from_config(&ClientConfig::new(server.base_url(), PROJECT))
        .expect("Failed to build fixture context");
    let err = anonymous.zones().create_zone().unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));

    let authorized = FixtureContext::from_config(
        &ClientConfig::new(server.base_url(), PROJECT).with_token("secret"),
    )
    .expect("Failed to build fixture context");
    authorized
        .zones()
        .with_zone(|zone| assert!(zone.key.is_some()))
        .expect("with_zone failed");
}
