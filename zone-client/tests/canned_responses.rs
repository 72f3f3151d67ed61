// zone-client/tests/canned_responses.rs
// Client and fixtures against a service that returns a fixed body

use reqwest::StatusCode;
use zone_client::{ApiRoot, ClientConfig, ClientError, FixtureContext};
use zone_mock::MockServer;

const PROJECT: &str = "canned-test";

fn zone_body(id: &str, key: &str) -> String {
    serde_json::json!({
        "id": id,
        "version": 1,
        "key": key,
        "name": "n1",
        "locations": [],
        "createdAt": "2024-01-01T00:00:00Z",
        "lastModifiedAt": "2024-01-01T00:00:00Z",
    })
    .to_string()
}

fn canned(status: StatusCode, body: impl Into<String>) -> MockServer {
    MockServer::start_canned(status, body).expect("Failed to start canned server")
}

fn context(server: &MockServer) -> FixtureContext {
    let config = ClientConfig::new(server.base_url(), PROJECT).with_timeout(5);
    FixtureContext::from_config(&config).expect("Failed to build fixture context")
}

fn root(server: &MockServer) -> ApiRoot {
    let config = ClientConfig::new(server.base_url(), PROJECT).with_timeout(5);
    ApiRoot::new(config.build_http_client().expect("Failed to build client"))
}

#[test]
#[should_panic(expected = "created zone key does not match the draft")]
fn test_create_zone_rejects_mismatched_key() {
    let server = canned(StatusCode::CREATED, zone_body("abc", "other"));
    let ctx = context(&server);

    let _ = ctx.zones().create_zone();
}

#[test]
#[should_panic(expected = "deleted zone id does not match the request")]
fn test_delete_zone_rejects_mismatched_id() {
    let server = canned(StatusCode::OK, zone_body("zzz", "k1"));
    let ctx = context(&server);

    let _ = ctx.zones().delete_zone("abc", 1);
}

#[test]
fn test_null_body_is_invalid_response() {
    let server = canned(StatusCode::OK, "null");
    let zones = root(&server).with_project_key(PROJECT).zones();

    let err = zones.with_id("abc").get().execute_blocking().unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)), "got {err:?}");
}

#[test]
fn test_empty_body_is_invalid_response() {
    let server = canned(StatusCode::OK, "");
    let zones = root(&server).with_project_key(PROJECT).zones();

    let err = zones.with_id("abc").get().execute_blocking().unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)), "got {err:?}");
}

#[test]
fn test_undecodable_body_is_serialization_error() {
    let server = canned(StatusCode::OK, r#"{"id": 1}"#);
    let zones = root(&server).with_project_key(PROJECT).zones();

    let err = zones.with_id("abc").get().execute_blocking().unwrap_err();
    assert!(matches!(err, ClientError::Serialization(_)), "got {err:?}");
}

#[test]
fn test_with_zone_surfaces_null_create_response() {
    let server = canned(StatusCode::CREATED, "null");
    let ctx = context(&server);
    let mut called = false;

    let err = ctx.zones().with_zone(|_zone| called = true).unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)), "got {err:?}");
    assert!(!called);
}
