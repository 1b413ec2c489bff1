//! Shared fixtures for integration tests: a mock schema store serving the
//! golden station/shared schemas.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/golden/fixtures")
}

pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_root().join(name)
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture missing")
}

pub fn expected_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden/expected")
        .join(name)
}

pub fn read_expected(name: &str) -> String {
    fs::read_to_string(expected_path(name))
        .expect("expected file missing")
        .trim_end()
        .to_string()
}

/// Serve `body` with `status` at `/schemas/{name}`.
pub async fn mount_schema(server: &MockServer, name: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/schemas/{name}")))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Start a schema store serving `station.json` and `shared.json`.
pub async fn station_store() -> MockServer {
    let server = MockServer::start().await;
    mount_schema(&server, "station.json", 200, &read_fixture("station.json")).await;
    mount_schema(&server, "shared.json", 200, &read_fixture("shared.json")).await;
    server
}

pub fn schema_base(server: &MockServer) -> String {
    format!("{}/schemas/", server.uri())
}
