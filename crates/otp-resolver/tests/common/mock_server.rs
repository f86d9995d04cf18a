//! Mock server helpers for builds manifest tests

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `body` as the builds manifest at `manifest_path`
pub async fn mock_manifest(server: &MockServer, manifest_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(manifest_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve raw `body` bytes as the builds manifest at `manifest_path`
pub async fn mock_manifest_bytes(server: &MockServer, manifest_path: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(manifest_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Respond to `manifest_path` with `status` and no body
pub async fn mock_manifest_status(server: &MockServer, manifest_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(manifest_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Fail the test if anything requests the manifest
pub async fn expect_no_manifest_requests(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
