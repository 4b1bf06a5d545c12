//! Shared helpers for the infra integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use skika_common::testing::MockSessionStore;
use skika_common::MemorySessionStore;
use skika_infra::{ApiClient, ApiClientConfig};
use wiremock::{MockServer, ResponseTemplate};

pub const OLD_ACCESS: &str = "old_access";
pub const OLD_REFRESH: &str = "old_refresh";
pub const NEW_ACCESS: &str = "new_access";

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Client against `server` backed by a fresh in-memory store.
pub fn client_with_memory_store(server: &MockServer) -> (ApiClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let client = ApiClient::new(ApiClientConfig::with_base_url(server.uri()), store.clone())
        .expect("client should build");
    (client, store)
}

/// Client against `server` whose store records calls and can fail on demand.
pub fn client_with_mock_store(server: &MockServer) -> (ApiClient, MockSessionStore) {
    let store = MockSessionStore::new();
    let client =
        ApiClient::new(ApiClientConfig::with_base_url(server.uri()), Arc::new(store.clone()))
            .expect("client should build");
    (client, store)
}

/// Signed-in client whose transport gives up after `timeout`.
pub async fn signed_in_client_with_timeout(
    server: &MockServer,
    timeout: Duration,
) -> (ApiClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let config = ApiClientConfig { timeout, ..ApiClientConfig::with_base_url(server.uri()) };
    let client = ApiClient::new(config, store.clone()).expect("client should build");
    client.set_tokens(OLD_ACCESS, OLD_REFRESH).await.expect("tokens should persist");
    (client, store)
}

/// Client holding the `old_access`/`old_refresh` pair.
pub async fn signed_in_client(server: &MockServer) -> (ApiClient, Arc<MemorySessionStore>) {
    let (client, store) = client_with_memory_store(server);
    client.set_tokens(OLD_ACCESS, OLD_REFRESH).await.expect("tokens should persist");
    (client, store)
}

/// 401 carrying the expired-token code.
pub fn token_invalid() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({
        "detail": "Given token not valid for any token type",
        "code": "token_not_valid"
    }))
}

pub fn token_invalid_after(delay_ms: u64) -> ResponseTemplate {
    token_invalid().set_delay(Duration::from_millis(delay_ms))
}

/// Base URL nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}
