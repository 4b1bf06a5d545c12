//! Integration tests for configuration loader
//!
//! Tests the end-to-end path from a config file to a working API client.

use std::io::Write;

use skika_domain::StorageBackend;
use skika_infra::config;
use skika_infra::{ApiClient, ApiClientConfig};
use tempfile::{Builder, TempDir};

#[test]
fn test_toml_file_drives_client_settings() {
    let mut file = Builder::new().suffix(".toml").tempfile().expect("Failed to create temp file");
    file.write_all(
        br#"
            [api]
            base_url = "https://dashboard.skika.example/api/"
            refresh_path = "/auth/refresh/"
            timeout_secs = 12

            [storage]
            backend = "memory"
        "#,
    )
    .expect("Failed to write to temp file");

    let config = config::load_from_file(Some(file.path().to_path_buf())).unwrap();
    assert!(config.api.validate().is_ok());
    assert_eq!(config.storage.backend, StorageBackend::Memory);

    let store = config::build_session_store(&config.storage).unwrap();
    let client = ApiClient::new(ApiClientConfig::from(&config.api), store).unwrap();

    assert_eq!(client.config().base_url, "https://dashboard.skika.example/api");
    assert_eq!(client.config().refresh_path, "/auth/refresh/");
    assert_eq!(client.config().timeout.as_secs(), 12);
    assert_eq!(client.storage().backend_name(), "memory");
}

#[tokio::test]
async fn test_file_backend_session_survives_new_client() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("skika.json");
    let session_path = dir.path().join("state").join("session.json");
    std::fs::write(
        &config_path,
        format!(
            r#"{{"storage": {{"backend": "file", "path": {}}}}}"#,
            serde_json::to_string(&session_path).unwrap()
        ),
    )
    .unwrap();

    let config = config::load_from_file(Some(config_path)).unwrap();
    let api_config = ApiClientConfig::from(&config.api);

    let first =
        ApiClient::new(api_config.clone(), config::build_session_store(&config.storage).unwrap())
            .unwrap();
    first.set_tokens("a1", "r1").await.unwrap();
    assert!(session_path.exists());

    let second_store = config::build_session_store(&config.storage).unwrap();
    let second = ApiClient::new(api_config, second_store).unwrap();
    assert!(second.load_tokens().await.unwrap());
    assert_eq!(second.tokens().refresh.as_deref(), Some("r1"));
}

#[test]
fn test_invalid_json_is_config_error() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(b"{\"api\": ").unwrap();

    let err = config::load_from_file(Some(file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().contains("Invalid JSON format"), "{}", err);
}
