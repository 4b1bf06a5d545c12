//! Configuration loader
//!
//! Builds the application [`Config`] from defaults, an optional config file
//! and environment variables.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file from the working directory if one exists
//! 2. Loads `SKIKA_CONFIG` when set, otherwise probes for a config file
//! 3. Falls back to built-in defaults when no file is found
//! 4. Applies environment overrides on top
//! 5. Validates the API settings
//!
//! ## Environment Variables
//! - `SKIKA_CONFIG`: Explicit config file path (`.toml` or `.json`)
//! - `SKIKA_API_BASE_URL`: Backend base URL (`NEXT_PUBLIC_API_BASE_URL` is
//!   accepted too)
//! - `SKIKA_REFRESH_PATH`: Token refresh endpoint path
//! - `SKIKA_LOGIN_PATH`: Login endpoint path
//! - `SKIKA_TIMEOUT_SECS`: HTTP timeout in seconds
//! - `SKIKA_STORAGE_BACKEND`: `memory`, `file` or `keychain`
//! - `SKIKA_STORAGE_PATH`: Session file for the `file` backend
//!
//! ## File Locations
//! The loader probes `skika.toml` then `skika.json` in the current working
//! directory and up to two parent directories.

use std::path::{Path, PathBuf};

use skika_domain::{Config, Result, SkikaError};

use crate::errors::InfraError;

const CONFIG_PATH_VAR: &str = "SKIKA_CONFIG";
const CONFIG_FILE_NAMES: [&str; 2] = ["skika.toml", "skika.json"];

/// Load configuration with the full fallback strategy
///
/// # Errors
/// Returns `SkikaError::Config` if:
/// - `SKIKA_CONFIG` points at a missing or unreadable file
/// - The file format is invalid
/// - An environment override has an invalid value
/// - The resulting API settings fail validation
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let explicit = std::env::var(CONFIG_PATH_VAR).ok().filter(|p| !p.trim().is_empty());
    let mut config = match explicit {
        Some(path) => load_from_file(Some(PathBuf::from(path)))?,
        None => match probe_config_paths() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    config.api.validate()?;

    tracing::info!(
        base_url = %config.api.base_url,
        storage = ?config.storage.backend,
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports JSON and
/// TOML (detected by file extension). Missing sections take their defaults.
///
/// # Errors
/// Returns `SkikaError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SkikaError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SkikaError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;
    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`); a path
/// without an extension is read as JSON.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let parsed = match extension {
        "toml" => toml::from_str(contents).map_err(InfraError::from),
        "json" => serde_json::from_str(contents).map_err(InfraError::from),
        _ => return Err(SkikaError::Config(format!("Unsupported config format: {}", extension))),
    };
    Ok(parsed?)
}

/// Probe the standard locations for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    cwd.ancestors()
        .take(3)
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Apply `SKIKA_*` environment variables on top of `config`
///
/// # Errors
/// Returns `SkikaError::Config` if a timeout or storage backend value
/// cannot be parsed.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(base_url) =
        env_var("SKIKA_API_BASE_URL").or_else(|| env_var("NEXT_PUBLIC_API_BASE_URL"))
    {
        config.api.base_url = base_url;
    }
    if let Some(path) = env_var("SKIKA_REFRESH_PATH") {
        config.api.refresh_path = path;
    }
    if let Some(path) = env_var("SKIKA_LOGIN_PATH") {
        config.api.login_path = path;
    }
    if let Some(timeout) = env_var("SKIKA_TIMEOUT_SECS") {
        config.api.timeout_secs = timeout
            .parse::<u64>()
            .map_err(|e| SkikaError::Config(format!("Invalid SKIKA_TIMEOUT_SECS: {}", e)))?;
    }
    if let Some(backend) = env_var("SKIKA_STORAGE_BACKEND") {
        config.storage.backend = backend.parse()?;
    }
    if let Some(path) = env_var("SKIKA_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    }
    Ok(())
}

/// Non-empty environment variable, trimmed
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use skika_domain::StorageBackend;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const OVERRIDE_VARS: [&str; 7] = [
        "SKIKA_API_BASE_URL",
        "NEXT_PUBLIC_API_BASE_URL",
        "SKIKA_REFRESH_PATH",
        "SKIKA_LOGIN_PATH",
        "SKIKA_TIMEOUT_SECS",
        "SKIKA_STORAGE_BACKEND",
        "SKIKA_STORAGE_PATH",
    ];

    fn clear_overrides() {
        for key in OVERRIDE_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_env_overrides_replace_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_overrides();

        std::env::set_var("SKIKA_API_BASE_URL", "https://api.skika.example/api");
        std::env::set_var("SKIKA_TIMEOUT_SECS", "5");
        std::env::set_var("SKIKA_STORAGE_BACKEND", "Memory");
        std::env::set_var("SKIKA_STORAGE_PATH", "/tmp/skika-session.json");

        let mut config = Config::default();
        let result = apply_env_overrides(&mut config);
        clear_overrides();

        assert!(result.is_ok(), "overrides should apply: {:?}", result.err());
        assert_eq!(config.api.base_url, "https://api.skika.example/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.refresh_path, "/token/refresh/");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/skika-session.json"));
    }

    #[test]
    fn test_public_base_url_is_a_fallback() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_overrides();

        std::env::set_var("NEXT_PUBLIC_API_BASE_URL", "https://public.example/api");
        let mut config = Config::default();
        apply_env_overrides(&mut config).unwrap();
        assert_eq!(config.api.base_url, "https://public.example/api");

        std::env::set_var("SKIKA_API_BASE_URL", "https://preferred.example/api");
        apply_env_overrides(&mut config).unwrap();
        assert_eq!(config.api.base_url, "https://preferred.example/api");

        clear_overrides();
    }

    #[test]
    fn test_invalid_override_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_overrides();

        std::env::set_var("SKIKA_TIMEOUT_SECS", "soon");
        let result = apply_env_overrides(&mut Config::default());
        assert!(matches!(result, Err(SkikaError::Config(_))));

        clear_overrides();
        std::env::set_var("SKIKA_STORAGE_BACKEND", "cloud");
        let result = apply_env_overrides(&mut Config::default());
        assert!(matches!(result, Err(SkikaError::Config(_))));

        clear_overrides();
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_overrides();

        std::env::set_var("SKIKA_REFRESH_PATH", "   ");
        let mut config = Config::default();
        apply_env_overrides(&mut config).unwrap();
        clear_overrides();

        assert_eq!(config.api.refresh_path, "/token/refresh/");
    }

    #[test]
    fn test_load_from_file_toml_partial() {
        let file = temp_config(
            ".toml",
            r#"
                [api]
                base_url = "https://toml.example/api"
                timeout_secs = 10
            "#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.base_url, "https://toml.example/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.login_path, "/token/");
        assert_eq!(config.storage.backend, StorageBackend::File);
    }

    #[test]
    fn test_load_from_file_json() {
        let file = temp_config(
            ".json",
            r#"{"storage": {"backend": "keychain", "keychain_service": "Skika.test"}}"#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Keychain);
        assert_eq!(config.storage.keychain_service, "Skika.test");
        assert_eq!(config.api, skika_domain::ApiConfig::default());
    }

    #[test]
    fn test_load_from_file_invalid_format() {
        let file = temp_config(".toml", "[api\nbase_url = ");
        let err = load_from_file(Some(file.path().to_path_buf())).unwrap_err();

        match err {
            SkikaError::Config(msg) => assert!(msg.contains("Invalid TOML format"), "{}", msg),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file_missing_and_unsupported() {
        let missing = load_from_file(Some(PathBuf::from("/nonexistent/skika.toml")));
        assert!(matches!(missing, Err(SkikaError::Config(_))));

        let file = temp_config(".yaml", "api: {}");
        let unsupported = load_from_file(Some(file.path().to_path_buf()));
        match unsupported {
            Err(SkikaError::Config(msg)) => assert!(msg.contains("Unsupported config format")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
