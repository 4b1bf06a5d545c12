//! Configuration structures
//!
//! Plain serde types; loading and environment overrides live in
//! `skika-infra::config`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_LOGIN_PATH, DEFAULT_REFRESH_PATH,
    DEFAULT_SESSION_FILE, DEFAULT_TIMEOUT_SECS, TOKEN_NOT_VALID_CODE,
};
use crate::errors::{Result, SkikaError};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Path of the token refresh endpoint
    pub refresh_path: String,
    /// Path of the login (token obtain) endpoint
    pub login_path: String,
    /// `code` value in a 401 body that marks an expired access token
    pub invalid_token_code: String,
    /// Transport timeout applied to every HTTP call
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            invalid_token_code: TOKEN_NOT_VALID_CODE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Check the settings a client cannot work without.
    ///
    /// # Errors
    /// Returns `SkikaError::Config` if the base URL is empty or not http(s),
    /// an endpoint path does not start with `/`, or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(SkikaError::Config("API base URL is empty".to_string()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(SkikaError::Config(format!(
                "API base URL must start with http:// or https://: {}",
                base
            )));
        }
        for (name, path) in [("refresh_path", &self.refresh_path), ("login_path", &self.login_path)]
        {
            if !path.starts_with('/') {
                return Err(SkikaError::Config(format!("{} must start with '/': {}", name, path)));
            }
        }
        if self.timeout_secs == 0 {
            return Err(SkikaError::Config("timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for `base + path` joins.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim().trim_end_matches('/').to_string()
    }
}

/// Where the durable session (tokens, profile) is kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory only; nothing survives a restart
    Memory,
    /// JSON file on disk
    #[default]
    File,
    /// Platform keychain
    Keychain,
}

impl std::str::FromStr for StorageBackend {
    type Err = SkikaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "keychain" => Ok(Self::Keychain),
            other => Err(SkikaError::Config(format!("Unknown storage backend: {}", other))),
        }
    }
}

/// Durable session storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Session file used by the `file` backend
    pub path: PathBuf,
    /// Keychain service name used by the `keychain` backend
    pub keychain_service: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: PathBuf::from(DEFAULT_SESSION_FILE),
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
        }
    }
}
