//! Platform keychain session store
//!
//! Stores each session key as its own keychain entry under one service name
//! (macOS Keychain, Windows Credential Manager, Secret Service on Linux and
//! the BSDs, via `keyring`). Keychain calls block, so they run on the
//! blocking pool.
//!
//! `keyring` falls back to an in-process mock when no platform store is
//! compiled in, so construction fails on targets without one.

use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use super::{SessionStore, StorageError, StorageResult};

const PLATFORM_STORE_AVAILABLE: bool = cfg!(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "windows",
    target_os = "linux",
    target_os = "freebsd",
    target_os = "openbsd"
));

/// Session store backed by the platform keychain
#[derive(Debug, Clone)]
pub struct KeychainSessionStore {
    service_name: String,
}

impl KeychainSessionStore {
    /// # Arguments
    /// * `service_name` - Keychain service identifier (e.g.
    ///   "Skika.dashboard")
    ///
    /// # Errors
    /// Returns `StorageError::Unavailable` on targets without a platform
    /// credential store.
    pub fn new(service_name: impl Into<String>) -> StorageResult<Self> {
        if !PLATFORM_STORE_AVAILABLE {
            return Err(StorageError::Unavailable(format!(
                "no platform keychain on {}",
                std::env::consts::OS
            )));
        }
        Ok(Self { service_name: service_name.into() })
    }

    /// Keychain service every entry is stored under.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    async fn with_entry<T, F>(&self, key: &str, op: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> StorageResult<T> + Send + 'static,
    {
        let service = self.service_name.clone();
        let account = key.to_string();

        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &account).map_err(|e| {
                StorageError::Keychain(format!("Failed to open entry {}: {}", account, e))
            })?;
            op(entry)
        })
        .await
        .map_err(|e| StorageError::Unavailable(format!("keychain task failed: {}", e)))?
    }
}

#[async_trait]
impl SessionStore for KeychainSessionStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        debug!(service = %self.service_name, key = %key, "Reading session key from keychain");

        let account = key.to_string();
        self.with_entry(key, move |entry| match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::Keychain(format!("Failed to read {}: {}", account, e))),
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(service = %self.service_name, key = %key, "Writing session key to keychain");

        let account = key.to_string();
        let value = value.to_string();
        self.with_entry(key, move |entry| {
            entry
                .set_password(&value)
                .map_err(|e| StorageError::Keychain(format!("Failed to store {}: {}", account, e)))
        })
        .await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        debug!(service = %self.service_name, key = %key, "Deleting session key from keychain");

        let account = key.to_string();
        self.with_entry(key, move |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StorageError::Keychain(format!("Failed to delete {}: {}", account, e))),
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "keychain"
    }
}
