//! Configuration loading and session store selection
//!
//! This module loads application configuration from files and environment
//! variables, and turns the storage settings into a live `SessionStore`.

pub mod loader;

use std::sync::Arc;

use skika_common::{FileSessionStore, KeychainSessionStore, MemorySessionStore, SessionStore};
use skika_domain::{Result, SkikaError, StorageBackend, StorageConfig};

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_file, probe_config_paths};

/// Build the session store selected by `storage`.
///
/// # Errors
/// Returns `SkikaError::Storage` if the keychain backend is selected on a
/// platform without a credential store.
pub fn build_session_store(storage: &StorageConfig) -> Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match storage.backend {
        StorageBackend::Memory => Arc::new(MemorySessionStore::new()),
        StorageBackend::File => Arc::new(FileSessionStore::new(storage.path.clone())),
        StorageBackend::Keychain => Arc::new(
            KeychainSessionStore::new(storage.keychain_service.clone())
                .map_err(|e| SkikaError::Storage(e.to_string()))?,
        ),
    };

    tracing::debug!(backend = store.backend_name(), "Session store selected");
    Ok(store)
}
