//! Durable session storage
//!
//! A small key-value abstraction the API client mirrors its session (token
//! pair, signed-in profile) into, so a restarted process can resume without
//! logging in again.
//!
//! ```text
//! ┌──────────────────┐
//! │   SessionStore   │  get / set / remove
//! └────────┬─────────┘
//!          ├──► MemorySessionStore    (process memory, tests)
//!          ├──► FileSessionStore      (JSON file, survives restarts)
//!          └──► KeychainSessionStore  (platform keychain, `platform` feature)
//! ```

mod error;
pub mod file;
#[cfg(feature = "platform")]
pub mod keychain;
pub mod memory;

use async_trait::async_trait;

pub use error::{StorageError, StorageResult};
pub use file::FileSessionStore;
#[cfg(feature = "platform")]
pub use keychain::KeychainSessionStore;
pub use memory::MemorySessionStore;

/// Key-value store for session state
///
/// Implementations must be safe to share between tasks. `remove` is
/// idempotent: removing a missing key is not an error.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete the value stored under `key`.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Human-readable backend name for logs.
    fn backend_name(&self) -> &'static str;
}
