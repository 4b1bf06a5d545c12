//! Shared building blocks for Skika crates.
//!
//! Currently this is the session storage layer the API client persists its
//! token pair and signed-in profile through.
//!
//! # Features
//!
//! - `platform`: platform keychain backend ([`storage::KeychainSessionStore`])
//! - `test-utils`: in-memory doubles with failure injection ([`testing`])

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod storage;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use storage::{
    FileSessionStore, MemorySessionStore, SessionStore, StorageError, StorageResult,
};
#[cfg(feature = "platform")]
pub use storage::KeychainSessionStore;
