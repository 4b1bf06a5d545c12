//! Testing utilities and helpers
//!
//! - **[`mocks`]**: Session store doubles that record calls and fail on demand
//!
//! ## Usage
//!
//! ```rust
//! use skika_common::testing::MockSessionStore;
//!
//! let store = MockSessionStore::new();
//! store.fail_writes_to("refreshToken");
//! // hand `store.clone()` to the code under test, then inspect `store`
//! ```

pub mod mocks;

pub use mocks::{MockSessionStore, StoreOperation};
