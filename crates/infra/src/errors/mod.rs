//! Infrastructure error plumbing
//!
//! External error types (`reqwest`, `serde_json`, `toml`, `std::io`) are
//! converted into the domain [`SkikaError`](skika_domain::SkikaError) here so
//! the rest of the crate never matches on third-party errors directly.

mod conversions;

pub use conversions::InfraError;
