//! # Skika Infrastructure
//!
//! Everything in the dashboard client that performs I/O.
//!
//! This crate contains:
//! - The authenticated backend API client with single-flight token refresh
//! - Typed dashboard endpoints and the officer sign-in session
//! - The HTTP transport wrapper
//! - Configuration loading and session store selection
//! - Logging setup
//!
//! ## Architecture
//! - Builds on the plain types in `skika-domain`
//! - Persists sessions through the `SessionStore` backends in `skika-common`

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiClientConfig, ApiError, ApiErrorCategory, AuthSession,
    DashboardApi, SessionError, SessionTokens, TokenStore,
};
pub use errors::InfraError;
pub use http::HttpClient;
