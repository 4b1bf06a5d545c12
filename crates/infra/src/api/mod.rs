//! Dashboard backend API client
//!
//! This module provides the authenticated HTTP client the officer dashboard
//! talks to its backend through, plus the typed endpoints and the sign-in
//! session built on top of it.
//!
//! # Architecture
//!
//! - [`ApiClient`]: bearer headers, single-flight token refresh, retry-once,
//!   normalized [`ApiError`]s
//! - [`TokenStore`]: in-memory token pair mirrored into a `SessionStore`
//! - [`DashboardApi`]: typed dashboard endpoints with list-envelope
//!   normalization
//! - [`AuthSession`]: login / logout / restore / password reset

pub mod auth;
pub mod client;
pub mod commands;
pub mod errors;
pub mod session;

pub use auth::{SessionTokens, TokenStore};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use commands::DashboardApi;
pub use errors::{ApiError, ApiErrorCategory};
pub use session::{validate_credentials, AuthSession, SessionError};
