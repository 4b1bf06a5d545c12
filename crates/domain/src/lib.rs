//! # Skika Domain
//!
//! Business domain types and models for the Skika officer dashboard.
//!
//! This crate contains:
//! - Dashboard resource types (reports, projects, feedback, wards, users)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Client-side analytics over fetched resources
//!
//! ## Architecture
//! - No dependencies on other Skika crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod analytics;
pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
