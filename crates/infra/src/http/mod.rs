//! Thin HTTP transport shared by every API call.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
