//! API-specific error types
//!
//! Every failure a dashboard call can produce, with the `message` / `status`
//! / `data` accessors callers use to render it.

use serde_json::Value;
use skika_common::StorageError;
use skika_domain::constants::{DEFAULT_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE};
use thiserror::Error;

/// Coarse classification of API errors for callers deciding what to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403) - session expired or forbidden
    Authentication,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth)
    Client,
    /// Network/connection errors, no response received
    Network,
    /// Failures that never reached or never came from the backend
    Local,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// No HTTP response was received (connect failure, timeout, reset).
    #[error("Network error: {detail}")]
    Network { detail: String },

    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String, data: Value },

    /// A 2xx body did not match the expected shape.
    #[error("Failed to parse response (HTTP {status}): {detail}")]
    Decode { status: u16, detail: String },

    #[error("Failed to serialize request body: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Build an HTTP error from a raw response body.
    ///
    /// The body is parsed as JSON (anything else becomes `{}`); its `error`
    /// string, when present and non-empty, is the message.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let data = serde_json::from_slice::<Value>(body)
            .unwrap_or_else(|_| Value::Object(Default::default()));
        let message = data
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();

        Self::Http { status, message, data }
    }

    /// User-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::Network { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status, `0` when no response was involved.
    pub fn status(&self) -> u16 {
        match self {
            Self::Http { status, .. } | Self::Decode { status, .. } => *status,
            Self::Network { .. } | Self::Encode(_) | Self::Config(_) | Self::Storage(_) => 0,
        }
    }

    /// Parsed error body of an HTTP error.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Http { data, .. } => Some(data),
            _ => None,
        }
    }

    /// The `code` field of an HTTP error body.
    pub fn code(&self) -> Option<&str> {
        self.data().and_then(|data| data.get("code")).and_then(Value::as_str)
    }

    /// `true` for a 401 whose body carries `code` equal to `invalid_code`.
    pub fn is_token_invalid(&self, invalid_code: &str) -> bool {
        self.status_code() == Some(401) && self.code() == Some(invalid_code)
    }

    /// Coarse classification for callers that branch on error kind.
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Network { .. } => ApiErrorCategory::Network,
            Self::Http { status, .. } => match status {
                401 | 403 => ApiErrorCategory::Authentication,
                429 => ApiErrorCategory::RateLimit,
                500..=599 => ApiErrorCategory::Server,
                _ => ApiErrorCategory::Client,
            },
            Self::Decode { .. } | Self::Encode(_) | Self::Config(_) | Self::Storage(_) => {
                ApiErrorCategory::Local
            }
        }
    }

    fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}
