//! Application constants
//!
//! Centralized location for domain-level constants shared by the client,
//! the session layer and the configuration loader.

// Backend defaults
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_REFRESH_PATH: &str = "/token/refresh/";
pub const DEFAULT_LOGIN_PATH: &str = "/token/";
pub const PASSWORD_RESET_PATH: &str = "/password-reset/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error `code` the backend sends with a 401 when the access token expired.
pub const TOKEN_NOT_VALID_CODE: &str = "token_not_valid";

// Durable session keys
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_PROFILE_KEY: &str = "skika_user";

// Session storage defaults
pub const DEFAULT_SESSION_FILE: &str = ".skika/session.json";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "Skika.dashboard";

// Client-side error messages surfaced to callers
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";
pub const DEFAULT_ERROR_MESSAGE: &str = "API request failed";

// Analytics
pub const PROJECT_PROGRESS_LIMIT: usize = 8;
