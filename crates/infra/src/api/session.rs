//! Officer sign-in session
//!
//! Login, logout and restore on top of [`ApiClient`]. The signed-in profile
//! is persisted next to the tokens so a restarted process knows who is
//! signed in before its first API call.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skika_domain::constants::{DEFAULT_LOGIN_PATH, PASSWORD_RESET_PATH, USER_PROFILE_KEY};
use skika_domain::OfficerProfile;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::client::ApiClient;
use super::errors::ApiError;

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$")
        .expect("PHONE_REGEX should compile - this is a bug")
});

/// Session operation errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// Backend or storage failure
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SessionError {
    /// User-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Api(err) => err.message(),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    phone_number: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
    #[serde(default)]
    user: Option<OfficerProfile>,
}

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
    phone_number: &'a str,
}

/// Signed-in officer session
pub struct AuthSession {
    client: ApiClient,
    login_path: String,
    user: RwLock<Option<OfficerProfile>>,
}

impl AuthSession {
    /// Signed-out session over `client`, logging in at `/token/`.
    pub fn new(client: ApiClient) -> Self {
        Self { client, login_path: DEFAULT_LOGIN_PATH.to_string(), user: RwLock::new(None) }
    }

    /// Override the token-obtain endpoint (default `/token/`).
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    /// Client the session authenticates.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Sign in with phone number and password
    ///
    /// Stores the returned token pair and profile. When the backend returns
    /// no profile, a minimal one carrying the phone number is kept instead.
    ///
    /// # Errors
    ///
    /// - `SessionError::Validation` for missing fields or a malformed phone
    ///   number (no request is sent)
    /// - `SessionError::Api` if the backend rejects the credentials or the
    ///   tokens cannot be persisted
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        phone_number: &str,
        password: &str,
    ) -> Result<OfficerProfile, SessionError> {
        validate_credentials(phone_number, password)?;

        let request = LoginRequest { phone_number, password };
        let response: LoginResponse =
            self.client.unauthenticated_post(&self.login_path, &request).await?;

        if let Err(err) = self.client.set_tokens(&response.access, &response.refresh).await {
            // A session that cannot be persisted is not reported as signed in.
            if let Err(clear_err) = self.client.clear_tokens().await {
                debug!(error = %clear_err, "Failed to clear partially stored session");
            }
            return Err(err.into());
        }

        let profile = response.user.unwrap_or_else(|| OfficerProfile {
            phone: Some(phone_number.to_string()),
            ..OfficerProfile::default()
        });
        self.persist_profile(&profile).await;
        *self.user.write() = Some(profile.clone());

        info!(role = profile.role.as_deref().unwrap_or("unknown"), "Officer signed in");
        Ok(profile)
    }

    /// Resume a session from durable storage
    ///
    /// Returns whether an access token was found. A profile stored without
    /// tokens, or one that no longer parses, is discarded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the session store cannot be read
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<bool, SessionError> {
        let authenticated = self.client.load_tokens().await?;
        let storage = self.client.storage();

        let profile = match storage.get(USER_PROFILE_KEY).await.map_err(ApiError::from)? {
            Some(raw) if authenticated => match serde_json::from_str::<OfficerProfile>(&raw) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!(error = %err, "Stored profile is unreadable, dropping it");
                    self.forget_profile().await;
                    None
                }
            },
            Some(_) => {
                debug!("Dropping profile stored without a session");
                self.forget_profile().await;
                None
            }
            None => None,
        };

        *self.user.write() = profile;
        debug!(authenticated, "Session restored");
        Ok(authenticated)
    }

    /// Sign out: forget tokens and profile
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the session store rejects a removal;
    /// the in-memory session is cleared regardless
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.user.write().take();

        let tokens = self.client.clear_tokens().await;
        let profile = self.client.storage().remove(USER_PROFILE_KEY).await.map_err(ApiError::from);

        info!("Officer signed out");
        tokens.and(profile).map_err(SessionError::from)
    }

    /// Signed-in profile, `None` once the tokens are gone (logout or a
    /// failed refresh).
    pub fn current_user(&self) -> Option<OfficerProfile> {
        if !self.is_authenticated() {
            return None;
        }
        self.user.read().clone()
    }

    /// `true` while the client holds an access token.
    pub fn is_authenticated(&self) -> bool {
        self.client.has_access_token()
    }

    /// Ask the backend to start a password reset
    ///
    /// # Errors
    ///
    /// - `SessionError::Validation` if the phone number is empty
    /// - `SessionError::Api` if the request fails
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, phone_number: &str) -> Result<Value, SessionError> {
        if phone_number.trim().is_empty() {
            return Err(SessionError::Validation("Phone number is required".to_string()));
        }

        let request = PasswordResetRequest { phone_number };
        let response = self.client.unauthenticated_post(PASSWORD_RESET_PATH, &request).await?;

        info!("Password reset requested");
        Ok(response)
    }

    async fn persist_profile(&self, profile: &OfficerProfile) {
        let stored = match serde_json::to_string(profile) {
            Ok(raw) => {
                self.client.storage().set(USER_PROFILE_KEY, &raw).await.map_err(|e| e.to_string())
            }
            Err(err) => Err(err.to_string()),
        };
        if let Err(err) = stored {
            warn!(error = %err, "Failed to persist signed-in profile");
        }
    }

    async fn forget_profile(&self) {
        if let Err(err) = self.client.storage().remove(USER_PROFILE_KEY).await {
            warn!(error = %err, "Failed to remove stored profile");
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("login_path", &self.login_path)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Login form rules: both fields present, phone number in a dialable shape.
pub fn validate_credentials(phone_number: &str, password: &str) -> Result<(), SessionError> {
    if phone_number.is_empty() || password.is_empty() {
        return Err(SessionError::Validation(
            "Phone number and password are required".to_string(),
        ));
    }
    if !PHONE_REGEX.is_match(phone_number) {
        return Err(SessionError::Validation("Please enter a valid phone number".to_string()));
    }
    Ok(())
}
