//! Session token state
//!
//! Holds the access/refresh pair in memory and mirrors it into a
//! [`SessionStore`] so a restarted process can resume the session:
//! - memory is authoritative for outgoing requests
//! - the store is written on every change and read on `load_tokens`
//! - both keys are written together and removed together

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use skika_common::SessionStore;
use skika_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use tracing::{debug, info, warn};

use super::errors::ApiError;

/// In-memory token pair
///
/// Either half may be missing: a store written by an older client can hold
/// an access token without a refresh token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    /// Bearer token sent with authenticated calls
    pub access: Option<String>,
    /// Token exchanged for a new access token
    pub refresh: Option<String>,
}

impl SessionTokens {
    /// Pair with both halves present.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self { access: Some(access.into()), refresh: Some(refresh.into()) }
    }

    /// `true` when neither token is held.
    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |token: &Option<String>| token.as_ref().map(|_| "<redacted>");
        f.debug_struct("SessionTokens")
            .field("access", &redact(&self.access))
            .field("refresh", &redact(&self.refresh))
            .finish()
    }
}

/// Token pair plus its durable mirror
pub struct TokenStore {
    tokens: RwLock<SessionTokens>,
    storage: Arc<dyn SessionStore>,
}

impl TokenStore {
    /// Empty pair mirrored into `storage`.
    pub fn new(storage: Arc<dyn SessionStore>) -> Self {
        Self { tokens: RwLock::new(SessionTokens::default()), storage }
    }

    /// Durable store backing this pair.
    pub fn storage(&self) -> &Arc<dyn SessionStore> {
        &self.storage
    }

    /// Copy of the current pair.
    pub fn snapshot(&self) -> SessionTokens {
        self.tokens.read().clone()
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.tokens.read().access.clone()
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.read().refresh.clone()
    }

    /// `true` when a non-empty access token is held.
    pub fn has_access_token(&self) -> bool {
        self.tokens.read().access.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Replace the pair in memory, then persist both keys.
    ///
    /// Memory is updated even if persisting fails. If the refresh key cannot
    /// be written, the access key is restored to its previous value so the
    /// store never holds half of a new pair.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the store rejects a write.
    pub async fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        let previous =
            std::mem::replace(&mut *self.tokens.write(), SessionTokens::new(access, refresh));

        self.storage.set(ACCESS_TOKEN_KEY, access).await?;

        if let Err(err) = self.storage.set(REFRESH_TOKEN_KEY, refresh).await {
            warn!(
                backend = self.storage.backend_name(),
                error = %err,
                "Failed to persist refresh token, rolling back access token"
            );
            let rollback = match previous.access.as_deref() {
                Some(old) => self.storage.set(ACCESS_TOKEN_KEY, old).await,
                None => self.storage.remove(ACCESS_TOKEN_KEY).await,
            };
            if let Err(rollback_err) = rollback {
                warn!(error = %rollback_err, "Access token rollback failed");
            }
            return Err(err.into());
        }

        info!(backend = self.storage.backend_name(), "Session tokens stored");
        Ok(())
    }

    /// Populate memory from the store.
    ///
    /// Returns whether an access token was found. An empty store is not an
    /// error and leaves both tokens unset.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the store cannot be read; memory is
    /// left untouched in that case.
    pub async fn load_tokens(&self) -> Result<bool, ApiError> {
        let access = self.storage.get(ACCESS_TOKEN_KEY).await?;
        let refresh = self.storage.get(REFRESH_TOKEN_KEY).await?;

        let loaded = SessionTokens { access, refresh };
        let found = loaded.access.is_some();
        if found && loaded.refresh.is_none() {
            debug!("Stored session has an access token but no refresh token");
        }
        *self.tokens.write() = loaded;

        debug!(backend = self.storage.backend_name(), found, "Session tokens loaded");
        Ok(found)
    }

    /// Drop both tokens from memory and the store.
    ///
    /// Memory is always cleared. Both keys are removed even if the first
    /// removal fails; the first failure is returned.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the store rejects a removal.
    pub async fn clear_tokens(&self) -> Result<(), ApiError> {
        *self.tokens.write() = SessionTokens::default();

        let access = self.storage.remove(ACCESS_TOKEN_KEY).await;
        let refresh = self.storage.remove(REFRESH_TOKEN_KEY).await;

        info!(backend = self.storage.backend_name(), "Session tokens cleared");
        access.and(refresh).map_err(ApiError::from)
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("tokens", &*self.tokens.read())
            .field("backend", &self.storage.backend_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use skika_common::testing::MockSessionStore;
    use skika_common::MemorySessionStore;

    use super::*;

    #[test]
    fn debug_output_redacts_tokens() {
        let tokens = SessionTokens::new("secret-access", "secret-refresh");
        let rendered = format!("{:?}", tokens);

        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn set_tokens_writes_memory_and_store() {
        let storage = MemorySessionStore::new();
        let tokens = TokenStore::new(Arc::new(storage.clone()));

        tokens.set_tokens("a1", "r1").await.unwrap();

        assert!(tokens.has_access_token());
        assert_eq!(tokens.refresh_token().as_deref(), Some("r1"));
        assert_eq!(storage.snapshot("accessToken").as_deref(), Some("a1"));
        assert_eq!(storage.snapshot("refreshToken").as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn load_tokens_on_empty_store_is_a_no_op() {
        let tokens = TokenStore::new(Arc::new(MemorySessionStore::new()));

        assert!(!tokens.load_tokens().await.unwrap());
        assert!(!tokens.load_tokens().await.unwrap());
        assert!(!tokens.has_access_token());
        assert!(tokens.snapshot().is_empty());
    }

    #[tokio::test]
    async fn load_tokens_reads_partial_pairs() {
        let storage = MemorySessionStore::with_entries([("accessToken", "legacy")]);
        let tokens = TokenStore::new(Arc::new(storage));

        assert!(tokens.load_tokens().await.unwrap());
        assert_eq!(tokens.access_token().as_deref(), Some("legacy"));
        assert_eq!(tokens.refresh_token(), None);
    }

    #[tokio::test]
    async fn failed_refresh_write_rolls_back_access_key() {
        let storage =
            MockSessionStore::with_entries([("accessToken", "a0"), ("refreshToken", "r0")]);
        let tokens = TokenStore::new(Arc::new(storage.clone()));
        tokens.load_tokens().await.unwrap();

        storage.fail_writes_to("refreshToken");
        let result = tokens.set_tokens("a1", "r1").await;

        assert!(matches!(result, Err(ApiError::Storage(_))));
        assert_eq!(storage.snapshot("accessToken").as_deref(), Some("a0"));
        assert_eq!(storage.snapshot("refreshToken").as_deref(), Some("r0"));
        // Memory still carries the new pair for in-flight requests.
        assert_eq!(tokens.access_token().as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn failed_first_write_of_new_session_leaves_store_empty() {
        let storage = MockSessionStore::new();
        let tokens = TokenStore::new(Arc::new(storage.clone()));

        storage.fail_writes_to("refreshToken");
        assert!(tokens.set_tokens("a1", "r1").await.is_err());

        assert_eq!(storage.snapshot("accessToken"), None);
        assert_eq!(storage.snapshot("refreshToken"), None);
    }

    #[tokio::test]
    async fn clear_tokens_removes_both_keys_even_after_a_failure() {
        let storage =
            MockSessionStore::with_entries([("accessToken", "a0"), ("refreshToken", "r0")]);
        let tokens = TokenStore::new(Arc::new(storage.clone()));
        tokens.load_tokens().await.unwrap();

        storage.fail_writes_to("accessToken");
        assert!(tokens.clear_tokens().await.is_err());

        assert!(!tokens.has_access_token());
        assert_eq!(storage.snapshot("refreshToken"), None);
    }
}
