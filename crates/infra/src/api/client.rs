//! Authenticated API client with single-flight token refresh
//!
//! Every call follows the same path:
//!
//! ```text
//! SEND ──2xx──────────────────────────────► Ok(body)
//!   ├──401 + invalid-token code──► REFRESH ──ok──► RETRY SEND ──► retry outcome
//!   │                                  └──failed──► original 401
//!   ├──other non-2xx──────────────────────► ApiError::Http
//!   └──no response────────────────────────► ApiError::Network
//! ```
//!
//! The retry never loops back into REFRESH. Concurrent callers that hit an
//! expired token share one refresh: the first one spawns it, later ones
//! await the same [`Shared`] future. The refresh runs as its own task, so
//! it settles for every waiter even if the caller that started it is
//! dropped.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skika_common::{MemorySessionStore, SessionStore};
use skika_domain::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_REFRESH_PATH, DEFAULT_TIMEOUT_SECS, TOKEN_NOT_VALID_CODE,
};
use skika_domain::{ApiConfig, SkikaError};
use tracing::{debug, info, info_span, instrument, warn, Instrument};
use url::Url;

use super::auth::{SessionTokens, TokenStore};
use super::errors::ApiError;
use crate::http::HttpClient;

type PendingRefresh = Shared<BoxFuture<'static, bool>>;

/// Configuration for API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// Base URL every endpoint is appended to (e.g. "https://skika.example/api")
    pub base_url: String,
    /// Token refresh endpoint, relative to `base_url`
    pub refresh_path: String,
    /// `code` in a 401 body that marks an expired access token
    pub invalid_token_code: String,
    /// Transport timeout for every request
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            invalid_token_code: TOKEN_NOT_VALID_CODE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            base_url: api.normalized_base_url(),
            refresh_path: api.refresh_path.clone(),
            invalid_token_code: api.invalid_token_code.clone(),
            timeout: Duration::from_secs(api.timeout_secs),
        }
    }
}

impl ApiClientConfig {
    /// Config pointing at `base_url` with every other setting defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }
}

/// Authenticated client for the dashboard backend
///
/// Cheap to clone; clones share tokens and the in-flight refresh. Separate
/// instances share nothing.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    config: ApiClientConfig,
    tokens: TokenStore,
    pending_refresh: Mutex<Option<PendingRefresh>>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `config` - Client configuration
    /// * `storage` - Durable store the token pair is mirrored into
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the base URL is not an http(s) URL or
    /// the HTTP client cannot be built
    pub fn new(config: ApiClientConfig, storage: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        Self::with_http_client(config, storage, http)
    }

    fn with_http_client(
        mut config: ApiClientConfig,
        storage: Arc<dyn SessionStore>,
        http: HttpClient,
    ) -> Result<Self, ApiError> {
        config.base_url = normalize_base_url(&config.base_url)?;
        if !config.refresh_path.starts_with('/') {
            return Err(ApiError::Config(format!(
                "refresh path must start with '/': {}",
                config.refresh_path
            )));
        }

        debug!(base_url = %config.base_url, backend = storage.backend_name(), "API client created");

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                tokens: TokenStore::new(storage),
                pending_refresh: Mutex::new(None),
            }),
        })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Effective configuration (base URL already normalized).
    pub fn config(&self) -> &ApiClientConfig {
        &self.inner.config
    }

    /// The durable store tokens are mirrored into.
    pub fn storage(&self) -> Arc<dyn SessionStore> {
        Arc::clone(self.inner.tokens.storage())
    }

    /// Current in-memory token pair.
    pub fn tokens(&self) -> SessionTokens {
        self.inner.tokens.snapshot()
    }

    /// Store a new token pair in memory and in the durable store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if persisting fails. The in-memory pair is
    /// replaced regardless.
    pub async fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        self.inner.tokens.set_tokens(access, refresh).await
    }

    /// Load the token pair from the durable store.
    ///
    /// Idempotent. Returns whether an access token was found.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store cannot be read
    pub async fn load_tokens(&self) -> Result<bool, ApiError> {
        self.inner.tokens.load_tokens().await
    }

    /// Forget both tokens, in memory and in the durable store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the store rejects a removal. Memory is
    /// cleared regardless.
    pub async fn clear_tokens(&self) -> Result<(), ApiError> {
        self.inner.tokens.clear_tokens().await
    }

    /// `true` when a non-empty access token is held in memory.
    pub fn has_access_token(&self) -> bool {
        self.inner.tokens.has_access_token()
    }

    /// Execute a request against `base_url + endpoint`
    ///
    /// A 401 carrying the configured invalid-token code triggers one shared
    /// token refresh and a single retry; the retry's outcome is returned
    /// as-is. Requests with `skip_auth` never carry a bearer token and never
    /// trigger a refresh.
    ///
    /// Empty 2xx bodies deserialize from JSON `null`, so `()` and `Option<_>`
    /// work for 204 responses.
    ///
    /// # Errors
    ///
    /// - `ApiError::Network` when no response was received
    /// - `ApiError::Http` for non-2xx responses (including a 401 whose
    ///   refresh failed)
    /// - `ApiError::Decode` when a 2xx body does not match `T`
    /// - `ApiError::Encode` when `body` cannot be serialized
    #[instrument(skip_all, fields(method = %method, endpoint = %endpoint, skip_auth = skip_auth))]
    pub async fn request<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        skip_auth: bool,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::Encode(e.to_string()))?;

        let response = self.inner.execute(&method, endpoint, body.as_ref(), skip_auth).await?;
        if response.is_success() {
            return response.decode();
        }

        let error = response.into_error();
        if skip_auth || !error.is_token_invalid(&self.inner.config.invalid_token_code) {
            return Err(error);
        }

        debug!("Access token rejected, refreshing");
        if !self.inner.refresh().await {
            return Err(error);
        }

        let retry = self.inner.execute(&method, endpoint, body.as_ref(), false).await?;
        if retry.is_success() {
            retry.decode()
        } else {
            Err(retry.into_error())
        }
    }

    /// Execute a GET request
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<Value, T>(Method::GET, endpoint, None, false).await
    }

    /// Execute a POST request
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, Some(body), false).await
    }

    /// Execute a PUT request
    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, endpoint, Some(body), false).await
    }

    /// Execute a PATCH request
    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, endpoint, Some(body), false).await
    }

    /// POST without an `Authorization` header
    ///
    /// For pre-login endpoints, where a stale stored token would otherwise be
    /// rejected before the credentials are even looked at.
    pub async fn unauthenticated_post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, Some(body), true).await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.inner.config)
            .field("tokens", &self.inner.tokens)
            .field("refresh_in_flight", &self.inner.pending_refresh.lock().is_some())
            .finish()
    }
}

impl ClientInner {
    async fn execute(
        &self,
        method: &Method,
        endpoint: &str,
        body: Option<&Value>,
        skip_auth: bool,
    ) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.config.base_url, endpoint);

        let mut request =
            self.http.request(method.clone(), url.as_str()).header(CONTENT_TYPE, "application/json");

        let token = if skip_auth {
            None
        } else {
            self.tokens.access_token().filter(|t| !t.is_empty())
        };
        let authenticated = token.is_some();
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http.send(request).await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| ApiError::Network {
            detail: format!("failed to read response body: {}", e),
        })?;

        debug!(%method, %url, %status, authenticated, "API response");
        Ok(RawResponse { status, body: body.to_vec() })
    }

    /// Join the in-flight refresh, or start one.
    async fn refresh(self: &Arc<Self>) -> bool {
        let pending = {
            let mut slot = self.pending_refresh.lock();
            match slot.as_ref() {
                Some(pending) => {
                    debug!("Joining in-flight token refresh");
                    pending.clone()
                }
                None => {
                    let pending = self.spawn_refresh();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    // Called with the slot locked; the task clears the slot when it settles.
    fn spawn_refresh(self: &Arc<Self>) -> PendingRefresh {
        let inner = Arc::clone(self);
        let task = tokio::spawn(
            async move {
                let refreshed = inner.run_refresh().await;
                inner.pending_refresh.lock().take();
                refreshed
            }
            .instrument(info_span!("token_refresh")),
        );

        let weak: Weak<Self> = Arc::downgrade(self);
        async move {
            match task.await {
                Ok(refreshed) => refreshed,
                Err(err) => {
                    warn!(error = %err, "Token refresh task did not complete");
                    if let Some(inner) = weak.upgrade() {
                        inner.pending_refresh.lock().take();
                    }
                    false
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn run_refresh(&self) -> bool {
        let Some(refresh_token) = self.tokens.refresh_token().filter(|t| !t.is_empty()) else {
            debug!("No refresh token held, skipping refresh");
            return false;
        };

        let body = serde_json::json!({ "refresh": refresh_token });
        let sent = self.execute(&Method::POST, &self.config.refresh_path, Some(&body), true).await;
        let outcome = match sent {
            Ok(response) if response.is_success() => response
                .decode::<RefreshResponse>()
                .map_err(|e| e.to_string())
                .and_then(RefreshResponse::into_tokens),
            Ok(response) => Err(format!("refresh endpoint returned {}", response.status)),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok((access, rotated)) => {
                let refresh = rotated.unwrap_or(refresh_token);
                if let Err(err) = self.tokens.set_tokens(&access, &refresh).await {
                    warn!(error = %err, "Refreshed tokens could not be persisted");
                }
                info!("Access token refreshed");
                true
            }
            Err(reason) => {
                warn!(reason = %reason, "Token refresh failed, clearing session");
                if let Err(err) = self.tokens.clear_tokens().await {
                    warn!(error = %err, "Failed to clear stored session");
                }
                false
            }
        }
    }
}

/// Body of a successful refresh call
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
}

impl RefreshResponse {
    fn into_tokens(self) -> Result<(String, Option<String>), String> {
        let access = self
            .access
            .filter(|a| !a.is_empty())
            .ok_or_else(|| "refresh response carried no access token".to_string())?;
        Ok((access, self.refresh.filter(|r| !r.is_empty())))
    }
}

/// Fully-read response
struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl RawResponse {
    fn is_success(&self) -> bool {
        self.status.is_success()
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let parsed = if self.body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&self.body)
        };

        parsed.map_err(|e| ApiError::Decode { status: self.status.as_u16(), detail: e.to_string() })
    }

    fn into_error(self) -> ApiError {
        ApiError::from_response(self.status.as_u16(), &self.body)
    }
}

fn transport_error(err: SkikaError) -> ApiError {
    match err {
        SkikaError::Network(detail) => ApiError::Network { detail },
        other => ApiError::Config(other.to_string()),
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| ApiError::Config(format!("Invalid base URL {:?}: {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        scheme => Err(ApiError::Config(format!("Unsupported base URL scheme: {}", scheme))),
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    storage: Option<Arc<dyn SessionStore>>,
    http: Option<HttpClient>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the durable session store (defaults to process memory)
    pub fn storage(mut self, storage: Arc<dyn SessionStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Use a preconfigured transport instead of building one from the config
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let storage = self.storage.unwrap_or_else(|| Arc::new(MemorySessionStore::new()));

        match self.http {
            Some(http) => ApiClient::with_http_client(config, storage, http),
            None => ApiClient::new(config, storage),
        }
    }
}
