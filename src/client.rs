//! HTTP client core with request augmentation and the refresh protocol.
//!
//! DESIGN
//! ======
//! Every feature call funnels through [`ApiClient::request`]:
//!
//! 1. Augment: attach the cached CSRF token and, except on `GET /csrf`, the
//!    bearer access token.
//! 2. Send. No reply at all publishes [`SessionEvent::Error`] and fails with
//!    [`ApiError::Network`]; nothing is retried.
//! 3. Inspect the status:
//!    - `401`: refresh once via `POST /refresh-token` and replay. A second
//!      `401`, a `401` on the refresh call itself, or a failed refresh ends
//!      the session: auth is cleared and [`SessionEvent::Unauthorized`] is
//!      published exactly once.
//!    - CSRF rejection: drop the cached token, refetch, replay once.
//!    - anything else non-2xx propagates as-is.
//!
//! Retry state lives in a per-call [`Attempt`], so concurrent calls never see
//! each other's flags. The CSRF fetch goes out directly through
//! [`ApiClient::send`]. The refresh call does too, but gets its own one-shot
//! CSRF refetch; a `401` on it is always terminal.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{CSRF_PATH, LOGIN_PATH, REFRESH_PATH, SIGNUP_PATH};
use crate::config::ClientConfig;
use crate::csrf::{self, CSRF_HEADER, CsrfCache};
use crate::error::{ApiError, ErrorBody};
use crate::events::{COMMUNICATION_FAILED, EventBus, SessionEvent};
use crate::models::TokenResponse;
use crate::session::Session;
use crate::store::{FileStore, KeyValueStore};

const SESSION_EXPIRED: &str = "session expired";

/// One-shot retry flags for a single logical request.
#[derive(Debug, Default, Clone, Copy)]
struct Attempt {
    auth_retried: bool,
    csrf_retried: bool,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
    csrf: CsrfCache,
    events: EventBus,
}

/// Cheap to clone; clones share the cookie jar, session, CSRF cache and bus.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Build a client whose access token is persisted in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;

        let session = Arc::new(Session::restore(store));
        tracing::debug!(
            base_url = %config.base_url,
            has_token = session.access_token().is_some(),
            "api client ready"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url.clone(),
                session,
                csrf: CsrfCache::new(),
                events: EventBus::new(),
            }),
        })
    }

    /// Build a client persisting its token in `config.token_file`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config, Arc::new(FileStore::new(&config.token_file)))
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Currently cached CSRF token.
    #[must_use]
    pub fn csrf_token(&self) -> Option<String> {
        self.inner.csrf.get()
    }

    // =========================================================================
    // VERBS
    // =========================================================================

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, None).await
    }

    /// Send `method path` with an optional JSON body through the refresh
    /// protocol and decode the reply. An empty 2xx body decodes as JSON
    /// `null`, so `()` and `Option<_>` targets accept it.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] when no reply arrived.
    /// - [`ApiError::Auth`] when the session could not be recovered.
    /// - [`ApiError::Csrf`] when the CSRF retry was also rejected.
    /// - [`ApiError::Server`] for any other non-success status.
    /// - [`ApiError::Decode`] when the body does not match `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let bytes = self.execute(&method, path, body.as_ref()).await?;
        decode(&bytes)
    }

    // =========================================================================
    // CSRF
    // =========================================================================

    /// Fetch a fresh token from `GET /csrf` and cache it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::CsrfFetch`] if the server answers without a token
    /// or with a non-success status, and [`ApiError::Network`] if it does not
    /// answer.
    pub async fn fetch_csrf_token(&self) -> Result<String, ApiError> {
        let response = self.send(&Method::GET, CSRF_PATH, None).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "csrf fetch rejected");
            return Err(ApiError::CsrfFetch);
        }
        let token = csrf::token_from_headers(response.headers()).ok_or(ApiError::CsrfFetch)?;
        HeaderValue::from_str(&token).map_err(|_| ApiError::CsrfFetch)?;
        self.inner.csrf.set(token.clone());
        Ok(token)
    }

    /// Cached token, fetching one first if none is cached.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_csrf_token`].
    pub async fn ensure_csrf_token(&self) -> Result<String, ApiError> {
        match self.inner.csrf.get() {
            Some(token) => Ok(token),
            None => self.fetch_csrf_token().await,
        }
    }

    // =========================================================================
    // PROTOCOL
    // =========================================================================

    async fn execute(&self, method: &Method, path: &str, body: Option<&Value>) -> Result<Vec<u8>, ApiError> {
        let mut attempt = Attempt::default();
        loop {
            let response = self.send(method, path, body).await?;
            let status = response.status().as_u16();
            let bytes = response.bytes().await?.to_vec();
            tracing::debug!(%method, path, status, "api response");

            if (200..300).contains(&status) {
                return Ok(bytes);
            }

            let error_body = ErrorBody::parse(&bytes);

            if status == 401 {
                if is_credential_path(path) {
                    return Err(ApiError::from_response(status, error_body));
                }
                if attempt.auth_retried || path == REFRESH_PATH {
                    self.expire_session(error_body.message.as_deref());
                    return Err(ApiError::from_response(status, error_body));
                }
                attempt.auth_retried = true;
                match self.refresh_access_token().await {
                    Ok(token) => {
                        if let Err(e) = self.inner.session.set_auth(&token) {
                            tracing::warn!(error = %e, "failed to persist refreshed access token");
                        }
                        tracing::info!(path, "access token refreshed; replaying request");
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(path, error = %e, "access token refresh failed");
                        self.expire_session(error_body.message.as_deref());
                        return Err(ApiError::from_response(status, error_body));
                    }
                }
            }

            if !attempt.csrf_retried && error_body.is_csrf_rejection() {
                attempt.csrf_retried = true;
                tracing::info!(path, status, "csrf token rejected; refetching");
                self.inner.csrf.invalidate();
                self.fetch_csrf_token().await?;
                continue;
            }

            return Err(ApiError::from_response(status, error_body));
        }
    }

    /// Mint a new access token from the server-held refresh credential.
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let mut csrf_retried = false;
        loop {
            let response = self.send(&Method::POST, REFRESH_PATH, None).await?;
            let status = response.status().as_u16();
            let bytes = response.bytes().await?;

            if !(200..300).contains(&status) {
                let error_body = ErrorBody::parse(&bytes);
                if status != 401 && !csrf_retried && error_body.is_csrf_rejection() {
                    csrf_retried = true;
                    tracing::info!(status, "csrf token rejected on refresh; refetching");
                    self.inner.csrf.invalidate();
                    self.fetch_csrf_token().await?;
                    continue;
                }
                return Err(ApiError::from_response(status, error_body));
            }

            let token = decode::<TokenResponse>(&bytes)?.token;
            if token.is_empty() {
                return Err(ApiError::Auth { status, message: Some("refresh returned no token".into()) });
            }
            HeaderValue::from_str(&format!("Bearer {token}"))?;
            return Ok(token);
        }
    }

    /// Terminal auth failure: clear local credentials and tell subscribers.
    fn expire_session(&self, reason: Option<&str>) {
        if let Err(e) = self.inner.session.clear_auth() {
            tracing::warn!(error = %e, "failed to remove persisted access token");
        }
        let reason = reason.unwrap_or(SESSION_EXPIRED).to_owned();
        tracing::warn!(%reason, "session invalidated");
        self.inner.events.publish(SessionEvent::Unauthorized { reason });
    }

    /// One augmented round trip with no interception.
    async fn send(&self, method: &Method, path: &str, body: Option<&Value>) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self.inner.http.request(method.clone(), &url);

        if let Some(token) = self.inner.csrf.get() {
            request = request.header(CSRF_HEADER, HeaderValue::from_str(&token)?);
        }
        if path != CSRF_PATH {
            if let Some(token) = self.inner.session.access_token() {
                request = request.header(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        match request.send().await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(%method, path, error = %e, "request did not reach the server");
                self.inner.events.publish(SessionEvent::Error { message: COMMUNICATION_FAILED.to_owned() });
                Err(ApiError::Network(e))
            }
        }
    }

    // =========================================================================
    // AUTH HOOKS
    // =========================================================================

    pub(crate) fn set_auth(&self, token: &str) -> Result<(), ApiError> {
        HeaderValue::from_str(&format!("Bearer {token}"))?;
        self.inner.session.set_auth(token)?;
        Ok(())
    }

    /// Always clears in-memory state; reports a storage failure only after.
    pub(crate) fn clear_auth(&self) -> Result<(), ApiError> {
        self.inner.session.clear_auth()?;
        Ok(())
    }

    pub(crate) fn publish(&self, event: SessionEvent) {
        self.inner.events.publish(event);
    }
}

/// Login and signup answer 401 for bad credentials, which a refresh can't fix.
fn is_credential_path(path: &str) -> bool {
    path == LOGIN_PATH || path == SIGNUP_PATH
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
