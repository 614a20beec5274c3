//! Login, signup, logout and token verification.

use reqwest::Method;
use serde::de::IgnoredAny;
use serde_json::Value;

use super::{LOGIN_PATH, LOGOUT_PATH, SIGNUP_PATH, VERIFY_PATH};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::events::SessionEvent;
use crate::guard::Route;
use crate::models::{Credential, TokenResponse};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and adopt the returned access token.
    ///
    /// Returns the route to show next.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] for malformed credentials (nothing is sent).
    /// - [`ApiError::CsrfFetch`] if no CSRF token could be obtained.
    /// - [`ApiError::Auth`] for rejected credentials or a reply without a token.
    pub async fn login(&self, credential: &Credential) -> Result<Route, ApiError> {
        credential.validate()?;
        self.client.fetch_csrf_token().await?;

        let TokenResponse { token } = self.client.post(LOGIN_PATH, credential).await?;
        if token.is_empty() {
            return Err(ApiError::Auth { status: 200, message: Some("failed to generate token".into()) });
        }

        self.client.set_auth(&token)?;
        self.client.publish(SessionEvent::LoginSuccess);
        tracing::info!(email = %credential.email, "logged in");
        Ok(Route::Pantry)
    }

    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Same as [`AuthApi::login`], plus [`ApiError::Server`] when the email
    /// is already registered.
    pub async fn register(&self, credential: &Credential) -> Result<Value, ApiError> {
        credential.validate()?;
        self.client.fetch_csrf_token().await?;
        let created: Value = self.client.post(SIGNUP_PATH, credential).await?;
        tracing::info!(email = %credential.email, "account registered");
        Ok(created)
    }

    /// End the session on the server. Local credentials are cleared whether
    /// or not the server call succeeds; `logout-success` is only published
    /// when it does.
    ///
    /// # Errors
    ///
    /// Returns the server or transport failure, after clearing local state.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.logout_remote().await;
        let cleared = self.client.clear_auth();

        match result {
            Ok(()) => {
                self.client.publish(SessionEvent::LogoutSuccess);
                tracing::info!("logged out");
                cleared
            }
            Err(e) => {
                if let Err(store_err) = cleared {
                    tracing::warn!(error = %store_err, "failed to remove persisted access token");
                }
                tracing::warn!(error = %e, "logout request failed; local session cleared");
                Err(e)
            }
        }
    }

    async fn logout_remote(&self) -> Result<(), ApiError> {
        self.client.fetch_csrf_token().await?;
        let _: IgnoredAny = self.client.request(Method::POST, LOGOUT_PATH, None).await?;
        Ok(())
    }

    /// Check the current access token with `GET /verify-token`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] if the token is invalid and could not be
    /// refreshed.
    pub async fn verify(&self) -> Result<Value, ApiError> {
        self.client.get(VERIFY_PATH).await
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
