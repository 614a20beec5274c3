//! Client-side session state.
//!
//! DESIGN
//! ======
//! One [`Session`] per [`crate::ApiClient`], shared by `Arc`. The access
//! token, the authenticated flag and the loading flag live together behind a
//! single `RwLock` so readers always see a consistent [`SessionSnapshot`].
//! Writers are `pub(crate)`: only the client core, the auth API and the
//! session monitor change session state.
//!
//! The token is mirrored into a [`KeyValueStore`] under
//! [`ACCESS_TOKEN_KEY`] so it survives restarts. Both writers flip in-memory
//! state before touching the store. `clear_auth` therefore never leaves the
//! session authenticated when the store fails, and `set_auth` still adopts
//! the token in memory when persisting it fails.

use std::sync::{Arc, PoisonError, RwLock};

use crate::events::SessionEvent;
use crate::store::{ACCESS_TOKEN_KEY, KeyValueStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub access_token: Option<String>,
    pub is_authenticated: bool,
    /// True until the first verification has settled.
    pub is_loading: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self { access_token: None, is_authenticated: false, is_loading: true }
    }
}

pub struct Session {
    state: RwLock<SessionSnapshot>,
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    /// Load any persisted token. The session still starts unauthenticated
    /// and loading; the startup check decides the rest.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let access_token = match store.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load persisted access token");
                None
            }
        };
        Self { state: RwLock::new(SessionSnapshot { access_token, ..SessionSnapshot::default() }), store }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.read().clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    // =========================================================================
    // WRITERS
    // =========================================================================

    /// Adopt a freshly issued access token.
    ///
    /// The session is authenticated even when the store write fails.
    pub(crate) fn set_auth(&self, token: &str) -> Result<(), StoreError> {
        {
            let mut state = self.write();
            state.access_token = Some(token.to_owned());
            state.is_authenticated = true;
            state.is_loading = false;
        }
        self.store.set(ACCESS_TOKEN_KEY, token)
    }

    /// Drop the access token locally and in the store.
    ///
    /// In-memory state is cleared even when the store write fails.
    pub(crate) fn clear_auth(&self) -> Result<(), StoreError> {
        {
            let mut state = self.write();
            state.access_token = None;
            state.is_authenticated = false;
            state.is_loading = false;
        }
        self.store.remove(ACCESS_TOKEN_KEY)
    }

    /// Record the outcome of a verification round trip.
    pub(crate) fn mark_verified(&self, authenticated: bool) {
        let mut state = self.write();
        state.is_authenticated = authenticated;
        state.is_loading = false;
    }

    /// Settle loading without changing the authenticated flag.
    pub(crate) fn finish_loading(&self) {
        self.write().is_loading = false;
    }

    /// Recompute flags in response to a session signal.
    pub(crate) fn apply_event(&self, event: &SessionEvent) {
        let mut state = self.write();
        match event {
            SessionEvent::LoginSuccess => {
                state.is_authenticated = state.access_token.is_some();
                state.is_loading = false;
            }
            SessionEvent::LogoutSuccess | SessionEvent::Unauthorized { .. } => {
                state.is_authenticated = false;
                state.is_loading = false;
            }
            SessionEvent::Error { .. } => {}
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
