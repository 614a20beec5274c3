//! Anti-forgery token cache.
//!
//! `GET /csrf` answers with the token in the `x-csrf-token` response header.
//! The cached value is echoed back on every outbound request until the
//! server rejects it.

use std::sync::{PoisonError, RwLock};

use reqwest::header::HeaderMap;

/// Header carrying the token in both directions.
pub const CSRF_HEADER: &str = "x-csrf-token";

#[derive(Debug, Default)]
pub struct CsrfCache {
    token: RwLock<Option<String>>,
}

impl CsrfCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn invalidate(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Token from a `GET /csrf` response, if the header is present and non-empty.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "csrf_test.rs"]
mod tests;
