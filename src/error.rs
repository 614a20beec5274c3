//! Client error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Transport, auth and CSRF failures are partially recovered inside
//! [`crate::ApiClient`] (one retry each). Whatever is left surfaces here as a
//! typed [`ApiError`] carrying the server's message when one was sent.
//! Callers turn it into user-facing text with [`crate::notice::notice_for`].

use serde::Deserialize;

use crate::store::StoreError;

// =============================================================================
// ERROR KIND
// =============================================================================

/// Coarse classification of a server-side failure.
///
/// Taken from the structured `type` field of the error body when present,
/// otherwise inferred from the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Csrf,
    NotFound,
    Database,
    Business,
    Internal,
}

impl ErrorKind {
    /// Parse the wire name used in the `type` field of error bodies.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "VALIDATION_ERROR" => Some(Self::Validation),
            "AUTHENTICATION_ERROR" => Some(Self::Authentication),
            "CSRF_ERROR" => Some(Self::Csrf),
            "NOT_FOUND" => Some(Self::NotFound),
            "DATABASE_ERROR" => Some(Self::Database),
            "BUSINESS_ERROR" => Some(Self::Business),
            "INTERNAL_ERROR" => Some(Self::Internal),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::Validation,
            401 => Self::Authentication,
            404 => Self::NotFound,
            500..=599 => Self::Internal,
            _ => Self::Business,
        }
    }

    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "AUTHENTICATION_ERROR",
            Self::Csrf => "CSRF_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Database => "DATABASE_ERROR",
            Self::Business => "BUSINESS_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

// =============================================================================
// ERROR BODY
// =============================================================================

/// Error payload returned by the backend: `{ "type", "message", "code" }`.
/// Every field is optional; a body that is not JSON parses as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
}

impl ErrorBody {
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Structured kind if the server sent a known one, else inferred from `status`.
    #[must_use]
    pub fn classify(&self, status: u16) -> ErrorKind {
        self.kind
            .as_deref()
            .and_then(ErrorKind::from_wire)
            .unwrap_or_else(|| ErrorKind::from_status(status))
    }

    /// Whether the server rejected the request's anti-forgery token.
    ///
    /// The structured `CSRF_ERROR` kind wins; older servers only say so in
    /// the message, matched case-insensitively on `csrf`.
    #[must_use]
    pub fn is_csrf_rejection(&self) -> bool {
        if self.kind.as_deref() == Some(ErrorKind::Csrf.as_wire()) {
            return true;
        }
        self.message
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().contains("csrf"))
    }
}

// =============================================================================
// API ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received from the server.
    #[error("communication with the server failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The session is invalid and could not be refreshed.
    #[error("session is no longer valid (status {status})")]
    Auth { status: u16, message: Option<String> },

    /// The server kept rejecting the CSRF token after a refetch.
    #[error("csrf token rejected (status {status})")]
    Csrf { status: u16, message: Option<String> },

    /// `GET /csrf` did not yield a token.
    #[error("csrf token could not be fetched")]
    CsrfFetch,

    /// Caller-supplied input failed validation before the request was sent.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Any other non-success status.
    #[error("server returned status {status}")]
    Server { status: u16, kind: ErrorKind, message: Option<String> },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("token storage failed: {0}")]
    Storage(#[from] StoreError),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Build the error for a non-success response that was not recovered.
    #[must_use]
    pub fn from_response(status: u16, body: ErrorBody) -> Self {
        if status == 401 {
            return Self::Auth { status, message: body.message };
        }
        if body.is_csrf_rejection() {
            return Self::Csrf { status, message: body.message };
        }
        let kind = body.classify(status);
        Self::Server { status, kind, message: body.message }
    }

    /// Stable machine-readable code for logs and scripts.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Auth { .. } => "E_AUTH",
            Self::Csrf { .. } => "E_CSRF",
            Self::CsrfFetch => "E_CSRF_FETCH",
            Self::Validation(_) => "E_VALIDATION",
            Self::Server { .. } => "E_SERVER",
            Self::Decode(_) => "E_DECODE",
            Self::Storage(_) => "E_STORAGE",
            Self::InvalidHeader(_) => "E_INVALID_HEADER",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    /// Message the server attached to the failure, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Auth { message, .. } | Self::Csrf { message, .. } | Self::Server { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Csrf { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// User-facing text for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        crate::notice::notice_for(self).text
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
