//! User-facing text for failures and session signals.
//!
//! The backend answers with a small, fixed set of lowercase messages. Those
//! are mapped to friendlier text plus an [`NoticeAction`] telling the caller
//! what else to do. Anything unknown is shown as the server sent it.

use crate::error::{ApiError, ErrorKind};
use crate::events::{COMMUNICATION_FAILED, SessionEvent};

const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const CSRF_REJECTED: &str = "Your session is no longer valid. Please try again.";
const UNEXPECTED_RESPONSE: &str = "The server sent an unexpected response.";
const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAction {
    None,
    /// Fetch a new CSRF token before the next mutation.
    RefreshCsrf,
    /// Drop local credentials and go back to the entry route.
    ResetSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub action: NoticeAction,
}

impl Notice {
    fn new(text: &str, action: NoticeAction) -> Self {
        Self { text: text.to_owned(), action }
    }
}

/// Known server messages, matched case-insensitively.
const KNOWN_MESSAGES: &[(&str, &str, NoticeAction)] = &[
    ("invalid csrf token", CSRF_REJECTED, NoticeAction::RefreshCsrf),
    ("invalid email or password", "Email address or password is incorrect.", NoticeAction::None),
    ("invalid or expired jwt", SESSION_EXPIRED, NoticeAction::ResetSession),
    (
        "missing or malformed jwt",
        "Your credentials are invalid. Please log in again.",
        NoticeAction::ResetSession,
    ),
    ("email already exists", "This email address is already registered.", NoticeAction::None),
    ("failed to create user", "Sign-up failed.", NoticeAction::None),
    ("failed to generate token", "Login failed. Please try again.", NoticeAction::None),
    ("record not found", "Email address or password is incorrect.", NoticeAction::None),
];

fn lookup(message: &str) -> Option<Notice> {
    let message = message.trim();
    KNOWN_MESSAGES
        .iter()
        .find(|(known, _, _)| known.eq_ignore_ascii_case(message))
        .map(|(_, text, action)| Notice::new(text, *action))
}

/// Notice for a raw server message.
#[must_use]
pub fn notice_for_message(message: &str) -> Notice {
    if let Some(notice) = lookup(message) {
        return notice;
    }
    if message.trim().is_empty() {
        return Notice::new(GENERIC_FAILURE, NoticeAction::None);
    }
    Notice::new(message, NoticeAction::None)
}

/// Notice for a failed call.
#[must_use]
pub fn notice_for(err: &ApiError) -> Notice {
    if let Some(notice) = err.server_message().and_then(lookup) {
        return notice;
    }
    let server_text = err.server_message().filter(|m| !m.trim().is_empty());

    match err {
        ApiError::Network(_) | ApiError::CsrfFetch => Notice::new(COMMUNICATION_FAILED, NoticeAction::None),
        ApiError::Validation(reason) => Notice::new(reason, NoticeAction::None),
        ApiError::Auth { .. } => Notice::new(server_text.unwrap_or(SESSION_EXPIRED), NoticeAction::ResetSession),
        ApiError::Csrf { .. } => Notice::new(server_text.unwrap_or(CSRF_REJECTED), NoticeAction::RefreshCsrf),
        ApiError::Server { kind, .. } => {
            let fallback = match kind {
                ErrorKind::NotFound => "The requested item was not found.",
                ErrorKind::Validation => "The request was rejected as invalid.",
                _ => GENERIC_FAILURE,
            };
            Notice::new(server_text.unwrap_or(fallback), NoticeAction::None)
        }
        ApiError::Decode(_) => Notice::new(UNEXPECTED_RESPONSE, NoticeAction::None),
        ApiError::Storage(_) | ApiError::InvalidHeader(_) | ApiError::HttpClientBuild(_) => {
            Notice::new(GENERIC_FAILURE, NoticeAction::None)
        }
    }
}

/// Notice worth showing for a session signal, if any.
#[must_use]
pub fn notice_for_event(event: &SessionEvent) -> Option<Notice> {
    match event {
        SessionEvent::LoginSuccess | SessionEvent::LogoutSuccess => None,
        SessionEvent::Unauthorized { reason } => Some(
            lookup(reason)
                .filter(|n| n.action == NoticeAction::ResetSession)
                .unwrap_or_else(|| Notice::new(SESSION_EXPIRED, NoticeAction::ResetSession)),
        ),
        SessionEvent::Error { message } => Some(notice_for_message(message)),
    }
}

#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;
