//! Process-wide session signals.
//!
//! DESIGN
//! ======
//! Signals are published on a `tokio::sync::broadcast` channel owned by the
//! [`crate::ApiClient`]. Only this crate publishes; views, guards and the
//! session monitor subscribe. A slow subscriber that falls behind sees
//! `RecvError::Lagged` and skips ahead rather than blocking the publisher.

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Generic text carried by [`SessionEvent::Error`] when no reply arrived.
pub const COMMUNICATION_FAILED: &str = "Communication with the server failed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoginSuccess,
    LogoutSuccess,
    /// Session is invalid and could not be refreshed.
    Unauthorized { reason: String },
    /// Transport-level failure to surface as a transient notice.
    Error { message: String },
}

impl SessionEvent {
    /// Wire-style signal name (`login-success`, `unauthorized`, ...).
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "login-success",
            Self::LogoutSuccess => "logout-success",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Error { .. } => "error",
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Publish to every current subscriber. Having none is fine.
    pub(crate) fn publish(&self, event: SessionEvent) {
        tracing::debug!(signal = event.name(), "session signal");
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
