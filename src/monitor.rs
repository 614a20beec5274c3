//! Background session verification.
//!
//! DESIGN
//! ======
//! A single tokio task owns the re-verification schedule. It checks the
//! token at startup (the first interval tick fires immediately), again on
//! every tick, and recomputes session flags whenever a session signal is
//! published. Missed ticks are skipped rather than bunched.
//!
//! Dropping the [`SessionMonitor`] aborts the task.

use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::ApiClient;
use crate::session::SessionSnapshot;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub struct SessionMonitor {
    handle: JoinHandle<()>,
}

impl SessionMonitor {
    /// Start verifying `client`'s session every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(client: ApiClient, interval: Duration) -> Self {
        let mut events = client.events().subscribe();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(MIN_INTERVAL));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        check_auth(&client).await;
                    }
                    event = events.recv() => match event {
                        Ok(event) => client.session().apply_event(&event),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "session monitor lagged behind signals");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });
        Self { handle }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SessionMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Settle the session flags for the current token.
///
/// No token means unauthenticated without a round trip. Otherwise
/// `GET /verify-token` decides; a failure that did not end the session
/// (server down, 5xx) leaves the authenticated flag as it was.
pub async fn check_auth(client: &ApiClient) -> SessionSnapshot {
    let session = client.session();
    if session.access_token().is_none() {
        session.mark_verified(false);
        return session.snapshot();
    }

    match client.auth().verify().await {
        Ok(_) => session.mark_verified(true),
        Err(e) => {
            tracing::debug!(error = %e, code = e.error_code(), "token verification failed");
            session.finish_loading();
        }
    }
    session.snapshot()
}

#[cfg(test)]
#[path = "monitor_test.rs"]
mod tests;
