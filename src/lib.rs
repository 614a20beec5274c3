//! Smart Pantry API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The Smart Pantry backend serves food items, pantry items and recipe
//! suggestions behind cookie + bearer authentication and CSRF protection.
//! This crate is the client side of that contract: a single [`ApiClient`]
//! that every feature API goes through, a [`Session`] owned by the auth
//! layer, and an [`EventBus`] that publishes session signals to whoever is
//! rendering them (the `smart-pantry` CLI in this repository).
//!
//! DESIGN
//! ======
//! - Request augmentation attaches the cached CSRF token and the bearer
//!   credential to every outbound call.
//! - Response inspection runs the refresh protocol: one silent token refresh
//!   per request on 401, one CSRF refetch per request on a CSRF rejection.
//! - Session flags are only written by this crate; consumers read snapshots
//!   and subscribe to [`SessionEvent`]s.

pub mod api;
pub mod client;
pub mod config;
pub mod csrf;
pub mod error;
pub mod events;
pub mod guard;
pub mod models;
pub mod monitor;
pub mod notice;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use events::{EventBus, SessionEvent};
pub use guard::{GuardDecision, Route};
pub use monitor::SessionMonitor;
pub use notice::{Notice, NoticeAction};
pub use session::{Session, SessionSnapshot};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
