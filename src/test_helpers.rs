//! In-process mock backend plumbing shared by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::http::HeaderMap;
use axum::routing::{MethodRouter, get};
use serde_json::{Value, json};
use tokio::sync::broadcast;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::events::SessionEvent;
use crate::store::MemoryStore;

/// Serve `app` on an ephemeral loopback port and return its base URL.
pub(crate) async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port that nothing listens on.
pub(crate) async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub(crate) fn client_for(base_url: &str, store: Arc<MemoryStore>) -> ApiClient {
    let config = ClientConfig::new(base_url).unwrap();
    ApiClient::new(&config, store).unwrap()
}

pub(crate) fn drain_events(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Shared request counter for mock handlers.
#[derive(Clone, Default)]
pub(crate) struct Hits(Arc<AtomicUsize>);

impl Hits {
    /// Record a hit and return the new total.
    pub(crate) fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers.get("authorization")?.to_str().ok()?.strip_prefix("Bearer ")
}

pub(crate) fn csrf_header(headers: &HeaderMap) -> Option<&str> {
    headers.get("x-csrf-token")?.to_str().ok()
}

/// `GET /csrf` handing out `csrf-1`, `csrf-2`, ... per call.
pub(crate) fn csrf_route(hits: Hits) -> MethodRouter {
    get(move || {
        let n = hits.bump();
        async move { ([("x-csrf-token", format!("csrf-{n}"))], Json(json!({}))) }
    })
}

pub(crate) fn error_body(message: &str) -> Json<Value> {
    Json(json!({ "message": message }))
}
