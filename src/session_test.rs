use super::*;
use crate::store::MemoryStore;

/// Store whose every write fails.
struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(disk_full())
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(disk_full())
    }
}

fn disk_full() -> StoreError {
    StoreError::Io { path: "session.json".into(), source: std::io::Error::other("disk full") }
}

fn session_with(store: &Arc<MemoryStore>) -> Session {
    Session::restore(store.clone())
}

// =============================================================================
// restore
// =============================================================================

#[test]
fn restore_without_token_starts_loading() {
    let session = session_with(&Arc::new(MemoryStore::new()));
    assert_eq!(session.snapshot(), SessionSnapshot::default());
    assert!(session.is_loading());
    assert!(!session.is_authenticated());
}

#[test]
fn restore_loads_persisted_token_but_not_authenticated() {
    let session = session_with(&Arc::new(MemoryStore::with_access_token("abc")));
    assert_eq!(session.access_token().as_deref(), Some("abc"));
    assert!(!session.is_authenticated());
    assert!(session.is_loading());
}

#[test]
fn restore_ignores_empty_token() {
    let session = session_with(&Arc::new(MemoryStore::with_access_token("")));
    assert_eq!(session.access_token(), None);
}

// =============================================================================
// set_auth / clear_auth
// =============================================================================

#[test]
fn set_auth_persists_and_authenticates() {
    let store = Arc::new(MemoryStore::new());
    let session = session_with(&store);

    session.set_auth("abc").unwrap();

    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    let snap = session.snapshot();
    assert_eq!(snap.access_token.as_deref(), Some("abc"));
    assert!(snap.is_authenticated);
    assert!(!snap.is_loading);
}

#[test]
fn clear_auth_removes_token_everywhere() {
    let store = Arc::new(MemoryStore::with_access_token("abc"));
    let session = session_with(&store);
    session.mark_verified(true);

    session.clear_auth().unwrap();

    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
    let snap = session.snapshot();
    assert_eq!(snap.access_token, None);
    assert!(!snap.is_authenticated);
    assert!(!snap.is_loading);
}

#[test]
fn clear_auth_without_token_is_ok() {
    let session = session_with(&Arc::new(MemoryStore::new()));
    assert!(session.clear_auth().is_ok());
    assert!(!session.is_authenticated());
}

// =============================================================================
// verification
// =============================================================================

#[test]
fn mark_verified_settles_loading() {
    let session = session_with(&Arc::new(MemoryStore::with_access_token("abc")));
    session.mark_verified(true);
    assert!(session.is_authenticated());
    assert!(!session.is_loading());

    session.mark_verified(false);
    assert!(!session.is_authenticated());
    assert_eq!(session.access_token().as_deref(), Some("abc"));
}

#[test]
fn finish_loading_keeps_auth_flag() {
    let session = session_with(&Arc::new(MemoryStore::new()));
    session.finish_loading();
    assert!(!session.is_loading());
    assert!(!session.is_authenticated());
}

// =============================================================================
// apply_event
// =============================================================================

#[test]
fn login_event_requires_token() {
    let session = session_with(&Arc::new(MemoryStore::new()));
    session.apply_event(&SessionEvent::LoginSuccess);
    assert!(!session.is_authenticated());
    assert!(!session.is_loading());

    let session = session_with(&Arc::new(MemoryStore::with_access_token("abc")));
    session.apply_event(&SessionEvent::LoginSuccess);
    assert!(session.is_authenticated());
}

#[test]
fn logout_and_unauthorized_events_deauthenticate() {
    let session = session_with(&Arc::new(MemoryStore::with_access_token("abc")));
    session.mark_verified(true);
    session.apply_event(&SessionEvent::LogoutSuccess);
    assert!(!session.is_authenticated());

    session.mark_verified(true);
    session.apply_event(&SessionEvent::Unauthorized { reason: "expired".into() });
    assert!(!session.is_authenticated());
    assert!(!session.is_loading());
}

#[test]
fn error_event_leaves_state_alone() {
    let session = session_with(&Arc::new(MemoryStore::with_access_token("abc")));
    session.mark_verified(true);
    let before = session.snapshot();
    session.apply_event(&SessionEvent::Error { message: "offline".into() });
    assert_eq!(session.snapshot(), before);
}

// =============================================================================
// store failures
// =============================================================================

#[test]
fn set_auth_store_failure_keeps_token_in_memory() {
    let session = Session::restore(Arc::new(FailingStore));

    assert!(matches!(session.set_auth("abc"), Err(StoreError::Io { .. })));
    assert!(session.is_authenticated());
    assert!(!session.is_loading());
    assert_eq!(session.access_token().as_deref(), Some("abc"));
}

#[test]
fn clear_auth_store_failure_still_deauthenticates() {
    let session = Session::restore(Arc::new(FailingStore));
    let _ = session.set_auth("abc");

    assert!(session.clear_auth().is_err());
    assert!(!session.is_authenticated());
    assert_eq!(session.access_token(), None);
}
