use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Fresh per-test directory under the system temp dir.
fn scratch_dir() -> PathBuf {
    let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("smart-pantry-store-{}-{n}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

// =============================================================================
// FileStore
// =============================================================================

#[test]
fn file_store_missing_file_reads_none() {
    let store = FileStore::new(scratch_dir().join("session.json"));
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[test]
fn file_store_set_then_get() {
    let dir = scratch_dir();
    let store = FileStore::new(dir.join("nested").join("session.json"));
    store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_store_persists_across_instances() {
    let dir = scratch_dir();
    let path = dir.join("session.json");
    FileStore::new(&path).set(ACCESS_TOKEN_KEY, "durable").unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("durable"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_store_remove_keeps_other_keys() {
    let dir = scratch_dir();
    let store = FileStore::new(dir.join("session.json"));
    store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
    store.set("theme", "dark").unwrap();

    store.remove(ACCESS_TOKEN_KEY).unwrap();
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_store_remove_missing_is_ok() {
    let store = FileStore::new(scratch_dir().join("session.json"));
    assert!(store.remove(ACCESS_TOKEN_KEY).is_ok());
}

#[test]
fn file_store_corrupt_file_errors() {
    let dir = scratch_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("session.json");
    std::fs::write(&path, "not json").unwrap();

    let err = FileStore::new(&path).get(ACCESS_TOKEN_KEY).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_store_empty_file_reads_none() {
    let dir = scratch_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("session.json");
    std::fs::write(&path, "\n").unwrap();

    assert_eq!(FileStore::new(&path).get(ACCESS_TOKEN_KEY).unwrap(), None);
    let _ = std::fs::remove_dir_all(dir);
}

#[cfg(unix)]
#[test]
fn file_store_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = scratch_dir();
    let path = dir.join("session.json");
    FileStore::new(&path).set(ACCESS_TOKEN_KEY, "abc").unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    let _ = std::fs::remove_dir_all(dir);
}

// =============================================================================
// MemoryStore
// =============================================================================

#[test]
fn memory_store_round_trip() {
    let store = MemoryStore::new();
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
    store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    store.remove(ACCESS_TOKEN_KEY).unwrap();
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[test]
fn memory_store_seeded_token() {
    let store = MemoryStore::with_access_token("seed");
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("seed"));
}
