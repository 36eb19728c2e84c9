use std::sync::Arc;

use spotstats::{
    management::{
        CLIENT_ID_KEY, ClientConfigStore, FileStore, KeyValueStore, MemoryStore, TOKENS_KEY,
        TokenManager,
    },
    types::{PkceSession, TokenSet},
};

fn client_store() -> (ClientConfigStore, Arc<MemoryStore>, Arc<MemoryStore>) {
    let durable = Arc::new(MemoryStore::new());
    let session = Arc::new(MemoryStore::new());
    let store = ClientConfigStore::new(durable.clone(), session.clone());
    (store, durable, session)
}

#[test]
fn test_client_id_set_trims_and_ignores_blank() {
    let (store, durable, _) = client_store();

    assert!(store.set("  my-client \n", true).unwrap());
    assert_eq!(store.get().unwrap().as_deref(), Some("my-client"));
    assert_eq!(durable.get(CLIENT_ID_KEY).unwrap().as_deref(), Some("my-client"));

    assert!(!store.set("   ", true).unwrap());
    assert!(!store.set("", false).unwrap());
    assert_eq!(store.get().unwrap().as_deref(), Some("my-client"));
}

#[test]
fn test_client_id_tiers_are_exclusive() {
    let (store, durable, session) = client_store();

    store.set("durable-id", true).unwrap();
    store.set("session-id", false).unwrap();
    assert_eq!(durable.get(CLIENT_ID_KEY).unwrap(), None);
    assert_eq!(session.get(CLIENT_ID_KEY).unwrap().as_deref(), Some("session-id"));
    assert_eq!(store.get().unwrap().as_deref(), Some("session-id"));

    store.set("durable-id", true).unwrap();
    assert_eq!(session.get(CLIENT_ID_KEY).unwrap(), None);
    assert_eq!(store.get().unwrap().as_deref(), Some("durable-id"));
}

#[test]
fn test_client_id_prefers_durable_tier() {
    let (store, durable, session) = client_store();
    durable.set(CLIENT_ID_KEY, "durable-id").unwrap();
    session.set(CLIENT_ID_KEY, "session-id").unwrap();

    assert_eq!(store.get().unwrap().as_deref(), Some("durable-id"));

    store.clear().unwrap();
    assert_eq!(store.get().unwrap(), None);
}

#[test]
fn test_file_store_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested"));

    assert_eq!(store.get("key").unwrap(), None);
    // deleting a missing key is fine
    store.delete("key").unwrap();

    store.set("key", "value").unwrap();
    assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));

    store.set("key", "other").unwrap();
    assert_eq!(store.get("key").unwrap().as_deref(), Some("other"));

    store.delete("key").unwrap();
    assert_eq!(store.get("key").unwrap(), None);
}

#[test]
fn test_file_store_sees_external_changes() {
    let dir = tempfile::tempdir().unwrap();
    let first = FileStore::new(dir.path());
    let second = FileStore::new(dir.path());

    first.set(TOKENS_KEY, "one").unwrap();
    assert_eq!(second.get(TOKENS_KEY).unwrap().as_deref(), Some("one"));

    second.delete(TOKENS_KEY).unwrap();
    assert_eq!(first.get(TOKENS_KEY).unwrap(), None);
}

#[test]
fn test_token_manager_roundtrip() {
    let store = Arc::new(MemoryStore::new());
    let manager = TokenManager::new(store.clone());
    let tokens = TokenSet {
        access_token: "access".to_string(),
        refresh_token: Some("refresh".to_string()),
        token_type: "Bearer".to_string(),
        scope: "user-top-read".to_string(),
        expires_in: 3600,
        expires_at: 1_700_000_000_000,
    };

    assert_eq!(manager.load().unwrap(), None);
    manager.persist(&tokens).unwrap();
    assert_eq!(manager.load().unwrap(), Some(tokens));

    manager.clear().unwrap();
    assert_eq!(manager.load().unwrap(), None);
}

#[test]
fn test_token_manager_ignores_corrupt_blob() {
    let store = Arc::new(MemoryStore::new());
    store.set(TOKENS_KEY, "{not json").unwrap();

    let manager = TokenManager::new(store);

    assert_eq!(manager.load().unwrap(), None);
}

#[test]
fn test_token_blob_without_expiry_is_expired() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            TOKENS_KEY,
            r#"{"access_token":"old","refresh_token":"r","expires_in":3600}"#,
        )
        .unwrap();

    let tokens = TokenManager::new(store).load().unwrap().unwrap();

    assert_eq!(tokens.access_token, "old");
    assert_eq!(tokens.token_type, "Bearer");
    assert_eq!(tokens.expires_at, 0);
}

#[test]
fn test_pending_session_is_single_slot() {
    let manager = TokenManager::new(Arc::new(MemoryStore::new()));

    assert_eq!(manager.pending_session().unwrap(), None);

    manager
        .begin_session(&PkceSession {
            verifier: "first".to_string(),
        })
        .unwrap();
    manager
        .begin_session(&PkceSession {
            verifier: "second".to_string(),
        })
        .unwrap();
    assert_eq!(
        manager.pending_session().unwrap().map(|s| s.verifier).as_deref(),
        Some("second")
    );

    manager.end_session().unwrap();
    assert_eq!(manager.pending_session().unwrap(), None);
}
