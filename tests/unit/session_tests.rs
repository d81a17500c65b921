// ==========================
// tests/unit/session_tests.rs
// ==========================
//! Session lifecycle over the flat-file store
use cpec_common::{AuthTokens, UserRecord};
use portal_lib::auth::{SessionOracle, TokenStore};
use portal_lib::storage::{FlatFileStore, KeyValueStore, Scope};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn sample_tokens() -> AuthTokens {
    AuthTokens {
        access: "access-1".into(),
        refresh: "refresh-1".into(),
        user: serde_json::from_value::<UserRecord>(json!({
            "id": 9,
            "username": "ada",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "is_staff": true,
            "is_verified": true
        }))
        .unwrap(),
    }
}

#[test]
fn test_empty_store_is_signed_out() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FlatFileStore::open(temp_dir.path()).unwrap());
    let oracle = SessionOracle::new(TokenStore::new(store));
    assert!(!oracle.is_authenticated());
}

#[test]
fn test_remembered_session_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = Arc::new(FlatFileStore::open(temp_dir.path()).unwrap());
        TokenStore::new(store).save(&sample_tokens(), true).unwrap();
    }

    let store = Arc::new(FlatFileStore::open(temp_dir.path()).unwrap());
    let oracle = SessionOracle::new(TokenStore::new(store));
    assert!(oracle.is_authenticated());
    assert!(oracle.is_admin());
    assert_eq!(oracle.display_name(), "Ada Lovelace");

    // fields the client does not model are kept
    let user = oracle.get_user().unwrap();
    assert_eq!(user.extra.get("is_verified"), Some(&json!(true)));
}

#[test]
fn test_unremembered_session_ends_with_process() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = Arc::new(FlatFileStore::open(temp_dir.path()).unwrap());
        let tokens = TokenStore::new(store);
        tokens.save(&sample_tokens(), false).unwrap();
        assert!(SessionOracle::new(tokens).is_authenticated());
    }

    let store = Arc::new(FlatFileStore::open(temp_dir.path()).unwrap());
    assert!(!SessionOracle::new(TokenStore::new(store)).is_authenticated());
}

#[test]
fn test_clear_empties_whichever_scope_was_used() {
    for durable in [true, false] {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FlatFileStore::open(temp_dir.path()).unwrap());
        store.set(Scope::Durable, "ui.sidebar", "collapsed").unwrap();

        let tokens = TokenStore::new(store.clone());
        tokens.save(&sample_tokens(), durable).unwrap();
        tokens.clear().unwrap();

        assert!(tokens.read().is_none());
        assert_eq!(tokens.refresh_token(), None);
        assert_eq!(store.get(Scope::Durable, "ui.sidebar"), None);
    }
}
