// ==================================
// tests/integration/logout_flow_tests.rs
// ==================================
//! Logout always ends signed out on the home page, whatever the server says.
use crate::test_utils::{canned, seed_session, setup_portal, spawn_api, unreachable_base_url, Recorder};
use axum::{http::StatusCode, Router};
use portal_lib::auth::AuthService;
use portal_lib::routes::Route;
use portal_lib::storage::{KeyValueStore, Scope};
use serde_json::json;

fn logout_api(recorder: &Recorder, status: StatusCode) -> Router {
    Router::new().route(
        "/auth/logout/",
        canned(recorder, "auth/logout/", status, json!({})),
    )
}

#[tokio::test]
async fn test_logout_invalidates_refresh_token() {
    let recorder = Recorder::default();
    let env = setup_portal(&spawn_api(logout_api(&recorder, StatusCode::OK)).await);
    seed_session(&env.portal, "ada", "member", true);
    env.store.set(Scope::Durable, "theme", "dark").unwrap();

    env.portal.auth.logout().await;

    let calls = recorder.calls_to("auth/logout/");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body, json!({"refresh": "ada-refresh"}));
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer ada-access"));

    assert!(!env.portal.oracle.is_authenticated());
    // every key goes, not just the session ones
    assert_eq!(env.store.len(Scope::Durable), 0);
    assert_eq!(env.navigator.reloads(), vec![Route::Home]);
}

#[tokio::test]
async fn test_logout_server_error_still_signs_out() {
    let recorder = Recorder::default();
    let env = setup_portal(
        &spawn_api(logout_api(&recorder, StatusCode::INTERNAL_SERVER_ERROR)).await,
    );
    seed_session(&env.portal, "ada", "member", false);

    env.portal.auth.logout().await;

    assert_eq!(recorder.calls_to("auth/logout/").len(), 1);
    assert!(!env.portal.oracle.is_authenticated());
    assert_eq!(env.store.len(Scope::Ephemeral), 0);
    assert_eq!(env.navigator.reloads(), vec![Route::Home]);
}

#[tokio::test]
async fn test_logout_offline_still_signs_out() {
    let env = setup_portal(&unreachable_base_url().await);
    seed_session(&env.portal, "ada", "admin", true);

    env.portal.auth.logout().await;

    assert!(!env.portal.oracle.is_authenticated());
    assert!(!env.portal.oracle.is_admin());
    assert_eq!(env.navigator.reloads(), vec![Route::Home]);
}

#[tokio::test]
async fn test_logout_without_session_skips_request() {
    let recorder = Recorder::default();
    let env = setup_portal(&spawn_api(logout_api(&recorder, StatusCode::OK)).await);

    env.portal.auth.logout().await;

    assert!(recorder.calls().is_empty());
    assert_eq!(env.navigator.reloads(), vec![Route::Home]);
}
