// ==================================
// tests/integration/dashboard_tests.rs
// ==================================
//! Dashboard and home loaders: concurrent calls, each section settling on
//! its own.
use crate::test_utils::{canned, seed_session, setup_portal, spawn_api, Recorder};
use axum::{http::StatusCode, Router};
use cpec_common::DashboardStats;
use portal_lib::resources::{load_dashboard, load_home_summary};
use serde_json::json;

fn stats_body() -> serde_json::Value {
    json!({
        "total_users": 42,
        "total_events": 7,
        "total_programs": 3,
        "pending_requests": 2,
        "new_members_today": 1,
        "upcoming_events": 4,
        "active_programs": 3,
        "server_time": "2026-10-16T09:00:00Z"
    })
}

#[tokio::test]
async fn test_dashboard_partial_failure() {
    let recorder = Recorder::default();
    let api = Router::new()
        .route(
            "/admin/dashboard/",
            canned(&recorder, "admin/dashboard/", StatusCode::OK, stats_body()),
        )
        .route(
            "/events/",
            canned(&recorder, "events/", StatusCode::OK, json!([{"id": 1}, {"id": 2}])),
        )
        .route(
            "/programs/",
            canned(
                &recorder,
                "programs/",
                StatusCode::OK,
                json!({"results": [{"id": 3}]}),
            ),
        )
        .route(
            "/auth/users/",
            canned(&recorder, "auth/users/", StatusCode::INTERNAL_SERVER_ERROR, json!({})),
        );
    let env = setup_portal(&spawn_api(api).await);
    seed_session(&env.portal, "root", "admin", true);

    let view = load_dashboard(&env.portal.api).await;

    assert_eq!(view.events.len(), 2);
    assert_eq!(view.programs, vec![json!({"id": 3})]);
    assert!(view.users.is_empty());
    assert_eq!(view.stats.total_users, 42);
    assert_eq!(view.stats.upcoming_events, 4);
    assert_eq!(
        view.errors,
        vec!["Error loading recent users. Please try again.".to_string()]
    );
    // every call went out even though one failed
    assert_eq!(recorder.calls().len(), 4);
}

#[tokio::test]
async fn test_dashboard_everything_down() {
    let env = setup_portal(&spawn_api(Router::new()).await);

    let view = load_dashboard(&env.portal.api).await;

    assert_eq!(view.stats, DashboardStats::default());
    assert!(view.events.is_empty() && view.programs.is_empty() && view.users.is_empty());
    assert_eq!(view.errors.len(), 4);
}

#[tokio::test]
async fn test_home_summary_for_member() {
    let recorder = Recorder::default();
    let api = Router::new()
        .route(
            "/events/",
            canned(
                &recorder,
                "events/",
                StatusCode::OK,
                json!({"count": 25, "results": [{"id": 1}]}),
            ),
        )
        .route(
            "/programs/",
            canned(&recorder, "programs/", StatusCode::OK, json!([{"id": 1}, {"id": 2}])),
        )
        .route(
            "/admin/dashboard/",
            canned(&recorder, "admin/dashboard/", StatusCode::OK, stats_body()),
        );
    let env = setup_portal(&spawn_api(api).await);
    seed_session(&env.portal, "ada", "member", false);

    let summary = load_home_summary(&env.portal.api, &env.portal.oracle).await;

    assert_eq!(summary.events, 25);
    assert_eq!(summary.programs, 2);
    assert_eq!(summary.admin_stats, None);
    assert!(summary.errors.is_empty());
    assert!(recorder.calls_to("admin/dashboard/").is_empty());
}

#[tokio::test]
async fn test_home_summary_for_admin() {
    let recorder = Recorder::default();
    let api = Router::new()
        .route(
            "/events/",
            canned(&recorder, "events/", StatusCode::OK, json!({"events": []})),
        )
        .route(
            "/programs/",
            canned(&recorder, "programs/", StatusCode::BAD_GATEWAY, json!({})),
        )
        .route(
            "/admin/dashboard/",
            canned(&recorder, "admin/dashboard/", StatusCode::OK, stats_body()),
        );
    let env = setup_portal(&spawn_api(api).await);
    seed_session(&env.portal, "root", "admin", true);

    let summary = load_home_summary(&env.portal.api, &env.portal.oracle).await;

    assert_eq!(summary.events, 0);
    assert_eq!(summary.programs, 0);
    assert_eq!(
        summary.errors,
        vec!["Error loading programs. Please try again.".to_string()]
    );
    assert_eq!(summary.admin_stats.map(|s| s.total_programs), Some(3));
}

#[tokio::test]
async fn test_dashboard_null_counter_keeps_stats() {
    let recorder = Recorder::default();
    let api = Router::new()
        .route(
            "/admin/dashboard/",
            canned(
                &recorder,
                "admin/dashboard/",
                StatusCode::OK,
                json!({"total_users": 3, "pending_requests": null}),
            ),
        )
        .route("/events/", canned(&recorder, "events/", StatusCode::OK, json!([])))
        .route("/programs/", canned(&recorder, "programs/", StatusCode::OK, json!([])))
        .route("/auth/users/", canned(&recorder, "auth/users/", StatusCode::OK, json!([])));
    let env = setup_portal(&spawn_api(api).await);
    seed_session(&env.portal, "root", "admin", true);

    let view = load_dashboard(&env.portal.api).await;

    assert!(view.errors.is_empty());
    assert_eq!(view.stats.total_users, 3);
    assert_eq!(view.stats.pending_requests, 0);
}
