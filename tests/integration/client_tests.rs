// ==================================
// tests/integration/client_tests.rs
// ==================================
//! Resource client: bearer header, error classification, list
//! normalization, multipart uploads.
use std::collections::HashMap;

use crate::test_utils::{canned, seed_session, setup_portal, spawn_api, unreachable_base_url, Recorder};
use axum::{
    extract::{Multipart, Query},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use cpec_common::RecordId;
use portal_lib::error::{ApiError, Operation};
use portal_lib::http::MultipartForm;
use serde_json::{json, Value};

#[tokio::test]
async fn test_bearer_token_attached_when_signed_in() {
    let recorder = Recorder::default();
    let api = Router::new().route(
        "/events/",
        canned(&recorder, "events/", StatusCode::OK, json!([])),
    );
    let env = setup_portal(&spawn_api(api).await);

    env.portal.events.list().await.unwrap();
    seed_session(&env.portal, "ada", "member", false);
    env.portal.events.list().await.unwrap();

    let calls = recorder.calls_to("events/");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].authorization, None);
    assert_eq!(calls[1].authorization.as_deref(), Some("Bearer ada-access"));
    assert!(calls.iter().all(|c| c.diagnostic.as_deref() == Some("true")));
}

#[tokio::test]
async fn test_list_wrappers_are_normalized() {
    let recorder = Recorder::default();
    let api = Router::new()
        .route(
            "/events/",
            canned(
                &recorder,
                "events/",
                StatusCode::OK,
                json!({"count": 2, "results": [{"id": 1}, {"id": 2}]}),
            ),
        )
        .route(
            "/programs/",
            canned(
                &recorder,
                "programs/",
                StatusCode::OK,
                json!({"programs": [{"id": 9}]}),
            ),
        )
        .route(
            "/auth/users/",
            canned(&recorder, "auth/users/", StatusCode::OK, json!({"message": "nothing here"})),
        );
    let env = setup_portal(&spawn_api(api).await);

    let events = env.portal.events.list().await.unwrap();
    assert_eq!(events, vec![json!({"id": 1}), json!({"id": 2})]);

    let programs = env.portal.programs.list().await.unwrap();
    assert_eq!(programs, vec![json!({"id": 9})]);

    // unrecognized shape degrades to an empty list
    let users = env.portal.users.list().await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_recent_sends_limit() {
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let api = Router::new().route(
        "/events/",
        get({
            let seen = seen.clone();
            move |Query(params): Query<HashMap<String, String>>| {
                let seen = seen.clone();
                async move {
                    seen.lock().push(params);
                    Json(json!({"data": [{"id": 1}]}))
                }
            }
        }),
    );
    let env = setup_portal(&spawn_api(api).await);

    let events = env.portal.events.recent(5).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(seen.lock()[0].get("limit").map(String::as_str), Some("5"));
}

#[tokio::test]
async fn test_status_classification() {
    let recorder = Recorder::default();
    let api = Router::new()
        .route(
            "/events/1/",
            canned(&recorder, "events/1/", StatusCode::FORBIDDEN, json!({"detail": "Admins only"})),
        )
        .route(
            "/events/2/",
            canned(&recorder, "events/2/", StatusCode::INTERNAL_SERVER_ERROR, json!({})),
        )
        .route(
            "/events/3/update/",
            canned(
                &recorder,
                "events/3/update/",
                StatusCode::BAD_REQUEST,
                json!({"title": ["This field is required."]}),
            ),
        );
    let env = setup_portal(&spawn_api(api).await);

    let err = env.portal.events.get(&RecordId::from(1)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Forbidden {
            detail: Some("Admins only".to_string())
        }
    );
    assert_eq!(err.error_code(), "API_403");

    let err = env.portal.events.get(&RecordId::from(2)).await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(
        err.user_message(Operation::Action("loading event")),
        "Error loading event. Please try again."
    );

    let err = env
        .portal
        .events
        .update(&RecordId::from(3), &json!({"title": ""}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(ref fields) if fields.first("title").is_some()));
    assert_eq!(
        err.user_message(Operation::Action("updating event")),
        "Error updating event. title: This field is required."
    );
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let env = setup_portal(&unreachable_base_url().await);

    let err = env.portal.programs.list().await.unwrap_err();
    assert!(matches!(err, ApiError::NetworkUnreachable(_)));
    assert_eq!(err.status_code(), None);
    assert_eq!(err.error_code(), "NET_001");
}

#[tokio::test]
async fn test_empty_body_parses_as_null() {
    let api = Router::new().route(
        "/events/{id}/attend/",
        axum::routing::post(|| async { StatusCode::NO_CONTENT }),
    );
    let env = setup_portal(&spawn_api(api).await);

    let body = env.portal.events.attend(&RecordId::from(4)).await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_event_created_as_multipart() {
    let received = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let api = Router::new().route(
        "/events/create/",
        axum::routing::post({
            let received = received.clone();
            move |headers: HeaderMap, mut multipart: Multipart| {
                let received = received.clone();
                async move {
                    assert!(headers.contains_key("authorization"));
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let file_name = field.file_name().map(str::to_string);
                        let bytes = field.bytes().await.unwrap();
                        received.lock().push((name, file_name, bytes.to_vec()));
                    }
                    (StatusCode::CREATED, Json(json!({"id": 11, "title": "Open day"})))
                }
            }
        }),
    );
    let env = setup_portal(&spawn_api(api).await);
    seed_session(&env.portal, "root", "admin", true);

    let form = MultipartForm::new()
        .text("title", "Open day")
        .text("capacity", 40)
        .file("image", "poster.png", "image/png", vec![0x89, b'P', b'N', b'G']);
    let created = env.portal.events.create(form).await.unwrap();
    assert_eq!(created["id"], 11);

    let received = received.lock();
    assert_eq!(received.len(), 3);
    assert_eq!(received[0], ("title".to_string(), None, b"Open day".to_vec()));
    assert_eq!(received[1].2, b"40".to_vec());
    assert_eq!(received[2].1.as_deref(), Some("poster.png"));
    assert_eq!(received[2].2, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_role_update_body() {
    let recorder = Recorder::default();
    let api = Router::new().route(
        "/auth/users/{id}/",
        canned(&recorder, "auth/users/id/", StatusCode::OK, json!({"id": 5, "role": "admin"})),
    );
    let env = setup_portal(&spawn_api(api).await);
    seed_session(&env.portal, "root", "admin", true);

    let updated = env
        .portal
        .users
        .set_role(&RecordId::from(5), "admin")
        .await
        .unwrap();
    assert_eq!(updated["role"], "admin");
    assert_eq!(recorder.calls_to("auth/users/id/")[0].body, json!({"role": "admin"}));
}
