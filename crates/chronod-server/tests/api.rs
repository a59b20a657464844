//! Integration tests for the HTTP surface. The router is built exactly as in
//! production, with the in-memory user store standing in for Redis.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use chronod_core::ChronodConfig;
use chronod_scheduler::ScheduleManager;
use chronod_server::app::{build_router, AppState};
use chronod_users::MemoryUserStore;

fn build_test_app() -> Router {
    let state = Arc::new(AppState::new(
        ChronodConfig::default(),
        ScheduleManager::new(),
        Box::new(MemoryUserStore::new()),
    ));
    build_router(state)
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send_json(app, "POST", uri, body).await
}

async fn delete_json(app: Router, uri: &str, body: Value) -> Response {
    send_json(app, "DELETE", uri, body).await
}

async fn send_json(app: Router, method: &str, uri: &str, body: Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Health + routing basics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok_with_metadata() {
    let app = build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert_eq!(body["pending_jobs"], 0);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn schedule_create_list_delete_flow() {
    let app = build_test_app();

    let response = post_json(
        app.clone(),
        "/schedule/alice",
        json!({
            "kind": "interval",
            "from": "2999-01-01T00:00:00Z",
            "until": "2999-12-31T00:00:00Z",
            "every_secs": 86400,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["kind"], "interval");
    assert_eq!(created["user_id"], "alice");
    // now is far before the window, so the first run is the window start
    assert_eq!(created["next_run"], "2999-01-01T00:00:00Z");

    let response = get(app.clone(), "/schedule/alice").await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let schedules = listed["schedules"].as_array().unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0]["id"].as_str().unwrap(), id);

    let response = get(app.clone(), "/health").await;
    assert_eq!(body_json(response).await["pending_jobs"], 1);

    let response = delete(app.clone(), &format!("/schedule/alice/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), "/schedule/alice").await;
    let listed = body_json(response).await;
    assert!(listed["schedules"].as_array().unwrap().is_empty());

    // second delete answers not-found
    let response = delete(app, &format!("/schedule/alice/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schedule_create_once_reports_target_instant() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/schedule/bob",
        json!({ "kind": "once", "at": "2999-11-17T14:30:00Z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["kind"], "once");
    assert_eq!(created["next_run"], "2999-11-17T14:30:00Z");
}

#[tokio::test]
async fn schedule_with_spent_target_is_rejected() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/schedule/alice",
        json!({ "kind": "once", "at": "2000-01-01T00:00:00Z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_SCHEDULE");
}

#[tokio::test]
async fn schedule_with_zero_interval_is_rejected() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/schedule/alice",
        json!({
            "kind": "interval",
            "from": "2999-01-01T00:00:00Z",
            "until": "2999-12-31T00:00:00Z",
            "every_secs": 0,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_SCHEDULE");
}

#[tokio::test]
async fn schedule_with_inverted_window_is_rejected() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/schedule/alice",
        json!({
            "kind": "interval",
            "from": "2999-12-31T00:00:00Z",
            "until": "2999-01-01T00:00:00Z",
            "every_secs": 3600,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn schedule_with_unknown_kind_is_rejected() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/schedule/alice",
        json!({ "kind": "cron", "expression": "* * * * *" }),
    )
    .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn schedules_are_scoped_per_user() {
    let app = build_test_app();

    let response = post_json(
        app.clone(),
        "/schedule/alice",
        json!({ "kind": "once", "at": "2999-06-01T00:00:00Z" }),
    )
    .await;
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = get(app.clone(), "/schedule/bob").await;
    assert!(body_json(response).await["schedules"]
        .as_array()
        .unwrap()
        .is_empty());

    // bob cannot delete through alice's id
    let response = delete(app.clone(), &format!("/schedule/bob/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/schedule/alice").await;
    assert_eq!(
        body_json(response).await["schedules"].as_array().unwrap().len(),
        1
    );
}

#[tokio::test]
async fn deleting_unknown_schedule_returns_404() {
    let app = build_test_app();
    let response = delete(app, "/schedule/alice/no-such-id").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn user_create_conflict_and_delete_flow() {
    let app = build_test_app();

    let body = json!({ "name": "alice", "secret": "s3cret" });
    let response = post_json(app.clone(), "/user", body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["name"], "alice");

    let response = post_json(app.clone(), "/user", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let response = delete_json(app.clone(), "/user", json!({ "name": "alice" })).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_json(app, "/user", json!({ "name": "alice" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_create_with_empty_fields_is_rejected() {
    let app = build_test_app();

    let response = post_json(
        app.clone(),
        "/user",
        json!({ "name": "", "secret": "s3cret" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = post_json(app, "/user", json!({ "name": "alice", "secret": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
