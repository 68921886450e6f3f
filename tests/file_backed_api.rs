//! End-to-end tests against the file backend.
//!
//! Each test gets its own temporary directory, so no cleanup is needed.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use killswitch::api::{create_router, mount_docs, AppState};
use killswitch::config::Config;
use killswitch::store::{open_store, FileStore, StatusStore, StoreBackend};
use killswitch::KillSwitch;

const KEY: &str = "s3cret";

fn router_for(path: &Path) -> Router {
    let store = Arc::new(FileStore::new(path));
    create_router(AppState::new(KillSwitch::new(store), KEY))
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn fresh_deployment_reports_false_without_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appStatus.json");
    let app = router_for(&path);

    let (status, body) = send(&app, Method::GET, "/api/check-app-status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": false }));
    assert!(!path.exists());
}

#[tokio::test]
async fn toggle_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appStatus.json");

    let app = router_for(&path);
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/toggle-app-status?apiKey={}", KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newStatus"], true);

    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, json!({ "renderApp": true }));

    // A new router over the same file sees the persisted value.
    let restarted = router_for(&path);
    let (_, body) = send(&restarted, Method::GET, "/api/check-app-status").await;
    assert_eq!(body, json!({ "status": true }));
}

#[tokio::test]
async fn rejected_toggle_does_not_create_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appStatus.json");
    let app = router_for(&path);

    let (status, body) = send(&app, Method::POST, "/api/toggle-app-status?apiKey=wrong").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Invalid API Key" }));
    assert!(!path.exists());
}

#[tokio::test]
async fn corrupt_file_yields_500_and_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appStatus.json");
    std::fs::write(&path, "{ broken").unwrap();
    let app = router_for(&path);

    for _ in 0..2 {
        let (status, body) = send(&app, Method::GET, "/api/check-app-status").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error reading app status");
    }

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/toggle-app-status?apiKey={}", KEY),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
}

#[tokio::test]
async fn open_store_probes_configured_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appStatus.json");

    let config = Config::from_vars(vec![
        ("API_KEY".to_string(), KEY.to_string()),
        ("STATUS_FILE".to_string(), path.display().to_string()),
    ])
    .unwrap();

    let store = open_store(&config).await.unwrap();
    assert_eq!(store.backend(), StoreBackend::File);
}

#[tokio::test]
async fn open_store_fails_fast_on_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appStatus.json");
    std::fs::write(&path, "garbage").unwrap();

    let config = Config::from_vars(vec![
        ("API_KEY".to_string(), KEY.to_string()),
        ("STATUS_FILE".to_string(), path.display().to_string()),
    ])
    .unwrap();

    assert!(open_store(&config).await.is_err());
}

#[tokio::test]
async fn memory_backend_honours_initial_status() {
    let config = Config::from_vars(vec![
        ("API_KEY".to_string(), KEY.to_string()),
        ("STORE_BACKEND".to_string(), "memory".to_string()),
        ("INITIAL_STATUS".to_string(), "true".to_string()),
    ])
    .unwrap();

    let store = open_store(&config).await.unwrap();
    assert_eq!(store.backend(), StoreBackend::Memory);
    assert!(store.read().await.unwrap());
}

#[tokio::test]
async fn openapi_json_is_served_with_docs() {
    let dir = tempfile::tempdir().unwrap();
    let app = mount_docs(
        router_for(&dir.path().join("appStatus.json")),
        "https://switch.example.com",
    );

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["servers"][0]["url"], "https://switch.example.com");
    assert!(body["paths"]["/api/toggle-app-status"]["post"].is_object());
}
