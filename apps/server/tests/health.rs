mod common;

use axum::http::StatusCode;
use common::{get, test_app, test_config};
use rosterhub_server::{api::app_router, build_state};
use tempfile::tempdir;

#[tokio::test]
async fn healthz_works() {
    let app = test_app();

    let response = get(&app.router, "/api/v1/healthz").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn build_state_creates_database() {
    let tmp = tempdir().unwrap();
    let mut config = test_config();
    config.db_path = tmp
        .path()
        .join("nested")
        .join("app.db")
        .to_string_lossy()
        .into_owned();

    let state = build_state(&config).await.unwrap();
    assert!(tmp.path().join("nested").join("app.db").exists());

    let app = app_router(state, &config);
    let response = get(&app, "/api/v1/readyz").await;
    assert_eq!(response.status, StatusCode::OK);
}
