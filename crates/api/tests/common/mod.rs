#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use hive_api::auth::password::Argon2Hasher;
use hive_api::config::ServerConfig;
use hive_api::router::build_app_router;
use hive_api::state::AppState;
use hive_core::image_store::ImageStore;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// "hello" as a PNG data URI.
pub const PNG_PAYLOAD: &str = "data:image/png;base64,aGVsbG8=";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        upload_root: upload_root.to_path_buf(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        min_password_length: 6,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over the given pool, storing images under `upload_root`.
pub fn build_test_app(pool: SqlitePool, upload_root: &Path) -> Router {
    let config = test_config(upload_root);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images: Arc::new(ImageStore::new(upload_root)),
        hasher: Arc::new(Argon2Hasher),
    };
    build_app_router(state, &config).unwrap()
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
