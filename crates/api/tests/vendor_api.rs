//! Integration tests for the `/api/v1/vendors` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, patch_json, post_json};
use serde_json::json;
use sqlx::SqlitePool;

async fn register(app: axum::Router, name: &str, email: &str, password: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/vendors",
        json!({ "name": name, "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_then_duplicate_email_is_400(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());

    let id = register(app.clone(), "Ana", "ana@x.com", "secret1").await;
    assert!(id > 0);

    let response = post_json(
        app,
        "/api/v1/vendors",
        json!({ "name": "Ana Again", "email": "ana@x.com", "password": "secret2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DUPLICATE_EMAIL");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_bad_input(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());

    for body in [
        json!({ "name": "Ana", "email": "not-an-email", "password": "secret1" }),
        json!({ "name": "   ", "email": "ana@x.com", "password": "secret1" }),
        json!({ "name": "Ana", "email": "ana@x.com", "password": "123" }),
    ] {
        let response = post_json(app.clone(), "/api/v1/vendors", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let json = body_json(get(app, "/api/v1/vendors").await).await;
    assert_eq!(json["data"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stored_password_is_hashed_and_never_returned(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool.clone(), tmp.path());
    let id = register(app.clone(), "Ana", "ana@x.com", "secret1").await;

    let (hash,): (String,) = sqlx::query_as("SELECT password_hash FROM vendedores WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(hash.starts_with("$argon2id$"));

    let json = body_json(get(app.clone(), &format!("/api/v1/vendors/{id}")).await).await;
    assert_eq!(
        json["data"],
        json!({ "id": id, "name": "Ana", "email": "ana@x.com", "bio": null })
    );

    let json = body_json(get(app, "/api/v1/vendors").await).await;
    assert!(json["data"][0].get("password_hash").is_none());
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_correct_password_returns_vendor(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());
    let id = register(app.clone(), "Ana", "ana@x.com", "secret1").await;

    let response = post_json(
        app,
        "/api/v1/vendors/login",
        json!({ "email": "ana@x.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_failures_are_indistinguishable(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());
    register(app.clone(), "Ana", "ana@x.com", "secret1").await;

    let wrong_password = post_json(
        app.clone(),
        "/api/v1/vendors/login",
        json!({ "email": "ana@x.com", "password": "wrong" }),
    )
    .await;
    let unknown_email = post_json(
        app,
        "/api/v1/vendors/login",
        json!({ "email": "nobody@x.com", "password": "secret1" }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email.status(), StatusCode::BAD_REQUEST);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
    assert_eq!(a["code"], "INVALID_CREDENTIALS");
    assert!(a.get("data").is_none());
}

// ---------------------------------------------------------------------------
// Lookup, update, delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_vendor_is_404(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());

    let response = get(app.clone(), "/api/v1/vendors/77").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Vendor with id 77 not found");

    let response = patch_json(app.clone(), "/api/v1/vendors/77", json!({ "bio": "x" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(app, "/api/v1/vendors/77").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_changes_only_supplied_fields(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());
    let id = register(app.clone(), "Ana", "ana@x.com", "secret1").await;

    let response = patch_json(
        app.clone(),
        &format!("/api/v1/vendors/{id}"),
        json!({ "bio": "Empanadas every Friday" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"],
        json!({ "id": id, "name": "Ana", "email": "ana@x.com", "bio": "Empanadas every Friday" })
    );

    // Login still works: the password hash was not touched.
    let response = post_json(
        app,
        "/api/v1/vendors/login",
        json!({ "email": "ana@x.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_rejects_columns_outside_the_allow_list(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());
    let id = register(app.clone(), "Ana", "ana@x.com", "secret1").await;

    for body in [
        json!({ "password_hash": "x" }),
        json!({ "id": 5 }),
        json!({ "name = 'pwned', email": "x" }),
        json!({}),
    ] {
        let response = patch_json(app.clone(), &format!("/api/v1/vendors/{id}"), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let json = body_json(get(app, &format!("/api/v1/vendors/{id}")).await).await;
    assert_eq!(json["data"]["name"], "Ana");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_to_taken_email_is_400(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());
    register(app.clone(), "Ana", "ana@x.com", "secret1").await;
    let bob = register(app.clone(), "Bob", "bob@x.com", "secret1").await;

    let response = patch_json(
        app,
        &format!("/api/v1/vendors/{bob}"),
        json!({ "email": "ana@x.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_EMAIL");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_vendor_then_404(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());
    let id = register(app.clone(), "Ana", "ana@x.com", "secret1").await;

    let response = delete(app.clone(), &format!("/api/v1/vendors/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/vendors/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn vendor_publications_lists_only_theirs(pool: SqlitePool) {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, tmp.path());
    let ana = register(app.clone(), "Ana", "ana@x.com", "secret1").await;
    let bob = register(app.clone(), "Bob", "bob@x.com", "secret1").await;

    for (vendor, name) in [(ana, "Cake"), (bob, "Bread")] {
        let response = post_json(
            app.clone(),
            "/api/v1/publications",
            json!({ "name": name, "description": "Fresh", "vendor_id": vendor }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(get(app, &format!("/api/v1/vendors/{ana}/publications")).await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "Cake");
}
