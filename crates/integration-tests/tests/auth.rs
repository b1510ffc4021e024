//! Registration, login, and profile access.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use lustra_integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn register_creates_customer_and_signs_in() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "Ada@Example.com", "name": "Ada", "password": "longenough" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["role"], "customer");
    // Emails are normalized to lowercase
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register("ada@example.com", "Ada").await;

    let (status, _) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "ada@example.com", "name": "Imposter", "password": "longenough" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_weak_password_and_bad_email() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "ada@example.com", "name": "Ada", "password": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "not-an-email", "name": "Ada", "password": "longenough" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_bad_credentials_uniformly() {
    let app = TestApp::spawn().await;
    app.register("ada@example.com", "Ada").await;

    let (status, _) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": "wrong password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown account looks exactly like a wrong password
    let (status, _) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "wrong password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_requires_valid_token() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register("ada@example.com", "Ada").await;

    let (status, body) = app.get("/users/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada");

    let (status, _) = app.get("/users/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/users/profile", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_is_partial() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register("ada@example.com", "Ada").await;

    let (status, body) = app
        .put("/users/profile", Some(&token), json!({ "name": "Ada L." }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada L.");
    assert_eq!(body["email"], "ada@example.com");

    // Taking another account's email is a client error
    app.register("grace@example.com", "Grace").await;
    let (status, _) = app
        .put(
            "/users/profile",
            Some(&token),
            json!({ "email": "grace@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
}
