//! Spot prices and uploads.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use lustra_integration_tests::TestApp;
use tower::ServiceExt;

#[tokio::test]
async fn spot_price_degrades_to_fallback() {
    let app = TestApp::spawn().await;

    // No API key configured: the quote comes from the fallback table
    let (status, quote) = app.get("/gold/XAU", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["symbol"], "XAU");
    assert_eq!(quote["source"], "fallback");
    assert_eq!(quote["currency"], "USD");
    assert!(quote["price"].as_f64().unwrap() > 0.0);

    // Names work too, case-insensitively
    let (status, quote) = app.get("/gold/silver", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["symbol"], "XAG");
}

#[tokio::test]
async fn unknown_symbols_are_rejected() {
    let app = TestApp::spawn().await;
    let (status, _) = app.get("/gold/XCU", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_stores_a_file_and_validates_type() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register("seller@example.com", "Sadie").await;

    let (status, body) = multipart_upload(&app, Some(&token), "ring.png", b"\x89PNG fake").await;
    assert_eq!(status, StatusCode::CREATED);
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));

    let (status, _) = multipart_upload(&app, Some(&token), "malware.exe", b"MZ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = multipart_upload(&app, None, "ring.png", b"\x89PNG fake").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

async fn multipart_upload(
    app: &TestApp,
    token: Option<&str>,
    filename: &str,
    content: &[u8],
) -> (StatusCode, serde_json::Value) {
    let boundary = "test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}
