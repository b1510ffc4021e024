//! Notification delivery and recipient scoping.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use lustra_integration_tests::{TestApp, enroll_body};
use serde_json::json;

/// Set up a seller with one notification (their approval) and return
/// `(seller token, notification id)`.
async fn seller_with_notification(app: &TestApp) -> (String, i64) {
    let (token, _) = app.approved_seller("seller@example.com", "Gem Co").await;
    let (status, body) = app.get("/notifications", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["notifications"][0]["id"].as_i64().unwrap();
    (token, id)
}

#[tokio::test]
async fn notifications_start_unread_and_can_be_marked_read() {
    let app = TestApp::spawn().await;
    let (token, id) = seller_with_notification(&app).await;

    let (_, before) = app.get("/notifications", Some(&token)).await;
    assert_eq!(before["unread"], 1);
    assert_eq!(before["notifications"][0]["is_read"], false);

    let (status, _) = app
        .put(&format!("/notifications/{id}/read"), Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = app.get("/notifications", Some(&token)).await;
    assert_eq!(after["unread"], 0);
    assert_eq!(after["notifications"][0]["is_read"], true);
}

#[tokio::test]
async fn only_the_recipient_can_mark_read() {
    let app = TestApp::spawn().await;
    let (_, id) = seller_with_notification(&app).await;

    let (other, _) = app.register("other@example.com", "Other").await;
    let (status, _) = app
        .put(&format!("/notifications/{id}/read"), Some(&other), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(&format!("/notifications/{id}/read"), None, json!({}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn notifications_are_newest_first() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register("seller@example.com", "Sadie").await;
    let (_, enrolled) = app
        .post("/sellers/enroll", Some(&token), enroll_body("Gem Co"))
        .await;
    let seller_id = enrolled["id"].as_i64().unwrap();

    let admin = app.register_admin("admin@example.com").await;
    let path = format!("/admin/sellers/{seller_id}/status");
    app.put(&path, Some(&admin), json!({ "status": "approved" }))
        .await;
    app.put(&path, Some(&admin), json!({ "status": "suspended" }))
        .await;

    let (_, body) = app.get("/notifications", Some(&token)).await;
    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    let newest = notifications[0]["message"].as_str().unwrap();
    assert!(newest.contains("suspended"), "got: {newest}");
    assert_eq!(body["unread"], 2);
}
