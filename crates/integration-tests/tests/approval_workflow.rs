//! The status state machine and its side effects.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use lustra_core::SellerId;
use lustra_integration_tests::{TestApp, enroll_body, product_body};
use lustra_server::db::HistoryRepository;
use serde_json::json;

async fn pending_seller(app: &TestApp) -> (String, i64) {
    let (token, _) = app.register("seller@example.com", "Sadie").await;
    let (status, body) = app
        .post("/sellers/enroll", Some(&token), enroll_body("Gem Co"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    (token, body["id"].as_i64().unwrap())
}

#[tokio::test]
async fn approving_a_seller_writes_history_notification_and_role() {
    let app = TestApp::spawn().await;
    let (seller_token, seller_id) = pending_seller(&app).await;
    let admin = app.register_admin("admin@example.com").await;

    let (status, body) = app
        .put(
            &format!("/admin/sellers/{seller_id}/status"),
            Some(&admin),
            json!({ "status": "approved", "note": "docs verified" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    // Exactly one audit entry recording pending -> approved
    let history = HistoryRepository::new(&app.pool)
        .list_for_seller(SellerId::new(seller_id))
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].changes.len(), 1);
    assert_eq!(history[0].changes[0].field, "status");
    assert_eq!(history[0].changes[0].old_value, "pending");
    assert_eq!(history[0].changes[0].new_value, "approved");
    assert_eq!(history[0].note, "docs verified");

    // One unread notification naming the decision
    let (status, body) = app.get("/notifications", Some(&seller_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unread"], 1);
    let message = body["notifications"][0]["message"].as_str().unwrap();
    assert!(message.contains("approved"), "got: {message}");

    // The owner's role followed the status
    let (_, profile) = app.get("/users/profile", Some(&seller_token)).await;
    assert_eq!(profile["role"], "seller");
}

#[tokio::test]
async fn rejected_is_terminal() {
    let app = TestApp::spawn().await;
    let (_, seller_id) = pending_seller(&app).await;
    let admin = app.register_admin("admin@example.com").await;

    let path = format!("/admin/sellers/{seller_id}/status");
    let (status, _) = app
        .put(&path, Some(&admin), json!({ "status": "rejected" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    for next in ["approved", "suspended", "pending"] {
        let (status, _) = app.put(&path, Some(&admin), json!({ "status": next })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "rejected -> {next} must fail");
    }
}

#[tokio::test]
async fn suspended_sellers_can_be_reinstated() {
    let app = TestApp::spawn().await;
    let (_, seller_id) = pending_seller(&app).await;
    let admin = app.register_admin("admin@example.com").await;
    let path = format!("/admin/sellers/{seller_id}/status");

    for step in ["approved", "suspended", "approved"] {
        let (status, body) = app.put(&path, Some(&admin), json!({ "status": step })).await;
        assert_eq!(status, StatusCode::OK, "step {step} failed: {body}");
    }

    // Three decisions, three audit entries, newest first
    let history = HistoryRepository::new(&app.pool)
        .list_for_seller(SellerId::new(seller_id))
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].changes[0].new_value, "approved");
    assert_eq!(history[0].changes[0].old_value, "suspended");
}

#[tokio::test]
async fn reissuing_the_same_status_is_legal_and_audited() {
    let app = TestApp::spawn().await;
    let (_, seller_id) = pending_seller(&app).await;
    let admin = app.register_admin("admin@example.com").await;
    let path = format!("/admin/sellers/{seller_id}/status");

    let (status, _) = app
        .put(&path, Some(&admin), json!({ "status": "approved" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .put(&path, Some(&admin), json!({ "status": "approved" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let count = HistoryRepository::new(&app.pool)
        .count_for_seller(SellerId::new(seller_id))
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn transitions_are_admin_only_and_target_must_exist() {
    let app = TestApp::spawn().await;
    let (seller_token, seller_id) = pending_seller(&app).await;
    let admin = app.register_admin("admin@example.com").await;

    let (status, _) = app
        .put(
            &format!("/admin/sellers/{seller_id}/status"),
            Some(&seller_token),
            json!({ "status": "approved" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(
            "/admin/sellers/9999/status",
            Some(&admin),
            json!({ "status": "approved" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(
            &format!("/admin/sellers/{seller_id}/status"),
            None,
            json!({ "status": "approved" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn product_decisions_notify_the_owner() {
    let app = TestApp::spawn().await;
    let (seller_token, _) = app.approved_seller("seller@example.com", "Gem Co").await;
    let admin = app.register_admin("reviewer@example.com").await;

    let (status, body) = app
        .post("/products", Some(&seller_token), product_body("Opal Ring"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = body["id"].as_i64().unwrap();

    let (status, body) = app
        .put(
            &format!("/admin/products/{product_id}/status"),
            Some(&admin),
            json!({ "status": "approved" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (_, body) = app.get("/notifications", Some(&seller_token)).await;
    let messages: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["message"].as_str())
        .collect();
    assert!(
        messages.iter().any(|m| m.contains("Opal Ring") && m.contains("approved")),
        "got: {messages:?}"
    );
}

#[tokio::test]
async fn decided_products_cannot_be_redecided() {
    let app = TestApp::spawn().await;
    let (seller_token, _) = app.approved_seller("seller@example.com", "Gem Co").await;
    let admin = app.register_admin("reviewer@example.com").await;

    let (_, body) = app
        .post("/products", Some(&seller_token), product_body("Opal Ring"))
        .await;
    let product_id = body["id"].as_i64().unwrap();
    let path = format!("/admin/products/{product_id}/status");

    let (status, _) = app
        .put(&path, Some(&admin), json!({ "status": "rejected" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .put(&path, Some(&admin), json!({ "status": "approved" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
