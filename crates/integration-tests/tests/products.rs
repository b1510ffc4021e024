//! Product listings: creation, visibility, ownership, and counters.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use lustra_integration_tests::{TestApp, enroll_body, product_body};
use serde_json::json;

#[tokio::test]
async fn new_listings_are_forced_pending() {
    let app = TestApp::spawn().await;
    let (token, _) = app.approved_seller("seller@example.com", "Gem Co").await;

    // A status in the payload is ignored outright
    let mut body = product_body("Opal Ring");
    body["status"] = json!("approved");
    let (status, created) = app.post("/products", Some(&token), body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");

    // And it stays invisible to the public catalog
    let (_, listing) = app.get("/products", None).await;
    assert_eq!(listing.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn only_approved_sellers_create_listings() {
    let app = TestApp::spawn().await;

    let (customer, _) = app.register("shopper@example.com", "Shopper").await;
    let (status, _) = app
        .post("/products", Some(&customer), product_body("Opal Ring"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Enrolled but still pending: role hasn't flipped yet
    let (applicant, _) = app.register("applicant@example.com", "Applicant").await;
    app.post("/sellers/enroll", Some(&applicant), enroll_body("New Co"))
        .await;
    let (status, _) = app
        .post("/products", Some(&applicant), product_body("Opal Ring"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn public_catalog_shows_only_approved_with_category_filter() {
    let app = TestApp::spawn().await;
    let (token, _) = app.approved_seller("seller@example.com", "Gem Co").await;
    let admin = app.register_admin("reviewer@example.com").await;

    let mut necklace = product_body("Pearl Necklace");
    necklace["category"] = json!("necklaces");
    for body in [product_body("Opal Ring"), necklace, product_body("Hidden Ring")] {
        let (_, created) = app.post("/products", Some(&token), body).await;
        let id = created["id"].as_i64().unwrap();
        if created["name"] != "Hidden Ring" {
            app.put(
                &format!("/admin/products/{id}/status"),
                Some(&admin),
                json!({ "status": "approved" }),
            )
            .await;
        }
    }

    let (_, all) = app.get("/products", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, rings) = app.get("/products?category=rings", None).await;
    assert_eq!(rings.as_array().unwrap().len(), 1);
    assert_eq!(rings[0]["name"], "Opal Ring");
}

#[tokio::test]
async fn unapproved_listings_exist_only_for_owner_and_admin() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.approved_seller("seller@example.com", "Gem Co").await;
    let admin = app.register_admin("reviewer@example.com").await;

    let (_, created) = app
        .post("/products", Some(&owner), product_body("Opal Ring"))
        .await;
    let path = format!("/products/{}", created["id"].as_i64().unwrap());

    let (status, _) = app.get(&path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (other, _) = app.register("shopper@example.com", "Shopper").await;
    let (status, _) = app.get(&path, Some(&other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&path, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&path, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn rival_sellers_cannot_edit_a_listing() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.approved_seller("seller@example.com", "Gem Co").await;
    let (rival, _) = app.approved_seller("rival@example.com", "Rival Co").await;

    let (_, created) = app
        .post("/products", Some(&owner), product_body("Opal Ring"))
        .await;
    let path = format!("/products/{}", created["id"].as_i64().unwrap());

    let (status, _) = app
        .put(&path, Some(&rival), json!({ "name": "Stolen Ring" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unchanged after the rejected edit
    let (_, current) = app.get(&path, Some(&owner)).await;
    assert_eq!(current["name"], "Opal Ring");

    let (status, updated) = app
        .put(&path, Some(&owner), json!({ "name": "Fire Opal Ring" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Fire Opal Ring");
    assert_eq!(updated["price"], "149.99");
}

#[tokio::test]
async fn admins_can_modify_any_listing() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.approved_seller("seller@example.com", "Gem Co").await;
    let admin = app.register_admin("reviewer@example.com").await;

    let (_, created) = app
        .post("/products", Some(&owner), product_body("Opal Ring"))
        .await;
    let path = format!("/products/{}", created["id"].as_i64().unwrap());

    let (status, updated) = app
        .put(&path, Some(&admin), json!({ "name": "Opal Ring (corrected)" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Opal Ring (corrected)");

    let (status, _) = app.delete(&path, Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&path, Some(&owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ar_model_distinguishes_null_from_absent() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.approved_seller("seller@example.com", "Gem Co").await;

    let mut body = product_body("Opal Ring");
    body["ar_model"] = json!("/uploads/ring.glb");
    let (_, created) = app.post("/products", Some(&owner), body).await;
    let path = format!("/products/{}", created["id"].as_i64().unwrap());

    // Absent field: model kept
    let (_, updated) = app
        .put(&path, Some(&owner), json!({ "name": "Opal Ring II" }))
        .await;
    assert_eq!(updated["ar_model"], "/uploads/ring.glb");

    // Explicit null: model cleared
    let (_, updated) = app
        .put(&path, Some(&owner), json!({ "ar_model": null }))
        .await;
    assert!(updated["ar_model"].is_null());
}

#[tokio::test]
async fn invalid_prices_are_client_errors() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.approved_seller("seller@example.com", "Gem Co").await;

    for price in ["-10.00", "0"] {
        let mut body = product_body("Opal Ring");
        body["price"] = json!(price);
        let (status, _) = app.post("/products", Some(&owner), body).await;
        assert!(status.is_client_error(), "price {price} gave {status}");
    }
}

#[tokio::test]
async fn views_and_clicks_are_counted() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.approved_seller("seller@example.com", "Gem Co").await;
    let admin = app.register_admin("reviewer@example.com").await;

    let (_, created) = app
        .post("/products", Some(&owner), product_body("Opal Ring"))
        .await;
    let id = created["id"].as_i64().unwrap();
    app.put(
        &format!("/admin/products/{id}/status"),
        Some(&admin),
        json!({ "status": "approved" }),
    )
    .await;

    let path = format!("/products/{id}");
    app.get(&path, None).await;
    app.get(&path, None).await;
    let (_, third) = app.get(&path, None).await;
    assert_eq!(third["view_count"], 2);

    let (status, _) = app.post(&format!("{path}/click"), None, json!({})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The owner's dashboard carries the retention-window view tally
    let (_, mine) = app.get("/sellers/products", Some(&owner)).await;
    assert_eq!(mine[0]["recent_views"], 3);
    assert_eq!(mine[0]["click_count"], 1);
}

#[tokio::test]
async fn owner_can_delete_a_listing() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.approved_seller("seller@example.com", "Gem Co").await;

    let (_, created) = app
        .post("/products", Some(&owner), product_body("Opal Ring"))
        .await;
    let path = format!("/products/{}", created["id"].as_i64().unwrap());

    let (status, _) = app.delete(&path, Some(&owner)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&path, Some(&owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wishlist_round_trip() {
    let app = TestApp::spawn().await;
    let (owner, _) = app.approved_seller("seller@example.com", "Gem Co").await;
    let admin = app.register_admin("reviewer@example.com").await;
    let (shopper, _) = app.register("shopper@example.com", "Shopper").await;

    let (_, created) = app
        .post("/products", Some(&owner), product_body("Opal Ring"))
        .await;
    let id = created["id"].as_i64().unwrap();
    app.put(
        &format!("/admin/products/{id}/status"),
        Some(&admin),
        json!({ "status": "approved" }),
    )
    .await;

    let (status, _) = app
        .post(&format!("/users/wishlist/{id}"), Some(&shopper), json!({}))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    // Adding twice is a no-op
    app.post(&format!("/users/wishlist/{id}"), Some(&shopper), json!({}))
        .await;

    let (_, list) = app.get("/users/wishlist", Some(&shopper)).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Opal Ring");

    let (status, _) = app
        .delete(&format!("/users/wishlist/{id}"), Some(&shopper))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = app.get("/users/wishlist", Some(&shopper)).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}
