//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /auth/register                      - Create an account, returns a token
//! POST /auth/login                         - Verify credentials, returns a token
//!
//! # Users (requires auth)
//! GET    /users/profile                    - Current user's profile
//! PUT    /users/profile                    - Update name/email
//! GET    /users/wishlist                   - Wishlisted products
//! POST   /users/wishlist/{product_id}      - Add to wishlist
//! DELETE /users/wishlist/{product_id}      - Remove from wishlist
//!
//! # Sellers
//! POST /sellers/enroll                     - Apply to become a seller
//! GET  /sellers/profile                    - Own seller profile
//! PUT  /sellers/profile                    - Update business name/address
//! GET  /sellers/products                   - Own listings with recent views
//!
//! # Products
//! GET    /products                         - Approved products (public)
//! GET    /products/{id}                    - Product detail (records a view)
//! POST   /products                         - Create listing (approved sellers)
//! PUT    /products/{id}                    - Edit own listing
//! DELETE /products/{id}                    - Delete own listing
//! POST   /products/{id}/click              - Record a purchase-link click
//!
//! # Admin (requires admin role)
//! GET    /admin/stats                      - Dashboard headline counts
//! GET    /admin/chart-data?period=         - Growth chart (week|month|all_time)
//! GET    /admin/approvals                  - Pending sellers and products
//! GET    /admin/sellers/all                - Every seller
//! GET    /admin/sellers/details/{id}       - Seller with owner, products, history
//! PUT    /admin/sellers/{id}/status        - Drive the seller state machine
//! GET    /admin/products/all               - Every product
//! PUT    /admin/products/{id}/status       - Drive the product state machine
//! GET    /admin/users                      - Every user
//! DELETE /admin/users/{id}                 - Delete an account
//! PUT    /admin/users/{id}/role            - Change a user's role
//!
//! # Notifications (requires auth)
//! GET /notifications                       - Own notifications, newest first
//! PUT /notifications/{id}/read             - Mark one read (recipient only)
//!
//! # Misc
//! POST /upload                             - Multipart image upload
//! GET  /gold/{symbol}                      - Metal spot price (XAU, XAG, XPT, XPD)
//! ```

pub mod admin;
pub mod auth;
pub mod metals;
pub mod notifications;
pub mod products;
pub mod sellers;
pub mod upload;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(users::profile).put(users::update_profile))
        .route("/wishlist", get(users::wishlist))
        .route(
            "/wishlist/{product_id}",
            post(users::wishlist_add).delete(users::wishlist_remove),
        )
}

/// Create the seller routes router.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/enroll", post(sellers::enroll))
        .route("/profile", get(sellers::profile).put(sellers::update_profile))
        .route("/products", get(sellers::my_products))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/{id}/click", post(products::click))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route("/chart-data", get(admin::chart_data))
        .route("/approvals", get(admin::approvals))
        .route("/sellers/all", get(admin::sellers_all))
        .route("/sellers/details/{id}", get(admin::seller_details))
        .route("/sellers/{id}/status", put(admin::seller_status))
        .route("/products/all", get(admin::products_all))
        .route("/products/{id}/status", put(admin::product_status))
        .route("/users", get(admin::users_all))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/users/{id}/role", put(admin::set_user_role))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/{id}/read", put(notifications::mark_read))
}

/// Assemble the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/sellers", seller_routes())
        .nest("/products", product_routes())
        .nest("/admin", admin_routes())
        .nest("/notifications", notification_routes())
        .route("/upload", post(upload::upload))
        .route("/gold/{symbol}", get(metals::spot_price))
}
