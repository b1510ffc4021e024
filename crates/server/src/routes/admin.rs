//! Admin route handlers: dashboards, the review queue, and user management.
//!
//! Every handler here takes [`RequireAdmin`]; finer-grained decisions go
//! through the approval service, which re-checks policy itself.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use lustra_core::{ProductId, ProductStatus, Role, SellerId, SellerStatus, UserId};

use crate::db::{ProductRepository, SellerRepository, UserRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::Product;
use crate::models::seller::Seller;
use crate::models::user::User;
use crate::services::approval;
use crate::services::reports::{
    self, ChartPeriod, ChartPoint, DashboardStats, PendingApprovals, SellerDetails,
};
use crate::state::AppState;

/// Dashboard headline counts.
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>> {
    Ok(Json(reports::dashboard_stats(&state).await?))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub period: Option<ChartPeriod>,
}

/// Growth chart series for the requested window (defaults to a week).
pub async fn chart_data(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Vec<ChartPoint>>> {
    let period = query.period.unwrap_or(ChartPeriod::Week);
    Ok(Json(reports::chart_data(&state, period).await?))
}

/// Everything waiting for an admin decision.
pub async fn approvals(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<PendingApprovals>> {
    Ok(Json(reports::pending_approvals(&state).await?))
}

/// Every seller, regardless of status.
pub async fn sellers_all(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Seller>>> {
    let sellers = SellerRepository::new(state.pool()).list_all().await?;
    Ok(Json(sellers))
}

/// One seller with their owner, products, and audit trail.
pub async fn seller_details(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SellerId>,
) -> Result<Json<SellerDetails>> {
    Ok(Json(reports::seller_details(&state, id).await?))
}

/// Status decision payload for a seller.
#[derive(Debug, Deserialize)]
pub struct SellerStatusRequest {
    pub status: SellerStatus,
    pub note: Option<String>,
}

/// Drive the seller state machine.
pub async fn seller_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SellerId>,
    Json(req): Json<SellerStatusRequest>,
) -> Result<Json<Seller>> {
    let seller =
        approval::transition_seller_status(&state, &admin, id, req.status, req.note.as_deref())
            .await?;
    tracing::info!(seller_id = %id, status = %req.status, admin_id = %admin.id, "seller status changed");
    Ok(Json(seller))
}

/// Every product, regardless of status.
pub async fn products_all(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(products))
}

/// Status decision payload for a product.
#[derive(Debug, Deserialize)]
pub struct ProductStatusRequest {
    pub status: ProductStatus,
}

/// Drive the product state machine.
pub async fn product_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(req): Json<ProductStatusRequest>,
) -> Result<Json<Product>> {
    let product = approval::transition_product_status(&state, &admin, id, req.status).await?;
    tracing::info!(product_id = %id, status = %req.status, admin_id = %admin.id, "product status changed");
    Ok(Json(product))
}

/// Every registered user.
pub async fn users_all(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users))
}

/// Delete an account.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    if admin.id == id {
        return Err(ApiError::BadRequest(
            "cannot delete your own account".to_string(),
        ));
    }

    if !UserRepository::new(state.pool()).delete(id).await? {
        return Err(ApiError::NotFound(format!("user {id}")));
    }
    tracing::info!(user_id = %id, admin_id = %admin.id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Role change payload.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

/// Change a user's role directly.
pub async fn set_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(req): Json<RoleRequest>,
) -> Result<StatusCode> {
    UserRepository::new(state.pool()).set_role(id, req.role).await?;
    tracing::info!(user_id = %id, role = %req.role, admin_id = %admin.id, "role changed");
    Ok(StatusCode::NO_CONTENT)
}
