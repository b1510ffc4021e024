//! Profile and wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use lustra_core::{Email, ProductId};

use crate::db::{ProductRepository, UserRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::models::product::Product;
use crate::models::user::User;
use crate::state::AppState;

/// Fetch the caller's own profile.
pub async fn profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<User>> {
    let found = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user".to_string()))?;
    Ok(Json(found))
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Update the caller's name and/or email.
pub async fn update_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    if let Some(name) = req.name.as_deref()
        && name.trim().is_empty()
    {
        return Err(ApiError::BadRequest("name cannot be empty".to_string()));
    }

    let email = req
        .email
        .as_deref()
        .map(Email::parse)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let updated = UserRepository::new(state.pool())
        .update_profile(user.id, req.name.as_deref(), email.as_ref())
        .await?;
    Ok(Json(updated))
}

/// List the caller's wishlisted products.
///
/// Products deleted since they were wishlisted are silently skipped.
pub async fn wishlist(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let users = UserRepository::new(state.pool());
    let products = ProductRepository::new(state.pool());

    let mut items = Vec::new();
    for product_id in users.wishlist_ids(user.id).await? {
        if let Some(product) = products.get_by_id(product_id).await? {
            items.push(product);
        }
    }
    Ok(Json(items))
}

/// Add a product to the caller's wishlist. Idempotent.
pub async fn wishlist_add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {product_id}")))?;

    UserRepository::new(state.pool())
        .wishlist_add(user.id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a product from the caller's wishlist. Idempotent.
pub async fn wishlist_remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    UserRepository::new(state.pool())
        .wishlist_remove(user.id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
