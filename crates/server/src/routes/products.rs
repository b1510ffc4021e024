//! Product catalog route handlers.
//!
//! Reads are public but only ever expose approved products; pending and
//! rejected listings are visible to their owner and to admins only, and are
//! otherwise indistinguishable from missing.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;

use lustra_core::{Patch, Price, ProductCategory, ProductId, ProductStatus, Role, SellerStatus};

use crate::db::{ProductRepository, RepositoryError, SellerRepository};
use crate::db::products::ProductFields;
use crate::error::{ApiError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::product::Product;
use crate::models::user::CurrentUser;
use crate::policy::{self, Action};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<ProductCategory>,
}

/// List approved products, optionally filtered by category.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_status(ProductStatus::Approved, query.category)
        .await?;
    Ok(Json(products))
}

/// Fetch one product.
///
/// Viewing an approved product records a view event and bumps the counter.
pub async fn show(
    OptionalAuth(viewer): OptionalAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    headers: HeaderMap,
) -> Result<Json<Product>> {
    let products = ProductRepository::new(state.pool());
    let product = products
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;

    if product.status == ProductStatus::Approved {
        let viewer_id = viewer.as_ref().map(|v| v.id);
        let client_ip = client_ip(&headers);
        if let Err(e) = products.record_view(id, viewer_id, client_ip).await {
            tracing::warn!(product_id = %id, error = %e, "failed to record view");
        }
        if let Err(e) = products.increment_view_count(id).await {
            tracing::warn!(product_id = %id, error = %e, "failed to bump view count");
        }
        return Ok(Json(product));
    }

    // Unapproved listings exist only for their owner and for admins.
    match viewer {
        Some(ref user) if can_see_unapproved(&state, user, &product).await? => Ok(Json(product)),
        _ => Err(ApiError::NotFound(format!("product {id}"))),
    }
}

/// New listing payload. Any status supplied by the client is ignored; every
/// listing starts `pending`.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: ProductCategory,
    #[serde(default)]
    pub images: Vec<String>,
    pub ar_model: Option<String>,
    pub purchase_link: String,
}

/// Create a listing. Requires an approved seller profile.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    if !policy::can_perform(&user, &Action::ManageOwnListings) {
        return Err(ApiError::Forbidden("seller access required".to_string()));
    }

    let seller = SellerRepository::new(state.pool())
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("seller profile".to_string()))?;
    if seller.status != SellerStatus::Approved {
        return Err(ApiError::Forbidden(
            "seller account is not approved".to_string(),
        ));
    }

    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    if req.purchase_link.trim().is_empty() {
        return Err(ApiError::BadRequest("purchase_link is required".to_string()));
    }

    let product = ProductRepository::new(state.pool())
        .create(
            seller.id,
            &ProductFields {
                name: &req.name,
                description: &req.description,
                price: req.price,
                category: req.category,
                images: &req.images,
                ar_model: req.ar_model.as_deref(),
                purchase_link: &req.purchase_link,
            },
        )
        .await?;

    tracing::info!(product_id = %product.id, seller_id = %seller.id, "listing created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Partial listing update. Absent fields keep their value; `ar_model`
/// distinguishes absent from an explicit `null`, which clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category: Option<ProductCategory>,
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub ar_model: Patch<String>,
    pub purchase_link: Option<String>,
}

/// Edit a listing. The owning seller or an admin.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let products = ProductRepository::new(state.pool());
    let product = products
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;

    authorize_modification(&state, &user, &product).await?;

    if let Some(name) = req.name.as_deref()
        && name.trim().is_empty()
    {
        return Err(ApiError::BadRequest("name cannot be empty".to_string()));
    }

    let name = req.name.unwrap_or_else(|| product.name.clone());
    let description = req
        .description
        .unwrap_or_else(|| product.description.clone());
    let price = req.price.unwrap_or(product.price);
    let category = req.category.unwrap_or(product.category);
    let images = req.images.unwrap_or_else(|| product.images.clone());
    let ar_model = req.ar_model.apply(product.ar_model.clone());
    let purchase_link = req
        .purchase_link
        .unwrap_or_else(|| product.purchase_link.clone());

    let updated = products
        .update(
            id,
            &ProductFields {
                name: &name,
                description: &description,
                price,
                category,
                images: &images,
                ar_model: ar_model.as_deref(),
                purchase_link: &purchase_link,
            },
        )
        .await?;
    Ok(Json(updated))
}

/// Delete a listing. The owning seller or an admin.
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let products = ProductRepository::new(state.pool());
    let product = products
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;

    authorize_modification(&state, &user, &product).await?;

    if !products.delete(id).await? {
        return Err(ApiError::NotFound(format!("product {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Record a purchase-link click. Public and fire-and-forget.
pub async fn click(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<StatusCode> {
    let products = ProductRepository::new(state.pool());
    products
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;

    products.increment_click_count(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the owning user and run the ownership policy check.
async fn authorize_modification(
    state: &AppState,
    user: &CurrentUser,
    product: &Product,
) -> Result<()> {
    let owner = owning_user(state, product).await?;
    if !policy::can_perform(user, &Action::ModifyProduct { owner }) {
        return Err(ApiError::Forbidden(
            "only the owning seller or an admin can modify this listing".to_string(),
        ));
    }
    Ok(())
}

async fn can_see_unapproved(
    state: &AppState,
    user: &CurrentUser,
    product: &Product,
) -> Result<bool> {
    if user.role == Role::Admin {
        return Ok(true);
    }
    Ok(owning_user(state, product).await? == user.id)
}

async fn owning_user(state: &AppState, product: &Product) -> Result<lustra_core::UserId> {
    let seller = SellerRepository::new(state.pool())
        .get_by_id(product.seller_id)
        .await?
        .ok_or_else(|| {
            ApiError::Database(RepositoryError::DataCorruption(format!(
                "product {} references missing seller {}",
                product.id, product.seller_id
            )))
        })?;
    Ok(seller.user_id)
}

/// Client IP as reported by the reverse proxy, if any.
fn client_ip(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
}
