//! Seller enrollment and self-service route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::db::{ProductRepository, SellerRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::models::product::Product;
use crate::models::seller::{Address, Seller};
use crate::policy::{self, Action};
use crate::state::AppState;

/// Seller application payload. Every field is required.
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub business_name: String,
    pub tax_id: String,
    pub address: Address,
    pub certificate_doc: String,
    pub identity_doc: String,
}

/// Apply to become a seller. The application starts `pending` and waits for
/// an admin decision.
pub async fn enroll(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<Seller>)> {
    // One seller per user, whatever its status. Checked before the role
    // gate so a re-applying seller sees the duplicate, not a role refusal.
    let sellers = SellerRepository::new(state.pool());
    if sellers.get_by_user(user.id).await?.is_some() {
        return Err(ApiError::BadRequest("already a seller".to_string()));
    }

    if !policy::can_perform(&user, &Action::EnrollAsSeller) {
        return Err(ApiError::Forbidden(
            "only customer accounts can apply to sell".to_string(),
        ));
    }

    validate_enrollment(&req)?;

    let seller = sellers
        .create(
            user.id,
            &req.business_name,
            &req.tax_id,
            &req.address,
            &req.certificate_doc,
            &req.identity_doc,
        )
        .await?;

    tracing::info!(seller_id = %seller.id, user_id = %user.id, "seller application submitted");
    Ok((StatusCode::CREATED, Json(seller)))
}

/// Fetch the caller's seller profile.
pub async fn profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Seller>> {
    let seller = SellerRepository::new(state.pool())
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("seller profile".to_string()))?;
    Ok(Json(seller))
}

/// Partial seller profile update. Absent fields are left unchanged; status
/// and documents are never updatable here.
#[derive(Debug, Deserialize)]
pub struct UpdateSellerRequest {
    pub business_name: Option<String>,
    pub address: Option<Address>,
}

/// Update the caller's own seller profile.
pub async fn update_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<UpdateSellerRequest>,
) -> Result<Json<Seller>> {
    if let Some(name) = req.business_name.as_deref()
        && name.trim().is_empty()
    {
        return Err(ApiError::BadRequest(
            "business name cannot be empty".to_string(),
        ));
    }

    let sellers = SellerRepository::new(state.pool());
    let seller = sellers
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("seller profile".to_string()))?;

    let updated = sellers
        .update_profile(seller.id, req.business_name.as_deref(), req.address.as_ref())
        .await?;
    Ok(Json(updated))
}

/// A listing with its view count inside the analytics window.
#[derive(Debug, Serialize)]
pub struct SellerProduct {
    #[serde(flatten)]
    pub product: Product,
    pub recent_views: i64,
}

/// List the caller's own products, annotated with recent view counts.
pub async fn my_products(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<SellerProduct>>> {
    let seller = SellerRepository::new(state.pool())
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("seller profile".to_string()))?;

    let products = ProductRepository::new(state.pool());
    let mut listings = Vec::new();
    for product in products.list_by_seller(seller.id).await? {
        let recent_views = products.recent_view_count(product.id).await?;
        listings.push(SellerProduct {
            product,
            recent_views,
        });
    }
    Ok(Json(listings))
}

fn validate_enrollment(req: &EnrollRequest) -> Result<()> {
    let required = [
        ("business_name", &req.business_name),
        ("tax_id", &req.tax_id),
        ("street", &req.address.street),
        ("city", &req.address.city),
        ("state", &req.address.state),
        ("postal_code", &req.address.postal_code),
        ("certificate_doc", &req.certificate_doc),
        ("identity_doc", &req.identity_doc),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("{field} is required")));
        }
    }
    Ok(())
}
