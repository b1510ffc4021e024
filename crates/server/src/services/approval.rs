//! The approval workflow: status transitions and their side effects.
//!
//! Only admins drive this service. A transition is validated against the
//! state machine in `lustra_core::types::status`, the status write happens
//! first, and the side effects (audit entry, notification, role sync) follow
//! best-effort. A failed side effect is logged and never rolls back the
//! status change.

use lustra_core::{ProductId, ProductStatus, Role, SellerId, SellerStatus};

use crate::db::{
    HistoryRepository, NotificationRepository, ProductRepository, SellerRepository,
    UserRepository,
};
use crate::error::{ApiError, Result};
use crate::models::product::Product;
use crate::models::seller::{FieldChange, Seller};
use crate::models::user::CurrentUser;
use crate::policy::{self, Action};
use crate::state::AppState;

/// Notification kind written for every workflow decision.
const KIND_STATUS_CHANGE: &str = "status_change";

/// Transition a seller to `new_status`.
///
/// Re-issuing the current status is legal and still produces an audit entry
/// and a notification, so repeated admin decisions stay visible in the trail.
///
/// # Errors
///
/// - `Forbidden` when the actor is not an admin
/// - `NotFound` when the seller doesn't exist
/// - `BadRequest` when the state machine forbids the transition
pub async fn transition_seller_status(
    state: &AppState,
    actor: &CurrentUser,
    seller_id: SellerId,
    new_status: SellerStatus,
    note: Option<&str>,
) -> Result<Seller> {
    if !policy::can_perform(actor, &Action::ReviewApprovals) {
        return Err(ApiError::Forbidden("admin access required".to_string()));
    }

    let sellers = SellerRepository::new(state.pool());
    let seller = sellers
        .get_by_id(seller_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("seller {seller_id}")))?;

    let old_status = seller.status;
    if !old_status.can_transition_to(new_status) {
        return Err(ApiError::BadRequest(format!(
            "cannot change seller status from {old_status} to {new_status}"
        )));
    }

    sellers.set_status(seller_id, new_status).await?;

    record_seller_side_effects(state, actor, &seller, old_status, new_status, note).await;

    sellers
        .get_by_id(seller_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("seller {seller_id}")))
}

/// Transition a product to `new_status` and notify the owning seller.
///
/// # Errors
///
/// - `Forbidden` when the actor is not an admin
/// - `NotFound` when the product doesn't exist
/// - `BadRequest` when the state machine forbids the transition
pub async fn transition_product_status(
    state: &AppState,
    actor: &CurrentUser,
    product_id: ProductId,
    new_status: ProductStatus,
) -> Result<Product> {
    if !policy::can_perform(actor, &Action::ReviewApprovals) {
        return Err(ApiError::Forbidden("admin access required".to_string()));
    }

    let products = ProductRepository::new(state.pool());
    let product = products
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {product_id}")))?;

    let old_status = product.status;
    if !old_status.can_transition_to(new_status) {
        return Err(ApiError::BadRequest(format!(
            "cannot change product status from {old_status} to {new_status}"
        )));
    }

    products.set_status(product_id, new_status).await?;

    notify_product_owner(state, &product, new_status).await;

    products
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {product_id}")))
}

/// Best-effort side effects of a seller transition: audit entry,
/// notification to the owner, role sync.
async fn record_seller_side_effects(
    state: &AppState,
    actor: &CurrentUser,
    seller: &Seller,
    old_status: SellerStatus,
    new_status: SellerStatus,
    note: Option<&str>,
) {
    let change = FieldChange {
        field: "status".to_string(),
        old_value: old_status.to_string(),
        new_value: new_status.to_string(),
    };
    if let Err(e) = HistoryRepository::new(state.pool())
        .append(seller.id, actor.id, &[change], note.unwrap_or_default())
        .await
    {
        tracing::error!(seller_id = %seller.id, error = %e, "failed to record audit entry");
    }

    let message = seller_status_message(&seller.business_name, new_status);
    if let Err(e) = NotificationRepository::new(state.pool())
        .create(
            seller.user_id,
            &message,
            Some("/seller/dashboard"),
            KIND_STATUS_CHANGE,
        )
        .await
    {
        tracing::error!(seller_id = %seller.id, error = %e, "failed to deliver notification");
    }

    // Role follows seller status: approved sellers get the seller role,
    // everyone else falls back to customer.
    let role = match new_status {
        SellerStatus::Approved => Role::Seller,
        SellerStatus::Pending | SellerStatus::Suspended | SellerStatus::Rejected => Role::Customer,
    };
    if let Err(e) = UserRepository::new(state.pool())
        .set_role(seller.user_id, role)
        .await
    {
        tracing::error!(user_id = %seller.user_id, error = %e, "failed to sync role");
    }
}

async fn notify_product_owner(state: &AppState, product: &Product, new_status: ProductStatus) {
    let owner = match SellerRepository::new(state.pool())
        .get_by_id(product.seller_id)
        .await
    {
        Ok(Some(seller)) => seller.user_id,
        Ok(None) => {
            tracing::error!(product_id = %product.id, "product has no owning seller");
            return;
        }
        Err(e) => {
            tracing::error!(product_id = %product.id, error = %e, "failed to resolve owner");
            return;
        }
    };

    let message = product_status_message(&product.name, new_status);
    if let Err(e) = NotificationRepository::new(state.pool())
        .create(owner, &message, Some("/seller/products"), KIND_STATUS_CHANGE)
        .await
    {
        tracing::error!(product_id = %product.id, error = %e, "failed to deliver notification");
    }
}

fn seller_status_message(business_name: &str, status: SellerStatus) -> String {
    match status {
        SellerStatus::Approved => {
            format!("Your seller account \"{business_name}\" has been approved. You can now list products.")
        }
        SellerStatus::Rejected => {
            format!("Your seller application \"{business_name}\" has been rejected.")
        }
        SellerStatus::Suspended => {
            format!("Your seller account \"{business_name}\" has been suspended.")
        }
        SellerStatus::Pending => {
            format!("Your seller account \"{business_name}\" is pending review.")
        }
    }
}

fn product_status_message(product_name: &str, status: ProductStatus) -> String {
    match status {
        ProductStatus::Approved => {
            format!("Your product \"{product_name}\" has been approved and is now live.")
        }
        ProductStatus::Rejected => {
            format!("Your product \"{product_name}\" has been rejected.")
        }
        ProductStatus::Pending => {
            format!("Your product \"{product_name}\" is pending review.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages_name_the_decision() {
        assert!(seller_status_message("Gem Co", SellerStatus::Approved).contains("approved"));
        assert!(seller_status_message("Gem Co", SellerStatus::Rejected).contains("rejected"));
        assert!(seller_status_message("Gem Co", SellerStatus::Suspended).contains("suspended"));
        assert!(product_status_message("Ring", ProductStatus::Approved).contains("approved"));
        assert!(product_status_message("Ring", ProductStatus::Rejected).contains("rejected"));
    }
}
