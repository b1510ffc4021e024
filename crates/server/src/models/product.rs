//! Product model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lustra_core::{Price, ProductCategory, ProductId, ProductStatus, SellerId};

/// An item listed by a seller.
///
/// The `seller_id` reference is immutable after creation; status changes go
/// through the approval workflow only.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub seller_id: SellerId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: ProductCategory,
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub ar_model: Option<String>,
    pub purchase_link: String,
    pub view_count: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
