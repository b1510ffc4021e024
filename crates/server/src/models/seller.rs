//! Seller and audit-trail models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lustra_core::{HistoryId, SellerId, SellerStatus, UserId};

/// Structured business address. All fields are required at enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// A seller profile, owned by exactly one user.
#[derive(Debug, Clone, Serialize)]
pub struct Seller {
    pub id: SellerId,
    pub user_id: UserId,
    pub business_name: String,
    pub tax_id: String,
    pub address: Address,
    pub status: SellerStatus,
    pub rating: f64,
    pub certificate_doc: String,
    pub identity_doc: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One field-level change inside an audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

/// Append-only audit trail entry.
///
/// Created only as a side effect of a status transition; immutable once
/// written.
#[derive(Debug, Clone, Serialize)]
pub struct SellerHistoryEntry {
    pub id: HistoryId,
    pub seller_id: SellerId,
    pub admin_id: UserId,
    pub changes: Vec<FieldChange>,
    pub note: String,
    pub created_at: DateTime<Utc>,
}
