//! Admin dashboards and aggregations.
//!
//! Read-only projections over the store: the pending review queue, headline
//! counts, growth chart series, and the per-seller detail view. Handlers call
//! these after the admin check; nothing here mutates state.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use lustra_core::{Email, ProductStatus, Role, SellerId, SellerStatus};

use crate::db::{
    HistoryRepository, ProductRepository, RepositoryError, SellerRepository, UserRepository,
};
use crate::error::{ApiError, Result};
use crate::models::product::Product;
use crate::models::seller::{Seller, SellerHistoryEntry};
use crate::state::AppState;

/// The admin review queue: everything awaiting a decision, oldest first.
#[derive(Debug, Serialize)]
pub struct PendingApprovals {
    pub sellers: Vec<PendingSeller>,
    pub products: Vec<PendingProduct>,
}

#[derive(Debug, Serialize)]
pub struct PendingSeller {
    pub id: SellerId,
    pub business_name: String,
    pub applicant_name: String,
    pub applicant_email: Email,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PendingProduct {
    #[serde(flatten)]
    pub product: Product,
    pub seller_business_name: String,
}

/// Headline counts for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub approved_sellers: i64,
    pub approved_products: i64,
    /// Pending sellers plus pending products.
    pub pending_approvals: i64,
}

/// Time window for the growth chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPeriod {
    Week,
    Month,
    AllTime,
}

/// One chart bucket: a calendar day (`YYYY-MM-DD`) or month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub bucket: String,
    pub users: i64,
    pub products: i64,
}

/// Everything the admin seller-detail page shows.
#[derive(Debug, Serialize)]
pub struct SellerDetails {
    pub seller: Seller,
    pub owner: SellerOwner,
    pub products: Vec<Product>,
    pub history: Vec<HistoryView>,
}

#[derive(Debug, Serialize)]
pub struct SellerOwner {
    pub name: String,
    pub email: Email,
    pub role: Role,
}

/// Audit entry with the acting admin's name and role resolved for display.
#[derive(Debug, Serialize)]
pub struct HistoryView {
    #[serde(flatten)]
    pub entry: SellerHistoryEntry,
    pub admin_name: Option<String>,
    pub admin_role: Option<Role>,
}

/// List everything awaiting an admin decision.
///
/// # Errors
///
/// Returns `ApiError::Database` on repository failure, including a
/// `DataCorruption` surface when a pending seller's owner is missing.
pub async fn pending_approvals(state: &AppState) -> Result<PendingApprovals> {
    let sellers = SellerRepository::new(state.pool());
    let users = UserRepository::new(state.pool());
    let products = ProductRepository::new(state.pool());

    let mut pending_sellers = Vec::new();
    for seller in sellers.list_by_status(SellerStatus::Pending).await? {
        let owner = users.get_by_id(seller.user_id).await?.ok_or_else(|| {
            ApiError::Database(RepositoryError::DataCorruption(format!(
                "seller {} references missing user {}",
                seller.id, seller.user_id
            )))
        })?;
        pending_sellers.push(PendingSeller {
            id: seller.id,
            business_name: seller.business_name,
            applicant_name: owner.name,
            applicant_email: owner.email,
            created_at: seller.created_at,
        });
    }

    let pending_products = products
        .list_pending_with_seller_name()
        .await?
        .into_iter()
        .map(|(product, seller_business_name)| PendingProduct {
            product,
            seller_business_name,
        })
        .collect();

    Ok(PendingApprovals {
        sellers: pending_sellers,
        products: pending_products,
    })
}

/// Compute the dashboard headline counts.
///
/// # Errors
///
/// Returns `ApiError::Database` on repository failure.
pub async fn dashboard_stats(state: &AppState) -> Result<DashboardStats> {
    let users = UserRepository::new(state.pool());
    let sellers = SellerRepository::new(state.pool());
    let products = ProductRepository::new(state.pool());

    let total_users = users.count().await?;
    let approved_sellers = sellers.count_by_status(SellerStatus::Approved).await?;
    let approved_products = products.count_by_status(ProductStatus::Approved).await?;
    let pending_sellers = sellers.count_by_status(SellerStatus::Pending).await?;
    let pending_products = products.count_by_status(ProductStatus::Pending).await?;

    Ok(DashboardStats {
        total_users,
        approved_sellers,
        approved_products,
        pending_approvals: pending_sellers + pending_products,
    })
}

/// Build the growth chart for the given window.
///
/// Weekly and monthly windows bucket by day; all-time buckets by month.
///
/// # Errors
///
/// Returns `ApiError::Database` on repository failure.
pub async fn chart_data(state: &AppState, period: ChartPeriod) -> Result<Vec<ChartPoint>> {
    let users = UserRepository::new(state.pool());
    let products = ProductRepository::new(state.pool());

    let (user_series, product_series) = match period {
        ChartPeriod::Week => {
            let cutoff = Utc::now() - Duration::days(7);
            (
                users.count_created_by_day(cutoff).await?,
                products.count_created_by_day(cutoff).await?,
            )
        }
        ChartPeriod::Month => {
            let cutoff = Utc::now() - Duration::days(30);
            (
                users.count_created_by_day(cutoff).await?,
                products.count_created_by_day(cutoff).await?,
            )
        }
        ChartPeriod::AllTime => (
            users.count_created_by_month().await?,
            products.count_created_by_month().await?,
        ),
    };

    Ok(merge_series(user_series, product_series))
}

/// Union-merge two bucketed series into chart points, ascending by bucket.
///
/// A bucket present in either input appears in the output; a count missing
/// from one side defaults to zero.
fn merge_series(users: Vec<(String, i64)>, products: Vec<(String, i64)>) -> Vec<ChartPoint> {
    let mut merged: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for (bucket, n) in users {
        merged.entry(bucket).or_default().0 = n;
    }
    for (bucket, n) in products {
        merged.entry(bucket).or_default().1 = n;
    }

    merged
        .into_iter()
        .map(|(bucket, (users, products))| ChartPoint {
            bucket,
            users,
            products,
        })
        .collect()
}

/// Assemble the admin detail view of one seller.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the seller doesn't exist, and a
/// `DataCorruption` surface when its owner is missing.
pub async fn seller_details(state: &AppState, seller_id: SellerId) -> Result<SellerDetails> {
    let sellers = SellerRepository::new(state.pool());
    let users = UserRepository::new(state.pool());
    let products = ProductRepository::new(state.pool());
    let history = HistoryRepository::new(state.pool());

    let seller = sellers
        .get_by_id(seller_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("seller {seller_id}")))?;

    let owner = users.get_by_id(seller.user_id).await?.ok_or_else(|| {
        ApiError::Database(RepositoryError::DataCorruption(format!(
            "seller {} references missing user {}",
            seller.id, seller.user_id
        )))
    })?;

    let products = products.list_by_seller(seller_id).await?;
    let history = history
        .list_for_seller_with_admin(seller_id)
        .await?
        .into_iter()
        .map(|(entry, admin_name, admin_role)| HistoryView {
            entry,
            admin_name,
            admin_role,
        })
        .collect();

    Ok(SellerDetails {
        seller,
        owner: SellerOwner {
            name: owner.name,
            email: owner.email,
            role: owner.role,
        },
        products,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pairs: &[(&str, i64)]) -> Vec<(String, i64)> {
        pairs.iter().map(|(b, n)| ((*b).to_owned(), *n)).collect()
    }

    #[test]
    fn test_merge_series_union_of_buckets() {
        let users = series(&[("2026-08-01", 3), ("2026-08-03", 1)]);
        let products = series(&[("2026-08-02", 5), ("2026-08-03", 2)]);

        let merged = merge_series(users, products);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].bucket, "2026-08-01");
        assert_eq!((merged[0].users, merged[0].products), (3, 0));
        assert_eq!(merged[1].bucket, "2026-08-02");
        assert_eq!((merged[1].users, merged[1].products), (0, 5));
        assert_eq!(merged[2].bucket, "2026-08-03");
        assert_eq!((merged[2].users, merged[2].products), (1, 2));
    }

    #[test]
    fn test_merge_series_empty_inputs() {
        assert!(merge_series(Vec::new(), Vec::new()).is_empty());

        let only_users = merge_series(series(&[("2026-08-01", 2)]), Vec::new());
        assert_eq!(only_users.len(), 1);
        assert_eq!((only_users[0].users, only_users[0].products), (2, 0));
    }

    #[test]
    fn test_merge_series_sorted_ascending() {
        let users = series(&[("2026-08-09", 1), ("2026-08-07", 1)]);
        let merged = merge_series(users, Vec::new());
        assert_eq!(merged[0].bucket, "2026-08-07");
        assert_eq!(merged[1].bucket, "2026-08-09");
    }
}
