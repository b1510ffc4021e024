//! Seller repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use lustra_core::{SellerId, SellerStatus, UserId};

use super::RepositoryError;
use crate::models::seller::{Address, Seller};

#[derive(sqlx::FromRow)]
struct SellerRow {
    id: i64,
    user_id: i64,
    business_name: String,
    tax_id: String,
    street: String,
    city: String,
    state: String,
    postal_code: String,
    status: SellerStatus,
    rating: f64,
    certificate_doc: String,
    identity_doc: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SellerRow> for Seller {
    fn from(r: SellerRow) -> Self {
        Self {
            id: SellerId::new(r.id),
            user_id: UserId::new(r.user_id),
            business_name: r.business_name,
            tax_id: r.tax_id,
            address: Address {
                street: r.street,
                city: r.city,
                state: r.state,
                postal_code: r.postal_code,
            },
            status: r.status,
            rating: r.rating,
            certificate_doc: r.certificate_doc,
            identity_doc: r.identity_doc,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const SELLER_COLUMNS: &str = r"
    id, user_id, business_name, tax_id, street, city, state, postal_code,
    status, rating, certificate_doc, identity_doc, created_at, updated_at
";

/// Repository for seller database operations.
pub struct SellerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SellerRepository<'a> {
    /// Create a new seller repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a seller profile for a user. New sellers are always `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a seller
    /// profile, or the business name or tax ID is taken.
    pub async fn create(
        &self,
        user_id: UserId,
        business_name: &str,
        tax_id: &str,
        address: &Address,
        certificate_doc: &str,
        identity_doc: &str,
    ) -> Result<Seller, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO sellers
                (user_id, business_name, tax_id, street, city, state, postal_code,
                 status, rating, certificate_doc, identity_doc, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?)
            ",
        )
        .bind(user_id.as_i64())
        .bind(business_name)
        .bind(tax_id)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.postal_code)
        .bind(SellerStatus::Pending)
        .bind(certificate_doc)
        .bind(identity_doc)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_unique_violation(
                e,
                "business name or tax id already registered",
            )
        })?;

        Ok(Seller {
            id: SellerId::new(result.last_insert_rowid()),
            user_id,
            business_name: business_name.to_owned(),
            tax_id: tax_id.to_owned(),
            address: address.clone(),
            status: SellerStatus::Pending,
            rating: 0.0,
            certificate_doc: certificate_doc.to_owned(),
            identity_doc: identity_doc.to_owned(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a seller by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: SellerId) -> Result<Option<Seller>, RepositoryError> {
        let row = sqlx::query_as::<_, SellerRow>(&format!(
            "SELECT {SELLER_COLUMNS} FROM sellers WHERE id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Seller::from))
    }

    /// Get the seller profile owned by a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Seller>, RepositoryError> {
        let row = sqlx::query_as::<_, SellerRow>(&format!(
            "SELECT {SELLER_COLUMNS} FROM sellers WHERE user_id = ?"
        ))
        .bind(user_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Seller::from))
    }

    /// List all sellers, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Seller>, RepositoryError> {
        let rows = sqlx::query_as::<_, SellerRow>(&format!(
            "SELECT {SELLER_COLUMNS} FROM sellers ORDER BY created_at ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Seller::from).collect())
    }

    /// List sellers with the given status, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_status(
        &self,
        status: SellerStatus,
    ) -> Result<Vec<Seller>, RepositoryError> {
        let rows = sqlx::query_as::<_, SellerRow>(&format!(
            "SELECT {SELLER_COLUMNS} FROM sellers WHERE status = ? ORDER BY created_at ASC"
        ))
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Seller::from).collect())
    }

    /// Count sellers with the given status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_status(&self, status: SellerStatus) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sellers WHERE status = ?")
            .bind(status)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Write a new status. The approval workflow is the only caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the seller doesn't exist.
    pub async fn set_status(
        &self,
        id: SellerId,
        status: SellerStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE sellers SET status = ?, updated_at = ? WHERE id = ?
            ",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Update a seller's own profile fields. `None` leaves a field unchanged.
    ///
    /// Status is deliberately not updatable here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the seller doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new business name is taken.
    pub async fn update_profile(
        &self,
        id: SellerId,
        business_name: Option<&str>,
        address: Option<&Address>,
    ) -> Result<Seller, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE sellers
            SET business_name = COALESCE(?, business_name),
                street = COALESCE(?, street),
                city = COALESCE(?, city),
                state = COALESCE(?, state),
                postal_code = COALESCE(?, postal_code),
                updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(business_name)
        .bind(address.map(|a| a.street.as_str()))
        .bind(address.map(|a| a.city.as_str()))
        .bind(address.map(|a| a.state.as_str()))
        .bind(address.map(|a| a.postal_code.as_str()))
        .bind(Utc::now())
        .bind(id.as_i64())
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "business name already taken"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }
}
