//! Seller audit-trail repository.
//!
//! The `seller_history` table is append-only. Entries are written as a side
//! effect of status transitions and never updated or deleted afterwards.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use lustra_core::{HistoryId, Role, SellerId, UserId};

use super::RepositoryError;
use crate::models::seller::{FieldChange, SellerHistoryEntry};

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: i64,
    seller_id: i64,
    admin_id: i64,
    changes: String,
    note: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<HistoryRow> for SellerHistoryEntry {
    type Error = RepositoryError;

    fn try_from(r: HistoryRow) -> Result<Self, Self::Error> {
        let changes: Vec<FieldChange> = serde_json::from_str(&r.changes).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid change list in database: {e}"))
        })?;

        Ok(Self {
            id: HistoryId::new(r.id),
            seller_id: SellerId::new(r.seller_id),
            admin_id: UserId::new(r.admin_id),
            changes,
            note: r.note,
            created_at: r.created_at,
        })
    }
}

/// Repository for seller audit-trail entries.
pub struct HistoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> HistoryRepository<'a> {
    /// Create a new history repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an audit entry recording the given field changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn append(
        &self,
        seller_id: SellerId,
        admin_id: UserId,
        changes: &[FieldChange],
        note: &str,
    ) -> Result<SellerHistoryEntry, RepositoryError> {
        let now = Utc::now();
        let changes_json = serde_json::to_string(changes)
            .map_err(|e| RepositoryError::DataCorruption(format!("change list: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO seller_history (seller_id, admin_id, changes, note, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(seller_id.as_i64())
        .bind(admin_id.as_i64())
        .bind(&changes_json)
        .bind(note)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(SellerHistoryEntry {
            id: HistoryId::new(result.last_insert_rowid()),
            seller_id,
            admin_id,
            changes: changes.to_vec(),
            note: note.to_owned(),
            created_at: now,
        })
    }

    /// List the audit trail for a seller, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_for_seller(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<SellerHistoryEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r"
            SELECT id, seller_id, admin_id, changes, note, created_at
            FROM seller_history
            WHERE seller_id = ?
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(seller_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(SellerHistoryEntry::try_from).collect()
    }

    /// List the audit trail for a seller with the acting admin's display
    /// name and role resolved, newest first.
    ///
    /// Admins can be deleted after the fact, so both resolved fields are
    /// `None` when the referenced user no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_for_seller_with_admin(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<(SellerHistoryEntry, Option<String>, Option<Role>)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct JoinedRow {
            #[sqlx(flatten)]
            entry: HistoryRow,
            admin_name: Option<String>,
            admin_role: Option<Role>,
        }

        let rows = sqlx::query_as::<_, JoinedRow>(
            r"
            SELECT h.id, h.seller_id, h.admin_id, h.changes, h.note, h.created_at,
                   u.name AS admin_name, u.role AS admin_role
            FROM seller_history h
            LEFT JOIN users u ON u.id = h.admin_id
            WHERE h.seller_id = ?
            ORDER BY h.created_at DESC, h.id DESC
            ",
        )
        .bind(seller_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok((
                    SellerHistoryEntry::try_from(r.entry)?,
                    r.admin_name,
                    r.admin_role,
                ))
            })
            .collect()
    }

    /// Number of entries recorded for a seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_seller(&self, seller_id: SellerId) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM seller_history WHERE seller_id = ?")
                .bind(seller_id.as_i64())
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
