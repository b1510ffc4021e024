//! Notification repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use lustra_core::{NotificationId, UserId};

use super::RepositoryError;
use crate::models::notification::Notification;

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    message: String,
    is_read: bool,
    link: Option<String>,
    kind: String,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(r: NotificationRow) -> Self {
        Self {
            id: NotificationId::new(r.id),
            user_id: UserId::new(r.user_id),
            message: r.message,
            is_read: r.is_read,
            link: r.link,
            kind: r.kind,
            created_at: r.created_at,
        }
    }
}

/// Repository for notification database operations.
pub struct NotificationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Deliver a notification to a user. New notifications start unread.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        message: &str,
        link: Option<&str>,
        kind: &str,
    ) -> Result<Notification, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO notifications (user_id, message, is_read, link, kind, created_at)
            VALUES (?, ?, 0, ?, ?, ?)
            ",
        )
        .bind(user_id.as_i64())
        .bind(message)
        .bind(link)
        .bind(kind)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Notification {
            id: NotificationId::new(result.last_insert_rowid()),
            user_id,
            message: message.to_owned(),
            is_read: false,
            link: link.map(str::to_owned),
            kind: kind.to_owned(),
            created_at: now,
        })
    }

    /// List a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r"
            SELECT id, user_id, message, is_read, link, kind, created_at
            FROM notifications
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    /// Mark a notification read, scoped to its recipient.
    ///
    /// The recipient scope means a caller can never flip someone else's
    /// notification; for them it simply doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the notification doesn't exist
    /// or belongs to another user.
    pub async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?
            ",
        )
        .bind(id.as_i64())
        .bind(user_id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count a user's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_unread(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
        )
        .bind(user_id.as_i64())
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}
