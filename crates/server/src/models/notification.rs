//! Notification model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lustra_core::{NotificationId, UserId};

/// A message delivered to one user.
///
/// Only the recipient may mark it read.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub is_read: bool,
    pub link: Option<String>,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}
