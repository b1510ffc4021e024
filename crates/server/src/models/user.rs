//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lustra_core::{Email, Role, UserId};

/// A marketplace user.
///
/// The password hash is deliberately not part of this struct; it is fetched
/// separately by the auth service and never serialized outward.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The resolved caller identity, attached to a request by the auth
/// extractor and carried through the workflow services.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
}
