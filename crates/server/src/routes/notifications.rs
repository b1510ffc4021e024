//! Notification route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use lustra_core::NotificationId;

use crate::db::NotificationRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::notification::Notification;
use crate::state::AppState;

/// The caller's notifications with an unread tally for the badge.
#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread: i64,
}

/// List the caller's notifications, newest first.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<NotificationList>> {
    let repo = NotificationRepository::new(state.pool());
    let notifications = repo.list_for_user(user.id).await?;
    let unread = repo.count_unread(user.id).await?;
    Ok(Json(NotificationList {
        notifications,
        unread,
    }))
}

/// Mark one notification read. The query is recipient-scoped, so another
/// user's notification is a 404 here, never a disclosure.
pub async fn mark_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<NotificationId>,
) -> Result<StatusCode> {
    NotificationRepository::new(state.pool())
        .mark_read(id, user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
