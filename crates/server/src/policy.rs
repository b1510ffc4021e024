//! Central authorization policy.
//!
//! Every handler that gates on role or ownership phrases the check as an
//! [`Action`] and asks [`can_perform`]. Keeping the rules in one table makes
//! the role matrix reviewable at a glance and testable without HTTP.

use lustra_core::{Role, UserId};

use crate::models::user::CurrentUser;

/// A guarded operation, carrying whatever ownership context it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Change a seller's or product's status through the approval workflow.
    ReviewApprovals,
    /// Read admin dashboards, pending queues, and full entity lists.
    ViewAdminReports,
    /// Delete accounts or change a user's role.
    ManageUsers,
    /// Apply to become a seller.
    EnrollAsSeller,
    /// Create and manage product listings.
    ManageOwnListings,
    /// Edit or delete a specific product, owned by `owner`.
    ModifyProduct { owner: UserId },
    /// Mark a notification read; `recipient` is who it was delivered to.
    ReadNotification { recipient: UserId },
}

/// Decide whether `actor` may perform `action`.
#[must_use]
pub fn can_perform(actor: &CurrentUser, action: &Action) -> bool {
    match action {
        Action::ReviewApprovals | Action::ViewAdminReports | Action::ManageUsers => {
            actor.role == Role::Admin
        }
        // Sellers and admins already have a role; only plain customers apply.
        Action::EnrollAsSeller => actor.role == Role::Customer,
        Action::ManageOwnListings => matches!(actor.role, Role::Seller | Role::Admin),
        // The owning seller, or an admin cleaning up on their behalf.
        Action::ModifyProduct { owner } => {
            actor.role == Role::Admin || (actor.role == Role::Seller && actor.id == *owner)
        }
        Action::ReadNotification { recipient } => actor.id == *recipient,
    }
}
