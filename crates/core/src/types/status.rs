//! Status enums and their transition tables.
//!
//! Status fields only ever change through the approval workflow, and the
//! workflow only accepts edges present in the tables below. Re-issuing the
//! current status is always accepted (an idempotent re-issue still produces
//! its audit/notification side effects).

use serde::{Deserialize, Serialize};

/// Lifecycle status of a seller profile.
///
/// ```text
/// pending   -> approved | rejected | suspended
/// approved  -> suspended | rejected
/// suspended -> approved | rejected
/// rejected  -> (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum SellerStatus {
    #[default]
    Pending,
    Approved,
    Suspended,
    Rejected,
}

impl SellerStatus {
    /// The set of statuses reachable from `self` in a single transition,
    /// not counting the always-legal re-issue of the current status.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected, Self::Suspended],
            Self::Approved => &[Self::Suspended, Self::Rejected],
            Self::Suspended => &[Self::Approved, Self::Rejected],
            Self::Rejected => &[],
        }
    }

    /// Whether a transition from `self` to `next` is legal.
    ///
    /// `self -> self` is always legal (idempotent re-issue).
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self.allowed_transitions().contains(&next)
    }
}

impl std::fmt::Display for SellerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Suspended => write!(f, "suspended"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for SellerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "suspended" => Ok(Self::Suspended),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid seller status: {s}")),
        }
    }
}

/// Lifecycle status of a product listing.
///
/// ```text
/// pending  -> approved | rejected
/// approved -> (re-issue only)
/// rejected -> (re-issue only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ProductStatus {
    /// The set of statuses reachable from `self` in a single transition,
    /// not counting the always-legal re-issue of the current status.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }

    /// Whether a transition from `self` to `next` is legal.
    ///
    /// `self -> self` is always legal (idempotent re-issue).
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || self.allowed_transitions().contains(&next)
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

/// Jewelry product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Rings,
    Necklaces,
    Earrings,
    Bracelets,
    Anklets,
    Watches,
    Other,
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Rings => "rings",
            Self::Necklaces => "necklaces",
            Self::Earrings => "earrings",
            Self::Bracelets => "bracelets",
            Self::Anklets => "anklets",
            Self::Watches => "watches",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seller_pending_reaches_all_decisions() {
        assert!(SellerStatus::Pending.can_transition_to(SellerStatus::Approved));
        assert!(SellerStatus::Pending.can_transition_to(SellerStatus::Rejected));
        assert!(SellerStatus::Pending.can_transition_to(SellerStatus::Suspended));
    }

    #[test]
    fn seller_suspension_is_reversible() {
        assert!(SellerStatus::Approved.can_transition_to(SellerStatus::Suspended));
        assert!(SellerStatus::Suspended.can_transition_to(SellerStatus::Approved));
    }

    #[test]
    fn seller_rejected_is_terminal() {
        assert!(!SellerStatus::Rejected.can_transition_to(SellerStatus::Approved));
        assert!(!SellerStatus::Rejected.can_transition_to(SellerStatus::Pending));
        assert!(!SellerStatus::Rejected.can_transition_to(SellerStatus::Suspended));
    }

    #[test]
    fn reissue_is_always_legal() {
        for status in [
            SellerStatus::Pending,
            SellerStatus::Approved,
            SellerStatus::Suspended,
            SellerStatus::Rejected,
        ] {
            assert!(status.can_transition_to(status));
        }
        for status in [
            ProductStatus::Pending,
            ProductStatus::Approved,
            ProductStatus::Rejected,
        ] {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn product_decisions_are_final_except_reissue() {
        assert!(ProductStatus::Pending.can_transition_to(ProductStatus::Approved));
        assert!(ProductStatus::Pending.can_transition_to(ProductStatus::Rejected));
        assert!(!ProductStatus::Approved.can_transition_to(ProductStatus::Rejected));
        assert!(!ProductStatus::Rejected.can_transition_to(ProductStatus::Approved));
        assert!(!ProductStatus::Approved.can_transition_to(ProductStatus::Pending));
    }

    #[test]
    fn statuses_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&SellerStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::from_str::<ProductStatus>("\"approved\"").unwrap(),
            ProductStatus::Approved
        );
    }
}
