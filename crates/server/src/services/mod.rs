//! Business logic above the repositories.
//!
//! - [`auth`]: registration, login, token issuance
//! - [`approval`]: the status state machine and its side effects
//! - [`reports`]: admin dashboards and aggregations
//! - [`metals`]: spot-price lookups with a static fallback

pub mod approval;
pub mod auth;
pub mod metals;
pub mod reports;
