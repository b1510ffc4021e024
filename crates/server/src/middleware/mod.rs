//! Request middleware and extractors.

pub mod auth;

pub use auth::{Claims, OptionalAuth, RequireAdmin, RequireAuth};
