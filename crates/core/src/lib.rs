//! Lustra Core - Shared types library.
//!
//! This crate provides common types used across the Lustra marketplace:
//! - `server` - The REST API service
//! - `integration-tests` - End-to-end test suite
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles,
//!   statuses, and partial-update fields

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
