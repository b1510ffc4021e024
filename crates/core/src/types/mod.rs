//! Core type definitions.

pub mod email;
pub mod id;
pub mod patch;
pub mod price;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{HistoryId, NotificationId, ProductId, SellerId, UserId};
pub use patch::Patch;
pub use price::{Price, PriceError};
pub use role::Role;
pub use status::{ProductCategory, ProductStatus, SellerStatus};
