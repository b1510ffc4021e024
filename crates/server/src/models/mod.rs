//! Domain models.

pub mod notification;
pub mod product;
pub mod seller;
pub mod user;

pub use notification::Notification;
pub use product::Product;
pub use seller::{Address, FieldChange, Seller, SellerHistoryEntry};
pub use user::{CurrentUser, User};
