//! Database and session models.

pub mod admin_user;
pub mod order;
pub mod product;
pub mod session;

pub use admin_user::AdminUser;
pub use order::{CustomerDetails, Order, OrderDraft, OrderItem, SnapshotLine};
pub use product::{NewProduct, Product, ProductUpdate};
pub use session::{CurrentAdmin, keys as session_keys};
