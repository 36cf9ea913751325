//! Session-related types.
//!
//! Types stored in the session: the shopping cart and the admin identity.

use serde::{Deserialize, Serialize};

use maplewood_core::{AdminUserId, Email};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
}

/// Session keys.
pub mod keys {
    /// Key for the session shopping cart.
    pub const CART: &str = "cart";

    /// Key for the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
