//! Admin account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use maplewood_core::{AdminUserId, Email};

/// An admin dashboard account.
///
/// The password hash never leaves the db/auth layer; it is skipped during
/// serialization.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
