//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use demitasse_core::{Phone, UserId};

/// A registered customer (or staff member).
///
/// The password hash is never part of this struct; credential lookups go
/// through [`crate::db::UserRepository::find_credentials`].
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub phone: Phone,
    pub email: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}
