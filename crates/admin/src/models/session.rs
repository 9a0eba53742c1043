//! Session state for staff users.

use serde::{Deserialize, Serialize};

use demitasse_core::UserId;

/// Session storage keys.
pub mod session_keys {
    /// The logged-in staff member.
    pub const CURRENT_STAFF: &str = "current_staff";

    /// The last restock, kept for one-step undo.
    pub const RESTOCK_UNDO: &str = "restock_undo";
}

/// The staff member stored in the session after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStaff {
    pub id: UserId,
    pub name: String,
}
