//! Session state models.

use serde::{Deserialize, Serialize};

use demitasse_core::UserId;

/// Keys used for session storage.
pub mod session_keys {
    /// The currently authenticated user ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated user stored in the session after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub is_staff: bool,
}
