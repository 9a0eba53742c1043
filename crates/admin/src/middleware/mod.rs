//! Middleware: session management and the staff-only gate.

pub mod auth;
pub mod session;

pub use auth::RequireStaff;
pub use session::create_session_layer;
