//! Core types for Demitasse.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod options;
pub mod phone;
pub mod status;

pub use id::*;
pub use money::round_price;
pub use options::{ExtraKind, LineOptions};
pub use phone::{Phone, PhoneError};
pub use status::{OrderStatus, StatusParseError, TransitionError};
