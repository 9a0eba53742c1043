//! Business logic for the admin service.

pub mod auth;
pub mod stock;
