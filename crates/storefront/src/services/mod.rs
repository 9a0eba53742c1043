//! Business logic sitting between the HTTP handlers and the repositories.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
