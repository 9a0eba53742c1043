//! Demitasse Core - Shared types library.
//!
//! This crate provides common types used across all Demitasse components:
//! - `storefront` - Customer-facing ordering site
//! - `admin` - Staff panel (order fulfillment, stock, statistics)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used
//! anywhere, including in unit tests of business rules.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, phone numbers, order status state machine,
//!   cart-line option tuples, and money rounding

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
