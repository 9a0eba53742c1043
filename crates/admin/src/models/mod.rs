//! Domain models for the admin service.

pub mod order;
pub mod session;
pub mod stock;

pub use order::{AdminOrder, AdminOrderLine};
pub use session::{CurrentStaff, session_keys};
pub use stock::{RestockEntry, RestockUndo, StockProduct};
