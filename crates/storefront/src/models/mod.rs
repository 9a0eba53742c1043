//! Domain models for the storefront.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use cart::CartLine;
pub use catalog::{Category, Extra, NutritionFacts, Product, Size};
pub use order::{Order, OrderLine};
pub use session::{CurrentUser, session_keys};
pub use user::User;
