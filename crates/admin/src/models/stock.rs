//! Stock models: the restock list and the one-step undo buffer.

use serde::{Deserialize, Serialize};

use demitasse_core::ProductId;

/// A stock-managed product on the restock screen.
#[derive(Debug, Clone, Serialize)]
pub struct StockProduct {
    pub id: ProductId,
    pub name: String,
    pub size_volume: Option<String>,
    pub stock_count: i32,
}

/// One product's part of a restock, remembered for undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockEntry {
    pub product_id: ProductId,
    /// Stock count before the restock was applied.
    pub previous_count: i32,
    /// Units the restock added.
    pub added: i32,
}

/// The per-staff-session undo buffer. Depth one: a new restock replaces
/// whatever was remembered before.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockUndo {
    pub entries: Vec<RestockEntry>,
}

impl RestockUndo {
    /// True when there is nothing to undo.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
