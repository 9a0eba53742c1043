//! Restocking and the one-step undo.
//!
//! A restock applies increments to stock-managed products and remembers,
//! per staff session, what each count was beforehand. Undo restores those
//! absolute counts. Orders placed between a restock and its undo are
//! deliberately not reconciled; the restore is last-writer-wins.

use sqlx::PgPool;
use thiserror::Error;

use demitasse_core::ProductId;

use crate::db::{RepositoryError, StockRepository};
use crate::models::{RestockUndo, StockProduct};

/// One product's requested increment.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct RestockRequest {
    pub product_id: ProductId,
    pub added: i32,
}

/// Errors surfaced by stock operations.
#[derive(Debug, Error)]
pub enum StockError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("restock amounts must be positive")]
    InvalidAmount,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Keep only the requests that will actually change stock: positive
/// amounts against products that exist and are stock-managed.
#[must_use]
pub fn plan_restock(
    requests: &[RestockRequest],
    products: &[(StockProduct, bool)],
) -> Vec<RestockRequest> {
    requests
        .iter()
        .filter(|req| req.added > 0)
        .filter(|req| {
            products
                .iter()
                .any(|(p, managed)| p.id == req.product_id && *managed)
        })
        .copied()
        .collect()
}

/// Stock operations.
pub struct StockService<'a> {
    pool: &'a PgPool,
}

impl<'a> StockService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Apply a bulk restock and return the undo buffer describing it.
    ///
    /// Requests for unknown or non-stock-managed products are skipped.
    /// An effectively empty restock returns an empty buffer, which the
    /// caller stores as "nothing to undo".
    ///
    /// # Errors
    ///
    /// Returns `StockError::InvalidAmount` when any amount is negative, or
    /// a wrapped repository error.
    pub async fn restock(
        &self,
        requests: &[RestockRequest],
    ) -> Result<RestockUndo, StockError> {
        if requests.iter().any(|req| req.added < 0) {
            return Err(StockError::InvalidAmount);
        }

        let repo = StockRepository::new(self.pool);
        let ids: Vec<ProductId> = requests.iter().map(|req| req.product_id).collect();
        let products = repo.get_by_ids(&ids).await?;
        let planned: Vec<(ProductId, i32)> = plan_restock(requests, &products)
            .into_iter()
            .map(|req| (req.product_id, req.added))
            .collect();

        let entries = repo.increment_all(&planned).await?;
        Ok(RestockUndo { entries })
    }

    /// Undo the last restock by restoring the remembered counts.
    ///
    /// # Errors
    ///
    /// Returns `StockError::NothingToUndo` for an empty buffer, or a
    /// wrapped repository error.
    pub async fn undo(&self, undo: &RestockUndo) -> Result<(), StockError> {
        if undo.is_empty() {
            return Err(StockError::NothingToUndo);
        }

        StockRepository::new(self.pool)
            .restore_all(&undo.entries)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RestockEntry;

    fn stock_product(id: i32, name: &str, count: i32) -> StockProduct {
        StockProduct {
            id: ProductId::new(id),
            name: name.to_owned(),
            size_volume: None,
            stock_count: count,
        }
    }

    #[test]
    fn test_plan_skips_non_stock_managed() {
        let products = vec![
            (stock_product(1, "Cheesecake", 3), true),
            (stock_product(2, "Latte", 0), false),
        ];
        let requests = vec![
            RestockRequest { product_id: ProductId::new(1), added: 5 },
            RestockRequest { product_id: ProductId::new(2), added: 5 },
        ];
        let planned = plan_restock(&requests, &products);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].product_id, ProductId::new(1));
    }

    #[test]
    fn test_plan_skips_zero_amounts_and_unknown_products() {
        let products = vec![(stock_product(1, "Cheesecake", 3), true)];
        let requests = vec![
            RestockRequest { product_id: ProductId::new(1), added: 0 },
            RestockRequest { product_id: ProductId::new(99), added: 4 },
        ];
        assert!(plan_restock(&requests, &products).is_empty());
    }

    #[test]
    fn test_empty_undo_buffer() {
        assert!(RestockUndo::default().is_empty());
        let undo = RestockUndo {
            entries: vec![RestockEntry {
                product_id: ProductId::new(1),
                previous_count: 3,
                added: 5,
            }],
        };
        assert!(!undo.is_empty());
    }
}
