//! Stock queries: the restock list, increments, and absolute restores.

use sqlx::PgPool;

use demitasse_core::ProductId;

use super::RepositoryError;
use crate::models::{RestockEntry, StockProduct};

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    id: i32,
    name: String,
    size_volume: Option<String>,
    stock_count: i32,
    stock_managed: bool,
}

impl From<StockRow> for StockProduct {
    fn from(row: StockRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            size_volume: row.size_volume,
            stock_count: row.stock_count,
        }
    }
}

const STOCK_SELECT: &str = r"
    SELECT p.id, p.name, s.volume AS size_volume, p.stock_count,
           c.stock_managed
    FROM products p
    JOIN categories c ON c.id = p.category_id
    LEFT JOIN sizes s ON s.id = p.size_id
";

/// Repository for stock management.
pub struct StockRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StockRepository<'a> {
    /// Create a new stock repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every stock-managed product, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_stock_managed(&self) -> Result<Vec<StockProduct>, RepositoryError> {
        let sql = format!("{STOCK_SELECT} WHERE c.stock_managed ORDER BY p.name, p.id");
        let rows: Vec<StockRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Fetch products by id, with the flag saying whether each is
    /// stock-managed at all.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<(StockProduct, bool)>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let sql = format!("{STOCK_SELECT} WHERE p.id = ANY($1)");
        let rows: Vec<StockRow> = sqlx::query_as(&sql)
            .bind(&raw)
            .fetch_all(self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let managed = row.stock_managed;
                (row.into(), managed)
            })
            .collect())
    }

    /// Apply a batch of increments in one transaction, returning each
    /// product's count before its increment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if any product is missing (the
    /// whole batch rolls back), or `RepositoryError::Database` if an
    /// update fails.
    pub async fn increment_all(
        &self,
        requests: &[(ProductId, i32)],
    ) -> Result<Vec<RestockEntry>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut entries = Vec::with_capacity(requests.len());
        for &(id, added) in requests {
            let row: Option<(i32,)> = sqlx::query_as(
                "UPDATE products SET stock_count = stock_count + $1 \
                 WHERE id = $2 RETURNING stock_count - $1",
            )
            .bind(added)
            .bind(id.as_i32())
            .fetch_optional(&mut *tx)
            .await?;
            let (previous_count,) = row.ok_or(RepositoryError::NotFound)?;
            entries.push(RestockEntry {
                product_id: id,
                previous_count,
                added,
            });
        }
        tx.commit().await?;
        Ok(entries)
    }

    /// Set products back to absolute counts in one transaction. Used by
    /// undo, which restores the remembered pre-restock values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if any product is missing (the
    /// whole batch rolls back), or `RepositoryError::Database` if an
    /// update fails.
    pub async fn restore_all(&self, entries: &[RestockEntry]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        for entry in entries {
            let result = sqlx::query("UPDATE products SET stock_count = $1 WHERE id = $2")
                .bind(entry.previous_count)
                .bind(entry.product_id.as_i32())
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
        }
        tx.commit().await?;
        Ok(())
    }
}
