//! Catalog repository: categories, sizes, extras, products.

use rust_decimal::Decimal;
use sqlx::PgPool;

use demitasse_core::{
    CategoryId, ExtraId, ExtraKind, NutritionFactsId, ProductId, SizeId,
};

use super::RepositoryError;
use crate::models::catalog::{Category, Extra, NutritionFacts, Product, Size};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    stock_managed: bool,
    allows_sugar: bool,
    allows_cinnamon: bool,
    allows_milk: bool,
    allows_syrup: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            stock_managed: row.stock_managed,
            allows_sugar: row.allows_sugar,
            allows_cinnamon: row.allows_cinnamon,
            allows_milk: row.allows_milk,
            allows_syrup: row.allows_syrup,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExtraRow {
    id: i32,
    name: String,
    kind: ExtraKind,
    price: Decimal,
}

impl From<ExtraRow> for Extra {
    fn from(row: ExtraRow) -> Self {
        Self {
            id: ExtraId::new(row.id),
            name: row.name,
            kind: row.kind,
            price: row.price,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NutritionFactsRow {
    id: i32,
    kilocalories: Option<i32>,
    proteins: Option<i32>,
    fats: Option<i32>,
    carbohydrates: Option<i32>,
}

impl From<NutritionFactsRow> for NutritionFacts {
    fn from(row: NutritionFactsRow) -> Self {
        Self {
            id: NutritionFactsId::new(row.id),
            kilocalories: row.kilocalories,
            proteins: row.proteins,
            fats: row.fats,
            carbohydrates: row.carbohydrates,
        }
    }
}

/// Product joined with its category and optional size.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    slug: String,
    price: Decimal,
    photo: Option<String>,
    description: Option<String>,
    nutrition_facts_id: Option<i32>,
    stock_count: i32,
    allows_extras: bool,
    allows_condensed_milk: bool,
    variable_price: bool,
    category_id: i32,
    category_name: String,
    stock_managed: bool,
    allows_sugar: bool,
    allows_cinnamon: bool,
    allows_milk: bool,
    allows_syrup: bool,
    size_id: Option<i32>,
    size_name: Option<String>,
    size_volume: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let size = match (row.size_id, row.size_name, row.size_volume) {
            (Some(id), Some(name), Some(volume)) => Some(Size {
                id: SizeId::new(id),
                name,
                volume,
            }),
            _ => None,
        };

        Self {
            id: ProductId::new(row.id),
            name: row.name,
            slug: row.slug,
            price: row.price,
            photo: row.photo,
            description: row.description,
            category: Category {
                id: CategoryId::new(row.category_id),
                name: row.category_name,
                stock_managed: row.stock_managed,
                allows_sugar: row.allows_sugar,
                allows_cinnamon: row.allows_cinnamon,
                allows_milk: row.allows_milk,
                allows_syrup: row.allows_syrup,
            },
            size,
            nutrition_facts_id: row.nutrition_facts_id.map(NutritionFactsId::new),
            stock_count: row.stock_count,
            allows_extras: row.allows_extras,
            allows_condensed_milk: row.allows_condensed_milk,
            variable_price: row.variable_price,
        }
    }
}

/// Shared SELECT for product queries (joined with category and size).
const PRODUCT_SELECT: &str = r"
    SELECT p.id, p.name, p.slug, p.price, p.photo, p.description,
           p.nutrition_facts_id, p.stock_count, p.allows_extras,
           p.allows_condensed_milk, p.variable_price,
           c.id AS category_id, c.name AS category_name, c.stock_managed,
           c.allows_sugar, c.allows_cinnamon, c.allows_milk, c.allows_syrup,
           s.id AS size_id, s.name AS size_name, s.volume AS size_volume
    FROM products p
    JOIN categories c ON c.id = p.category_id
    LEFT JOIN sizes s ON s.id = p.size_id
";

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog reference data.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT * FROM categories ORDER BY id")
                .fetch_all(self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// All product variations, ordered by name then size for stable
    /// grouping.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("{PRODUCT_SELECT} ORDER BY p.name, p.size_id NULLS FIRST, p.id");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Look up one product variation by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.slug = $1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Look up one product variation by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = $1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Fetch several products by id (cart rendering, order placement).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = ANY($1)");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(&raw)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// All variations sharing a product's name within its category,
    /// ordered by size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variations_of(
        &self,
        category_id: CategoryId,
        name: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "{PRODUCT_SELECT} WHERE p.category_id = $1 AND p.name = $2 \
             ORDER BY p.size_id NULLS FIRST, p.id"
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(category_id.as_i32())
            .bind(name)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Nutrition facts for a product variation, if recorded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_nutrition_facts(
        &self,
        id: NutritionFactsId,
    ) -> Result<Option<NutritionFacts>, RepositoryError> {
        let row: Option<NutritionFactsRow> =
            sqlx::query_as("SELECT * FROM nutrition_facts WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    /// All extras ordered by name (the cached lookup table).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_extras(&self) -> Result<Vec<Extra>, RepositoryError> {
        let rows: Vec<ExtraRow> =
            sqlx::query_as("SELECT id, name, kind, price FROM extras ORDER BY name")
                .fetch_all(self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
