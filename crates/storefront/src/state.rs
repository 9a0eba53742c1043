//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::CatalogRepository;
use crate::error::AppError;
use crate::models::catalog::Extra;
use crate::services::catalog::{self, ProductGroup};

/// How long the extras lookup table is cached.
const EXTRAS_TTL: Duration = Duration::from_secs(60 * 60);

/// How long the featured home-page selection is cached.
const FEATURED_TTL: Duration = Duration::from_secs(30 * 60);

/// How many menu entries the home page features.
const FEATURED_COUNT: usize = 4;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    extras_cache: Cache<&'static str, Arc<Vec<Extra>>>,
    featured_cache: Cache<&'static str, Arc<Vec<ProductGroup>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let extras_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(EXTRAS_TTL)
            .build();
        let featured_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(FEATURED_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                extras_cache,
                featured_cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The extras lookup table, cached for an hour.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the underlying load fails.
    pub async fn extras(&self) -> Result<Arc<Vec<Extra>>, AppError> {
        self.inner
            .extras_cache
            .try_get_with("extras", async {
                let extras = CatalogRepository::new(&self.inner.pool).list_extras().await?;
                Ok::<_, crate::db::RepositoryError>(Arc::new(extras))
            })
            .await
            .map_err(|e| AppError::Internal(format!("extras cache: {e}")))
    }

    /// The random featured selection for the home page, cached for half an
    /// hour so the front page stays stable between visits.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the underlying load fails.
    pub async fn featured(&self) -> Result<Arc<Vec<ProductGroup>>, AppError> {
        self.inner
            .featured_cache
            .try_get_with("featured", async {
                let repo = CatalogRepository::new(&self.inner.pool);
                let categories = repo.list_categories().await?;
                let products = repo.list_products().await?;
                let groups = catalog::group_products(&products);
                let picks = catalog::pick_featured(&groups, &categories, FEATURED_COUNT);
                Ok::<_, crate::db::RepositoryError>(Arc::new(picks))
            })
            .await
            .map_err(|e| AppError::Internal(format!("featured cache: {e}")))
    }
}
