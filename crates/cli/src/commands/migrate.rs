//! Database migration command.
//!
//! The storefront and admin binaries share one database; the migrations
//! live with the storefront crate.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use super::{CommandError, connect};

/// Run database migrations.
///
/// # Errors
///
/// Returns a `CommandError` when the connection or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
