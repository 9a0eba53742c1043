//! Staff account lookup for admin login.

use sqlx::PgPool;

use demitasse_core::UserId;

use super::RepositoryError;
use crate::models::CurrentStaff;

#[derive(Debug, sqlx::FromRow)]
struct StaffRow {
    id: i32,
    name: String,
    password_hash: String,
}

/// Repository for staff accounts. Only rows with `is_staff` set are
/// visible through it.
pub struct StaffRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StaffRepository<'a> {
    /// Create a new staff repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a staff member with their password hash for login
    /// verification. Non-staff accounts never match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(CurrentStaff, String)>, RepositoryError> {
        let row: Option<StaffRow> = sqlx::query_as(
            "SELECT id, name, password_hash FROM users \
             WHERE email = $1 AND is_staff",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|row| {
            (
                CurrentStaff {
                    id: UserId::new(row.id),
                    name: row.name,
                },
                row.password_hash,
            )
        }))
    }
}
