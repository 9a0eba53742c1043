//! User repository: account rows and credential lookup.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use demitasse_core::{Phone, UserId};

use super::RepositoryError;
use crate::models::User;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    phone: String,
    email: String,
    is_staff: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let phone = Phone::parse(&row.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("user {} has invalid phone: {e}", row.id))
        })?;
        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            phone,
            email: row.email,
            is_staff: row.is_staff,
            created_at: row.created_at,
        })
    }
}

const USER_SELECT: &str =
    "SELECT id, name, phone, email, is_staff, created_at FROM users";

/// Repository for user accounts.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or phone is
    /// already taken, or `RepositoryError::Database` on any other
    /// failure.
    pub async fn create(
        &self,
        name: &str,
        phone: &Phone,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (name, phone, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, phone, email, is_staff, created_at",
        )
        .bind(name)
        .bind(phone.as_str())
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                let field = if db.constraint() == Some("users_phone_key") {
                    "phone"
                } else {
                    "email"
                };
                RepositoryError::Conflict(format!("{field} is already taken"))
            }
            _ => RepositoryError::Database(e),
        })?;
        row.try_into()
    }

    /// Look up a user with their password hash for login verification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct CredentialRow {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT id, name, phone, email, is_staff, created_at, password_hash \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some((row.user.try_into()?, row.password_hash))),
            None => Ok(None),
        }
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("{USER_SELECT} WHERE id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }
}
