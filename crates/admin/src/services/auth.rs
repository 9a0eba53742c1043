//! Staff authentication for the admin dashboard.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sqlx::PgPool;
use thiserror::Error;

use crate::db::{RepositoryError, StaffRepository};
use crate::models::CurrentStaff;

/// Errors that can occur during staff authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password, unknown email, or not a staff account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Staff authentication operations.
pub struct AuthService<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Verify staff credentials.
    ///
    /// Unknown emails, customer accounts, and wrong passwords all produce
    /// the same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on failure to authenticate,
    /// or a wrapped repository error.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentStaff, AuthError> {
        let email = email.trim().to_lowercase();
        let Some((staff, hash)) = StaffRepository::new(self.pool)
            .find_credentials(&email)
            .await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &hash)?;
        Ok(staff)
    }
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
