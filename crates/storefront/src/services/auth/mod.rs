//! Customer authentication: registration and password login.

mod error;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use demitasse_core::Phone;

pub use error::AuthError;

use crate::db::UserRepository;
use crate::models::User;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum length accepted for names and emails.
pub const MAX_FIELD_LENGTH: usize = 255;

/// Authentication operations.
pub struct AuthService<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` naming the first failed validation, or
    /// `AuthError::AlreadyRegistered` when the email or phone is taken.
    pub async fn register(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() || name.len() > MAX_FIELD_LENGTH {
            return Err(AuthError::InvalidName(format!(
                "name must be between 1 and {MAX_FIELD_LENGTH} characters"
            )));
        }
        let phone = Phone::parse(phone)?;
        let email = normalize_email(email)?;
        validate_password(password)?;

        let hash = hash_password(password)?;
        let user = UserRepository::new(self.pool)
            .create(name, &phone, &email, &hash)
            .await?;
        Ok(user)
    }

    /// Verify email and password, returning the account on success.
    ///
    /// An unknown email and a wrong password produce the same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on failure to authenticate,
    /// or a wrapped repository error.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email)?;
        let Some((user, hash)) = UserRepository::new(self.pool)
            .find_credentials(&email)
            .await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &hash)?;
        Ok(user)
    }
}

/// Lowercase and sanity-check an email address.
fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let well_formed = email.len() <= MAX_FIELD_LENGTH
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if well_formed {
        Ok(email)
    } else {
        Err(AuthError::InvalidEmail(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases() {
        assert_eq!(
            normalize_email("Anna@Example.COM").unwrap(),
            "anna@example.com"
        );
    }

    #[test]
    fn test_normalize_email_rejects_junk() {
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("anna@nodot").is_err());
    }

    #[test]
    fn test_password_length_is_enforced() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }
}
