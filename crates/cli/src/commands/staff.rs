//! Staff management command.

use super::{CommandError, connect};

/// Promote an existing account to staff.
///
/// # Errors
///
/// Returns a `CommandError` when the account does not exist or the
/// update fails.
pub async fn grant(email: &str) -> Result<(), CommandError> {
    let pool = connect().await?;
    let email = email.trim().to_lowercase();

    let result = sqlx::query("UPDATE users SET is_staff = TRUE WHERE email = $1")
        .bind(&email)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CommandError::Failed(format!(
            "no account with email '{email}'"
        )));
    }

    tracing::info!("Granted staff access to {email}");
    Ok(())
}
