//! Email + password credentials.
//!
//! Registration, sign-in, and the password re-check that gates destructive
//! account actions. Hashes are Argon2id PHC strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use records::User;
use sqlx::PgPool;
use uuid::Uuid;

use crate::services::session::{USER_COLUMNS, user_from_row};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

fn name_from_email(email: &str) -> String {
    let local = email
        .split('@')
        .next()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("user");
    local.to_owned()
}

/// Hash a password into a PHC string.
///
/// # Errors
///
/// Returns [`CredentialError::Hash`] if Argon2 rejects its parameters.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Check a password against a stored PHC string. Malformed hashes never match.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Create a password account.
///
/// # Errors
///
/// Returns validation errors for bad input, [`CredentialError::EmailTaken`]
/// when the address already has an account, or a database error.
pub async fn register(pool: &PgPool, email: &str, password: &str) -> Result<User, CredentialError> {
    let normalized = normalize_email(email).ok_or(CredentialError::InvalidEmail)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::WeakPassword);
    }
    let password_hash = hash_password(password)?;

    let sql = format!(
        "WITH u AS (
             INSERT INTO users (email, name, password_hash)
             VALUES ($1, $2, $3)
             ON CONFLICT (email) DO NOTHING
             RETURNING *
         )
         SELECT {USER_COLUMNS} FROM u"
    );
    let row = sqlx::query(&sql)
        .bind(&normalized)
        .bind(name_from_email(&normalized))
        .bind(password_hash)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).ok_or(CredentialError::EmailTaken)
}

/// Verify email + password and return the account.
///
/// # Errors
///
/// Returns [`CredentialError::InvalidCredentials`] for an unknown email, an
/// account without a password, or a wrong password.
pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<User, CredentialError> {
    let normalized = normalize_email(email).ok_or(CredentialError::InvalidCredentials)?;
    let sql = format!("SELECT {USER_COLUMNS}, u.password_hash FROM users u WHERE u.email = $1");
    let row = sqlx::query(&sql)
        .bind(&normalized)
        .fetch_optional(pool)
        .await?
        .ok_or(CredentialError::InvalidCredentials)?;

    let stored: Option<String> = sqlx::Row::get(&row, "password_hash");
    match stored {
        Some(hash) if verify_password(password, &hash) => Ok(user_from_row(&row)),
        _ => Err(CredentialError::InvalidCredentials),
    }
}

/// Re-check the password of an already authenticated user.
///
/// # Errors
///
/// Returns [`CredentialError::InvalidCredentials`] on mismatch or when the
/// account has no password.
pub async fn recheck_password(pool: &PgPool, user_id: Uuid, password: &str) -> Result<(), CredentialError> {
    let stored: Option<Option<String>> = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match stored.flatten() {
        Some(hash) if verify_password(password, &hash) => Ok(()),
        _ => Err(CredentialError::InvalidCredentials),
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
