//! Profile edits and account deletion.
//!
//! DESIGN
//! ======
//! Deletion is gated by a one-time reauthentication ticket. The ticket is
//! consumed inside the same transaction that removes the user's documents,
//! so a bad or expired ticket deletes nothing and a failure mid-cascade
//! rolls everything back. Picture objects live outside the database and are
//! removed after commit; a leftover object is logged, never fatal.

use records::User;
use sqlx::PgPool;
use uuid::Uuid;

use crate::services::session::{self, TicketKind, USER_COLUMNS, user_from_row};
use crate::services::storage::{self, ImageKind, ObjectStore, StorageError};

pub const MAX_NAME_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("display name must be 1-{MAX_NAME_LEN} characters")]
    InvalidName,
    #[error("reauthentication required")]
    ReauthRequired,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Rows removed by [`delete_account`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletedCounts {
    pub workouts: u64,
    pub exercises: u64,
    pub templates: u64,
}

/// Public URL for a stored picture. The content tag busts client caches when
/// the picture is replaced under the same key.
#[must_use]
pub fn picture_url(public_base_url: &str, key: &str, tag: &str) -> String {
    format!("{public_base_url}/uploads/{key}?v={tag}")
}

fn clean_name(name: &str) -> Result<&str, AccountError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AccountError::InvalidName);
    }
    Ok(trimmed)
}

/// # Errors
///
/// Returns [`AccountError::InvalidName`], [`AccountError::NotFound`], or a
/// database error.
pub async fn update_name(pool: &PgPool, user_id: Uuid, name: &str) -> Result<User, AccountError> {
    let name = clean_name(name)?;
    let sql = format!(
        "WITH u AS (UPDATE users SET name = $2 WHERE id = $1 RETURNING *)
         SELECT {USER_COLUMNS} FROM u"
    );
    let row = sqlx::query(&sql)
        .bind(user_id)
        .bind(name)
        .fetch_optional(pool)
        .await?
        .ok_or(AccountError::NotFound)?;
    Ok(user_from_row(&row))
}

/// Store a new profile picture and point the user's avatar at it.
///
/// # Errors
///
/// Returns upload validation errors, storage failures, or a database error.
pub async fn set_picture(
    pool: &PgPool,
    store: &dyn ObjectStore,
    public_base_url: &str,
    max_bytes: usize,
    user_id: Uuid,
    bytes: &[u8],
) -> Result<User, AccountError> {
    let kind = storage::validate_picture(bytes, max_bytes)?;
    let key = storage::picture_key(user_id, kind);
    store.put(&key, bytes).await?;

    for other in ImageKind::ALL.into_iter().filter(|k| *k != kind) {
        store.delete(&storage::picture_key(user_id, other)).await?;
    }

    let url = picture_url(public_base_url, &key, &storage::content_tag(bytes));
    let sql = format!(
        "WITH u AS (UPDATE users SET avatar_url = $2 WHERE id = $1 RETURNING *)
         SELECT {USER_COLUMNS} FROM u"
    );
    let row = sqlx::query(&sql)
        .bind(user_id)
        .bind(&url)
        .fetch_optional(pool)
        .await?
        .ok_or(AccountError::NotFound)?;

    tracing::info!(%user_id, %key, size = bytes.len(), "profile picture replaced");
    Ok(user_from_row(&row))
}

/// Delete the account and everything it owns.
///
/// # Errors
///
/// Returns [`AccountError::ReauthRequired`] when the ticket is missing,
/// expired, or belongs to another user. Nothing is deleted in that case.
pub async fn delete_account(
    pool: &PgPool,
    store: &dyn ObjectStore,
    user_id: Uuid,
    reauth_ticket: &str,
) -> Result<DeletedCounts, AccountError> {
    let mut tx = pool.begin().await?;

    let consumed = session::consume_ticket(&mut *tx, TicketKind::Reauth, reauth_ticket, Some(user_id)).await?;
    if consumed.is_none() {
        return Err(AccountError::ReauthRequired);
    }

    let workouts = sqlx::query("DELETE FROM workouts WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let exercises = sqlx::query("DELETE FROM custom_exercises WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let templates = sqlx::query("DELETE FROM templates WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    // Sessions and tickets cascade from the user row.
    let removed = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if removed == 0 {
        return Err(AccountError::NotFound);
    }

    tx.commit().await?;

    for kind in ImageKind::ALL {
        let key = storage::picture_key(user_id, kind);
        if let Err(e) = store.delete(&key).await {
            tracing::warn!(error = %e, %user_id, %key, "account: picture cleanup failed");
        }
    }

    let counts = DeletedCounts { workouts, exercises, templates };
    tracing::info!(%user_id, ?counts, "account deleted");
    Ok(counts)
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
