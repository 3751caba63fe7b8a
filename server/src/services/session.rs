//! Session tokens and one-time tickets.
//!
//! ARCHITECTURE
//! ============
//! HTTP requests carry a long-lived session token. Two operations take a
//! one-time ticket instead, each with its own table and expiry:
//!
//! - websocket upgrade (`ws_tickets`, 30 seconds)
//! - account deletion (`reauth_tickets`, 5 minutes, issued only after a
//!   password re-check)
//!
//! Consuming a ticket is `DELETE ... RETURNING`, so it can succeed at most
//! once. A failed account deletion needs a fresh reauthentication.

use rand::Rng;
use records::User;
use sqlx::{PgExecutor, PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

/// Lowercase hex, two characters per byte.
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// 32 random bytes as hex. Used for session tokens and OAuth state.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

// =============================================================================
// USERS
// =============================================================================

/// Shared projection for every query that returns a [`User`].
pub(crate) const USER_COLUMNS: &str = r"u.id, u.email, u.name, u.avatar_url,
    CASE WHEN u.password_hash IS NULL AND u.github_id IS NOT NULL THEN 'github' ELSE 'password' END AS auth_method";

pub(crate) fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        avatar_url: row.get("avatar_url"),
        auth_method: row.get("auth_method"),
    }
}

// =============================================================================
// SESSIONS
// =============================================================================

/// Start a session for `user_id` lasting `ttl_days`. Returns the token.
pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_days: i64) -> Result<String, sqlx::Error> {
    let token = generate_token();
    let expires_at = OffsetDateTime::now_utc() + time::Duration::days(ttl_days);
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Resolve an unexpired session token to its user.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {USER_COLUMNS}
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token = $1 AND s.expires_at > now()"
    );
    let row = sqlx::query(&sql).bind(token).fetch_optional(pool).await?;
    Ok(row.as_ref().map(user_from_row))
}

pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

// =============================================================================
// TICKETS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    /// Authorizes one websocket upgrade.
    Live,
    /// Authorizes one account deletion.
    Reauth,
}

impl TicketKind {
    /// Expiry is set by the column default of each table.
    fn table(self) -> &'static str {
        match self {
            Self::Live => "ws_tickets",
            Self::Reauth => "reauth_tickets",
        }
    }
}

/// 16 random bytes as hex.
#[must_use]
pub(crate) fn generate_ticket() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Issue a ticket of `kind` for `user_id`.
pub async fn create_ticket(pool: &PgPool, kind: TicketKind, user_id: Uuid) -> Result<String, sqlx::Error> {
    let ticket = generate_ticket();
    let sql = format!("INSERT INTO {} (ticket, user_id) VALUES ($1, $2)", kind.table());
    sqlx::query(&sql).bind(&ticket).bind(user_id).execute(pool).await?;
    Ok(ticket)
}

/// Consume an unexpired ticket and return its owner.
///
/// With `owner` set, a ticket issued to anyone else is left untouched and
/// `None` is returned.
pub async fn consume_ticket<'e>(
    executor: impl PgExecutor<'e>,
    kind: TicketKind,
    ticket: &str,
    owner: Option<Uuid>,
) -> Result<Option<Uuid>, sqlx::Error> {
    let sql = format!(
        "DELETE FROM {}
         WHERE ticket = $1 AND expires_at > now() AND ($2::uuid IS NULL OR user_id = $2)
         RETURNING user_id",
        kind.table()
    );
    let row = sqlx::query(&sql)
        .bind(ticket)
        .bind(owner)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|r| r.get("user_id")))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
