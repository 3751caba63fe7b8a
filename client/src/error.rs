//! Client error type.
//!
//! ERROR HANDLING
//! ==============
//! Every fallible client operation returns `ClientError`. The CLI renders it
//! with `Display`; nothing is retried automatically.

use crate::state::templates::ValidationError;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing session, rejected credentials, or failed reauthentication.
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not signed in")]
    NotSignedIn,
    #[error("no active workout")]
    NoActiveWorkout,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid session token header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("invalid timestamp: {0}")]
    Time(#[from] time::error::Format),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("live subscription failed: {0}")]
    Live(String),
}

impl ClientError {
    /// `true` for a 404 answer from the backend.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
