//! Signed-in identity, persisted so every CLI invocation reuses the session.

use records::User;
use serde::{Deserialize, Serialize};

use crate::storage::{self, LocalStore, SESSION_KEY, StorageError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Default)]
pub struct SessionState {
    current: Option<Session>,
}

impl SessionState {
    #[must_use]
    pub fn load(store: &dyn LocalStore) -> Self {
        Self { current: storage::load_json(store, SESSION_KEY) }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    pub fn sign_in(&mut self, store: &mut dyn LocalStore, session: Session) -> Result<(), StorageError> {
        storage::save_json(store, SESSION_KEY, &session)?;
        self.current = Some(session);
        Ok(())
    }

    /// Replace the cached profile after an edit, keeping the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    pub fn update_user(&mut self, store: &mut dyn LocalStore, user: User) -> Result<(), StorageError> {
        let Some(session) = self.current.as_mut() else {
            return Ok(());
        };
        session.user = user;
        storage::save_json(store, SESSION_KEY, session)
    }

    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be removed.
    pub fn sign_out(&mut self, store: &mut dyn LocalStore) -> Result<(), StorageError> {
        self.current = None;
        store.remove(SESSION_KEY)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
