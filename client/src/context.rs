//! The single owner of client state.
//!
//! Every state object is loaded from the same `LocalStore` at start-up and
//! writes back through it. Views borrow fields directly; workflows take the
//! whole context so one call can update several objects consistently.

use uuid::Uuid;

use crate::error::ClientError;
use crate::state::draft::DraftStore;
use crate::state::history::HistoryState;
use crate::state::session::SessionState;
use crate::state::stats_cache::StatsCache;
use crate::state::theme::Theme;
use crate::state::timer::RestTimer;
use crate::storage::LocalStore;

#[derive(Debug)]
pub struct AppContext<S: LocalStore> {
    pub store: S,
    pub session: SessionState,
    pub draft: DraftStore,
    pub theme: Theme,
    pub history: HistoryState,
    pub stats: StatsCache,
    pub rest: RestTimer,
}

impl<S: LocalStore> AppContext<S> {
    /// Hydrate every state object from `store`.
    #[must_use]
    pub fn load(store: S) -> Self {
        Self {
            session: SessionState::load(&store),
            draft: DraftStore::load(&store),
            theme: Theme::load(&store),
            history: HistoryState::load(&store),
            stats: StatsCache::default(),
            rest: RestTimer::default(),
            store,
        }
    }

    /// Id of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotSignedIn`] without a session.
    pub fn user_id(&self) -> Result<Uuid, ClientError> {
        self.session.user().map(|u| u.id).ok_or(ClientError::NotSignedIn)
    }

    /// Session token to replay on backend requests, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
