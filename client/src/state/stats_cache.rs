//! Time-bounded local cache of a user's full workout history.
//!
//! DESIGN
//! ======
//! Two keys per user: the JSON payload and a sibling write timestamp. A hit
//! younger than the TTL skips the remote read entirely. Finishing a workout
//! calls `invalidate`, so the TTL only bounds staleness from writes made by
//! other sessions.

use records::Workout;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::ClientError;
use crate::net::backend::Backend;
use crate::storage::{self, LocalStore, StorageError, stats_key, stats_ts_key};

pub const STATS_TTL: Duration = Duration::minutes(5);

/// Workouts handed to the stats view, plus where they came from.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedHistory {
    pub workouts: Vec<Workout>,
    pub from_cache: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct StatsCache {
    ttl: Duration,
}

impl Default for StatsCache {
    fn default() -> Self {
        Self { ttl: STATS_TTL }
    }
}

fn unix_millis(at: OffsetDateTime) -> i64 {
    i64::try_from(at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

impl StatsCache {
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Cached workouts if both keys are present, parse, and are fresh.
    fn read_fresh(&self, store: &dyn LocalStore, user_id: Uuid, now: OffsetDateTime) -> Option<Vec<Workout>> {
        let written_ms: i64 = storage::load_json(store, &stats_ts_key(user_id))?;
        let age_ms = unix_millis(now).saturating_sub(written_ms);
        let ttl_ms = i64::try_from(self.ttl.whole_milliseconds()).unwrap_or(i64::MAX);
        if age_ms < 0 || age_ms >= ttl_ms {
            return None;
        }
        storage::load_json(store, &stats_key(user_id))
    }

    /// Return the history for `user_id`, from cache when fresh, else from the
    /// backend (overwriting both keys).
    ///
    /// # Errors
    ///
    /// Returns backend errors on a miss, or a storage error if the fresh
    /// payload cannot be cached.
    pub async fn load_or_fetch(
        &self,
        store: &mut dyn LocalStore,
        user_id: Uuid,
        backend: &dyn Backend,
        now: OffsetDateTime,
    ) -> Result<CachedHistory, ClientError> {
        if let Some(workouts) = self.read_fresh(store, user_id, now) {
            tracing::debug!(%user_id, count = workouts.len(), "stats cache hit");
            return Ok(CachedHistory { workouts, from_cache: true });
        }

        let workouts = backend.list_all_workouts().await?;
        storage::save_json(store, &stats_key(user_id), &workouts)?;
        storage::save_json(store, &stats_ts_key(user_id), &unix_millis(now))?;
        tracing::debug!(%user_id, count = workouts.len(), "stats cache refreshed");
        Ok(CachedHistory { workouts, from_cache: false })
    }

    /// Drop both cache keys for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if a key cannot be removed.
    pub fn invalidate(store: &mut dyn LocalStore, user_id: Uuid) -> Result<(), StorageError> {
        store.remove(&stats_key(user_id))?;
        store.remove(&stats_ts_key(user_id))
    }
}

#[cfg(test)]
#[path = "stats_cache_test.rs"]
mod tests;
