//! Paged workout history with a local snapshot and live merging.
//!
//! LIFECYCLE
//! =========
//! `load` seeds the list from the `liftbook_recent_workouts` snapshot so the
//! history view has something to show before the network answers.
//! `load_first_page` replaces it with the newest page and rewrites the
//! snapshot; `load_next_page` follows the `created_at` cursor. Pushed events
//! are merged by id, so a workout seen both in a page and on the live channel
//! appears once.

use records::{LiveEvent, Workout};
use time::OffsetDateTime;

use crate::error::ClientError;
use crate::net::backend::Backend;
use crate::storage::{self, LocalStore, RECENT_WORKOUTS_KEY, StorageError};

pub const PAGE_SIZE: u32 = 10;

/// History-relevant subset of the live channel.
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryEvent {
    Created(Workout),
    Cleared,
}

impl HistoryEvent {
    /// `None` for events that do not touch the history list.
    #[must_use]
    pub fn from_live(event: LiveEvent) -> Option<Self> {
        match event {
            LiveEvent::WorkoutCreated(workout) => Some(Self::Created(workout)),
            LiveEvent::AccountDeleted => Some(Self::Cleared),
            LiveEvent::Connected { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct HistoryState {
    workouts: Vec<Workout>,
    exhausted: bool,
    from_snapshot: bool,
}

fn page_len() -> usize {
    usize::try_from(PAGE_SIZE).unwrap_or(usize::MAX)
}

impl HistoryState {
    #[must_use]
    pub fn load(store: &dyn LocalStore) -> Self {
        match storage::load_json::<Vec<Workout>>(store, RECENT_WORKOUTS_KEY) {
            Some(workouts) => Self { workouts, exhausted: false, from_snapshot: true },
            None => Self::default(),
        }
    }

    /// Loaded workouts, newest first.
    #[must_use]
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// `true` until a page comes back shorter than [`PAGE_SIZE`].
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// `true` while the list still comes from the local snapshot.
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.from_snapshot
    }

    #[must_use]
    pub fn cursor(&self) -> Option<OffsetDateTime> {
        self.workouts.last().map(|w| w.created_at)
    }

    fn save_snapshot(&self, store: &mut dyn LocalStore) -> Result<(), StorageError> {
        let newest = &self.workouts[..self.workouts.len().min(page_len())];
        storage::save_json(store, RECENT_WORKOUTS_KEY, &newest)
    }

    /// Replace the list with the newest page. Returns the number loaded.
    ///
    /// # Errors
    ///
    /// Returns backend errors (the snapshot list is kept) or a storage error
    /// if the snapshot cannot be written.
    pub async fn load_first_page(
        &mut self,
        store: &mut dyn LocalStore,
        backend: &dyn Backend,
    ) -> Result<usize, ClientError> {
        let page = backend.list_workouts(Some(PAGE_SIZE), None).await?;
        let count = page.len();
        self.exhausted = count < page_len();
        self.workouts = page;
        self.from_snapshot = false;
        self.save_snapshot(store)?;
        Ok(count)
    }

    /// Append the page older than the current cursor. Returns the number of
    /// workouts added; `0` once the history is exhausted.
    ///
    /// # Errors
    ///
    /// Returns backend errors; the list is left unchanged.
    pub async fn load_next_page(&mut self, backend: &dyn Backend) -> Result<usize, ClientError> {
        if self.exhausted {
            return Ok(0);
        }
        let page = backend.list_workouts(Some(PAGE_SIZE), self.cursor()).await?;
        self.exhausted = page.len() < page_len();
        let before = self.workouts.len();
        for workout in page {
            if !self.contains(&workout) {
                self.workouts.push(workout);
            }
        }
        Ok(self.workouts.len() - before)
    }

    fn contains(&self, workout: &Workout) -> bool {
        self.workouts.iter().any(|w| w.id == workout.id)
    }

    /// Merge a pushed event. Returns whether the list changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be updated.
    pub fn apply_event(&mut self, store: &mut dyn LocalStore, event: HistoryEvent) -> Result<bool, StorageError> {
        match event {
            HistoryEvent::Created(workout) => {
                if self.contains(&workout) {
                    return Ok(false);
                }
                let at = self
                    .workouts
                    .iter()
                    .position(|w| w.created_at < workout.created_at)
                    .unwrap_or(self.workouts.len());
                self.workouts.insert(at, workout);
                self.save_snapshot(store)?;
                Ok(true)
            }
            HistoryEvent::Cleared => {
                let changed = !self.workouts.is_empty();
                self.workouts.clear();
                self.exhausted = true;
                store.remove(RECENT_WORKOUTS_KEY)?;
                Ok(changed)
            }
        }
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
