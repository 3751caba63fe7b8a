//! Active-workout draft.
//!
//! DESIGN
//! ======
//! The draft is the only mutable copy of an in-progress workout. Every
//! mutation ends in `sync`, which overwrites the persisted copy while the
//! draft is active and removes it otherwise. There is no diffing and no
//! merge: the last writer wins.
//!
//! The draft id doubles as the workout id at finish time, which is what makes
//! a repeated finish idempotent on the server.

use records::{ExerciseDef, ExerciseRecord, NewWorkout, SetEntry, Template, format_duration};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::storage::{self, ACTIVE_WORKOUT_KEY, LocalStore, StorageError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSet {
    pub weight: String,
    pub reps: String,
}

/// Sets entered so far for one selected exercise, keyed by exercise name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSets {
    pub exercise: String,
    pub sets: Vec<DraftSet>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDraft {
    pub id: Uuid,
    pub selected_exercises: Vec<ExerciseDef>,
    pub sets: Vec<ExerciseSets>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    pub elapsed_seconds: u64,
    pub active: bool,
}

impl WorkoutDraft {
    /// Sets entered for `exercise`, if it is selected.
    #[must_use]
    pub fn sets_for(&self, exercise: &str) -> Option<&ExerciseSets> {
        self.sets.iter().find(|s| s.exercise == exercise)
    }

    fn sets_for_mut(&mut self, exercise: &str) -> Option<&mut ExerciseSets> {
        self.sets.iter_mut().find(|s| s.exercise == exercise)
    }

    #[must_use]
    pub fn set_count(&self) -> usize {
        self.sets.iter().map(|s| s.sets.len()).sum()
    }
}

/// Which field of a set an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
}

/// Owner of the active-workout draft.
#[derive(Debug, Default)]
pub struct DraftStore {
    draft: WorkoutDraft,
}

impl DraftStore {
    /// Initialize from the persisted copy, else an empty inactive draft.
    #[must_use]
    pub fn load(store: &dyn LocalStore) -> Self {
        let draft = storage::load_json::<WorkoutDraft>(store, ACTIVE_WORKOUT_KEY).unwrap_or_default();
        Self { draft }
    }

    #[must_use]
    pub fn draft(&self) -> &WorkoutDraft {
        &self.draft
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.draft.active
    }

    fn sync(&self, store: &mut dyn LocalStore) -> Result<(), StorageError> {
        if self.draft.active {
            storage::save_json(store, ACTIVE_WORKOUT_KEY, &self.draft)
        } else {
            store.remove(ACTIVE_WORKOUT_KEY)
        }
    }

    fn activate(&mut self, now: OffsetDateTime) {
        if !self.draft.active {
            self.draft = WorkoutDraft {
                id: Uuid::new_v4(),
                start_time: Some(now),
                active: true,
                ..WorkoutDraft::default()
            };
        }
    }

    /// Begin a workout. An already active draft is kept as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be persisted.
    pub fn start(&mut self, store: &mut dyn LocalStore, now: OffsetDateTime) -> Result<(), StorageError> {
        self.activate(now);
        self.sync(store)
    }

    /// Replace the draft with a fresh one pre-populated from `template`, one
    /// empty set per exercise.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be persisted.
    pub fn start_from_template(
        &mut self,
        store: &mut dyn LocalStore,
        template: &Template,
        now: OffsetDateTime,
    ) -> Result<(), StorageError> {
        self.draft = WorkoutDraft::default();
        self.activate(now);
        for def in &template.exercises {
            self.push_exercise(def.clone());
        }
        self.sync(store)
    }

    fn push_exercise(&mut self, def: ExerciseDef) -> bool {
        if self.draft.sets_for(&def.name).is_some() {
            return false;
        }
        self.draft.sets.push(ExerciseSets { exercise: def.name.clone(), sets: vec![DraftSet::default()] });
        self.draft.selected_exercises.push(def);
        true
    }

    /// Append an exercise seeded with one empty set. Activates an inactive
    /// draft. Returns `false` if the exercise is already selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be persisted.
    pub fn add_exercise(
        &mut self,
        store: &mut dyn LocalStore,
        def: ExerciseDef,
        now: OffsetDateTime,
    ) -> Result<bool, StorageError> {
        self.activate(now);
        let added = self.push_exercise(def);
        self.sync(store)?;
        Ok(added)
    }

    /// # Errors
    ///
    /// Returns an error if the draft cannot be persisted.
    pub fn remove_exercise(&mut self, store: &mut dyn LocalStore, name: &str) -> Result<bool, StorageError> {
        let before = self.draft.selected_exercises.len();
        self.draft.selected_exercises.retain(|e| e.name != name);
        self.draft.sets.retain(|s| s.exercise != name);
        let removed = self.draft.selected_exercises.len() != before;
        self.sync(store)?;
        Ok(removed)
    }

    /// Overwrite one field of one set. Values are stored verbatim.
    /// Returns `false` if the exercise or index does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be persisted.
    pub fn update_set(
        &mut self,
        store: &mut dyn LocalStore,
        exercise: &str,
        index: usize,
        field: SetField,
        value: &str,
    ) -> Result<bool, StorageError> {
        let Some(set) = self
            .draft
            .sets_for_mut(exercise)
            .and_then(|s| s.sets.get_mut(index))
        else {
            return Ok(false);
        };
        match field {
            SetField::Weight => value.clone_into(&mut set.weight),
            SetField::Reps => value.clone_into(&mut set.reps),
        }
        self.sync(store)?;
        Ok(true)
    }

    /// Append an empty set. Returns `false` if the exercise is not selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be persisted.
    pub fn add_set(&mut self, store: &mut dyn LocalStore, exercise: &str) -> Result<bool, StorageError> {
        let Some(entry) = self.draft.sets_for_mut(exercise) else {
            return Ok(false);
        };
        entry.sets.push(DraftSet::default());
        self.sync(store)?;
        Ok(true)
    }

    /// Recompute elapsed seconds from the start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be persisted.
    pub fn tick(&mut self, store: &mut dyn LocalStore, now: OffsetDateTime) -> Result<u64, StorageError> {
        let Some(start) = self.draft.start_time.filter(|_| self.draft.active) else {
            return Ok(self.draft.elapsed_seconds);
        };
        let elapsed = u64::try_from((now - start).whole_seconds()).unwrap_or(0);
        if elapsed != self.draft.elapsed_seconds {
            self.draft.elapsed_seconds = elapsed;
            self.sync(store)?;
        }
        Ok(elapsed)
    }

    /// Reset to an empty draft and drop the persisted copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted copy cannot be removed.
    pub fn clear(&mut self, store: &mut dyn LocalStore) -> Result<(), StorageError> {
        self.draft = WorkoutDraft::default();
        self.sync(store)
    }

    /// Build the create request: exercise order preserved, sets numbered
    /// `1..=k` in entry order.
    #[must_use]
    pub fn to_new_workout(&self) -> NewWorkout {
        let exercises = self
            .draft
            .selected_exercises
            .iter()
            .map(|def| {
                let sets = self
                    .draft
                    .sets_for(&def.name)
                    .map(|s| s.sets.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .zip(1u32..)
                    .map(|(set, set_number)| SetEntry {
                        set_number,
                        weight: set.weight.clone(),
                        reps: set.reps.clone(),
                    })
                    .collect();
                ExerciseRecord {
                    name: def.name.clone(),
                    category: def.category.clone(),
                    muscle: def.muscle.clone(),
                    sets,
                }
            })
            .collect();

        NewWorkout {
            id: self.draft.id,
            duration: format_duration(self.draft.elapsed_seconds),
            exercises,
        }
    }
}

#[cfg(test)]
#[path = "draft_test.rs"]
mod tests;
