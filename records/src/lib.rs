//! Shared document model for workouts, exercises, and templates.
//!
//! This crate owns the JSON representation used by both `server` and
//! `client`. Set fields stay freeform text: weight and reps are whatever the
//! user typed, including empty strings.

pub mod catalog;
pub mod duration;

pub use catalog::{BUILT_IN, merge_catalog};
pub use duration::{DurationError, format_duration, parse_duration};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// IDENTITY
// =============================================================================

/// Authenticated account as exposed to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email, absent for identity-provider-only accounts.
    pub email: Option<String>,
    /// Display name.
    pub name: String,
    /// Public URL of the profile picture, if one was uploaded.
    pub avatar_url: Option<String>,
    /// How the session was established (`"password"` or `"github"`).
    pub auth_method: String,
}

// =============================================================================
// EXERCISES
// =============================================================================

/// Name/category/muscle triple shared by the catalog, custom exercises and
/// template entries.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExerciseDef {
    pub name: String,
    pub category: String,
    pub muscle: String,
}

impl ExerciseDef {
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>, muscle: impl Into<String>) -> Self {
        Self { name: name.into(), category: category.into(), muscle: muscle.into() }
    }
}

/// A user-authored exercise stored in the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomExercise {
    pub id: Uuid,
    #[serde(flatten)]
    pub def: ExerciseDef,
}

// =============================================================================
// WORKOUTS
// =============================================================================

/// One performed set. Both fields are unvalidated text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEntry {
    /// 1-based position within the parent exercise.
    pub set_number: u32,
    pub weight: String,
    pub reps: String,
}

/// Embedded record of one exercise's sets within a finished workout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub name: String,
    pub category: String,
    pub muscle: String,
    pub sets: Vec<SetEntry>,
}

/// A finished, immutable workout document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Elapsed time formatted as `HH:MM:SS`.
    pub duration: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub exercises: Vec<ExerciseRecord>,
}

/// Create-request for a workout. The id is generated client-side so that a
/// repeated submission of the same draft resolves to the same document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkout {
    pub id: Uuid,
    pub duration: String,
    pub exercises: Vec<ExerciseRecord>,
}

// =============================================================================
// TEMPLATES
// =============================================================================

/// Named, ordered list of exercises used to pre-populate a new workout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub exercises: Vec<ExerciseDef>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Create/replace body for a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInput {
    pub name: String,
    pub exercises: Vec<ExerciseDef>,
}

// =============================================================================
// LIVE EVENTS
// =============================================================================

/// Server push message on the live history channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "syscall", content = "data")]
pub enum LiveEvent {
    /// First message after upgrade.
    #[serde(rename = "session:connected")]
    Connected { user_id: Uuid },
    /// A workout was saved from any session of the same user.
    #[serde(rename = "workout:created")]
    WorkoutCreated(Workout),
    /// The account was deleted; all history is gone.
    #[serde(rename = "account:deleted")]
    AccountDeleted,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
