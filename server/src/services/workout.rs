//! Workout documents: idempotent create, cursor-paged reads.
//!
//! DESIGN
//! ======
//! Workouts are immutable: there is no update path. The id comes from the
//! client's draft, so `INSERT ... ON CONFLICT (id) DO NOTHING` turns a
//! repeated finish into a read of the already stored document.

use records::{ExerciseRecord, NewWorkout, Workout};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum WorkoutError {
    #[error("workout not found: {0}")]
    NotFound(Uuid),
    #[error("workout id already used: {0}")]
    Conflict(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Query window for [`list_workouts`]. `limit: None` returns the full history.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkoutPage {
    pub limit: Option<i64>,
    pub before: Option<OffsetDateTime>,
}

impl WorkoutPage {
    fn effective_limit(self) -> Option<i64> {
        self.limit.map(|l| l.clamp(1, MAX_PAGE_SIZE))
    }
}

/// Renumber each exercise's sets `1..=k` in submitted order.
#[must_use]
pub fn normalize_exercises(mut exercises: Vec<ExerciseRecord>) -> Vec<ExerciseRecord> {
    for exercise in &mut exercises {
        for (i, set) in exercise.sets.iter_mut().enumerate() {
            set.set_number = u32::try_from(i + 1).unwrap_or(u32::MAX);
        }
    }
    exercises
}

fn workout_from_row(row: &sqlx::postgres::PgRow) -> Workout {
    let Json(exercises): Json<Vec<ExerciseRecord>> = row.get("exercises");
    Workout {
        id: row.get("id"),
        user_id: row.get("user_id"),
        duration: row.get("duration"),
        created_at: row.get("created_at"),
        exercises,
    }
}

/// Store a finished workout. Returns the stored document and whether this
/// call created it.
///
/// # Errors
///
/// Returns [`WorkoutError::Conflict`] when the id belongs to another user's
/// workout, or a database error.
pub async fn create_workout(pool: &PgPool, user_id: Uuid, new: NewWorkout) -> Result<(Workout, bool), WorkoutError> {
    let exercises = normalize_exercises(new.exercises);
    let inserted = sqlx::query(
        r"INSERT INTO workouts (id, user_id, duration, exercises)
          VALUES ($1, $2, $3, $4)
          ON CONFLICT (id) DO NOTHING
          RETURNING id, user_id, duration, exercises, created_at",
    )
    .bind(new.id)
    .bind(user_id)
    .bind(&new.duration)
    .bind(Json(&exercises))
    .fetch_optional(pool)
    .await?;

    if let Some(row) = inserted {
        return Ok((workout_from_row(&row), true));
    }

    match get_workout(pool, user_id, new.id).await {
        Ok(existing) => Ok((existing, false)),
        Err(WorkoutError::NotFound(id)) => Err(WorkoutError::Conflict(id)),
        Err(e) => Err(e),
    }
}

/// Read one workout owned by `user_id`.
///
/// # Errors
///
/// Returns [`WorkoutError::NotFound`] if absent or owned by someone else.
pub async fn get_workout(pool: &PgPool, user_id: Uuid, workout_id: Uuid) -> Result<Workout, WorkoutError> {
    let row = sqlx::query(
        "SELECT id, user_id, duration, exercises, created_at FROM workouts WHERE id = $1 AND user_id = $2",
    )
    .bind(workout_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(WorkoutError::NotFound(workout_id))?;
    Ok(workout_from_row(&row))
}

/// List workouts newest first, strictly older than `page.before` when set.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_workouts(pool: &PgPool, user_id: Uuid, page: WorkoutPage) -> Result<Vec<Workout>, WorkoutError> {
    let rows = sqlx::query(
        r"SELECT id, user_id, duration, exercises, created_at
          FROM workouts
          WHERE user_id = $1
            AND ($2::timestamptz IS NULL OR created_at < $2)
          ORDER BY created_at DESC, id DESC
          LIMIT $3",
    )
    .bind(user_id)
    .bind(page.before)
    .bind(page.effective_limit())
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(workout_from_row).collect())
}

#[cfg(test)]
#[path = "workout_test.rs"]
mod tests;
