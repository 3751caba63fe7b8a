//! Custom exercises owned by one user.
//!
//! Built-in entries live in `records::catalog`; only user-authored rows are
//! stored here. Names are unique per user case-insensitively so the merged
//! catalog never shows two entries for the same exercise.

use records::{CustomExercise, ExerciseDef};
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ExerciseError {
    #[error("exercise name, category and muscle are required")]
    MissingField,
    #[error("exercise already exists: {0}")]
    Duplicate(String),
    #[error("exercise not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Trim every field and reject blanks.
///
/// # Errors
///
/// Returns [`ExerciseError::MissingField`] when any field is blank.
pub fn clean_def(def: &ExerciseDef) -> Result<ExerciseDef, ExerciseError> {
    let cleaned = ExerciseDef::new(def.name.trim(), def.category.trim(), def.muscle.trim());
    if cleaned.name.is_empty() || cleaned.category.is_empty() || cleaned.muscle.is_empty() {
        return Err(ExerciseError::MissingField);
    }
    Ok(cleaned)
}

fn exercise_from_row(row: &sqlx::postgres::PgRow) -> CustomExercise {
    CustomExercise {
        id: row.get("id"),
        def: ExerciseDef { name: row.get("name"), category: row.get("category"), muscle: row.get("muscle") },
    }
}

/// List the user's custom exercises alphabetically.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_exercises(pool: &PgPool, user_id: Uuid) -> Result<Vec<CustomExercise>, ExerciseError> {
    let rows = sqlx::query(
        "SELECT id, name, category, muscle FROM custom_exercises WHERE user_id = $1 ORDER BY lower(name)",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(exercise_from_row).collect())
}

/// Store a new custom exercise.
///
/// # Errors
///
/// Returns validation errors, [`ExerciseError::Duplicate`] when the user
/// already has an exercise with that name, or a database error.
pub async fn create_exercise(pool: &PgPool, user_id: Uuid, def: &ExerciseDef) -> Result<CustomExercise, ExerciseError> {
    let def = clean_def(def)?;
    let row = sqlx::query(
        r"INSERT INTO custom_exercises (user_id, name, category, muscle)
          SELECT $1, $2, $3, $4
          WHERE NOT EXISTS (
              SELECT 1 FROM custom_exercises WHERE user_id = $1 AND lower(name) = lower($2)
          )
          RETURNING id, name, category, muscle",
    )
    .bind(user_id)
    .bind(&def.name)
    .bind(&def.category)
    .bind(&def.muscle)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(exercise_from_row).ok_or(ExerciseError::Duplicate(def.name))
}

/// Delete one of the user's custom exercises.
///
/// # Errors
///
/// Returns [`ExerciseError::NotFound`] if no such row belongs to the user.
pub async fn delete_exercise(pool: &PgPool, user_id: Uuid, exercise_id: Uuid) -> Result<(), ExerciseError> {
    let result = sqlx::query("DELETE FROM custom_exercises WHERE id = $1 AND user_id = $2")
        .bind(exercise_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ExerciseError::NotFound(exercise_id));
    }
    Ok(())
}

#[cfg(test)]
#[path = "exercise_test.rs"]
mod tests;
