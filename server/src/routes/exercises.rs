//! Custom exercise routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use records::{CustomExercise, ExerciseDef};
use uuid::Uuid;

use super::auth::AuthUser;
use super::{ApiError, api_error};
use crate::services::exercise::{self, ExerciseError};
use crate::state::AppState;

pub(crate) fn exercise_error_to_status(err: &ExerciseError) -> StatusCode {
    match err {
        ExerciseError::MissingField => StatusCode::BAD_REQUEST,
        ExerciseError::Duplicate(_) => StatusCode::CONFLICT,
        ExerciseError::NotFound(_) => StatusCode::NOT_FOUND,
        ExerciseError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn exercise_error(err: ExerciseError) -> ApiError {
    api_error(exercise_error_to_status(&err), &err)
}

/// `GET /api/exercises`: the user's custom exercises only.
pub async fn list_exercises(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<CustomExercise>>, ApiError> {
    let rows = exercise::list_exercises(&state.pool, auth.user.id)
        .await
        .map_err(exercise_error)?;
    Ok(Json(rows))
}

/// `POST /api/exercises`
pub async fn create_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ExerciseDef>,
) -> Result<(StatusCode, Json<CustomExercise>), ApiError> {
    let created = exercise::create_exercise(&state.pool, auth.user.id, &body)
        .await
        .map_err(exercise_error)?;
    tracing::info!(exercise_id = %created.id, user_id = %auth.user.id, name = %created.def.name, "custom exercise added");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `DELETE /api/exercises/:id`
pub async fn delete_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(exercise_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    exercise::delete_exercise(&state.pool, auth.user.id, exercise_id)
        .await
        .map_err(exercise_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "exercises_test.rs"]
mod tests;
