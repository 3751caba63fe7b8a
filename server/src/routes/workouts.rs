//! Workout document routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use records::{LiveEvent, NewWorkout, Workout};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::auth::AuthUser;
use super::{ApiError, api_error};
use crate::services::workout::{self, WorkoutError, WorkoutPage};
use crate::state::AppState;

pub(crate) fn workout_error_to_status(err: &WorkoutError) -> StatusCode {
    match err {
        WorkoutError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkoutError::Conflict(_) => StatusCode::CONFLICT,
        WorkoutError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn workout_error(err: WorkoutError) -> ApiError {
    api_error(workout_error_to_status(&err), &err)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    /// Exclusive cursor: only workouts created strictly before this instant.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub before: Option<OffsetDateTime>,
}

/// `GET /api/workouts?limit=&before=`: newest first.
pub async fn list_workouts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Workout>>, ApiError> {
    let page = WorkoutPage { limit: query.limit, before: query.before };
    let rows = workout::list_workouts(&state.pool, auth.user.id, page)
        .await
        .map_err(workout_error)?;
    Ok(Json(rows))
}

/// `POST /api/workouts`: store a finished workout. Replays of the same id
/// answer `200` with the stored document instead of `201`.
pub async fn create_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<NewWorkout>,
) -> Result<(StatusCode, Json<Workout>), ApiError> {
    let (stored, created) = workout::create_workout(&state.pool, auth.user.id, body)
        .await
        .map_err(workout_error)?;

    if !created {
        tracing::info!(workout_id = %stored.id, user_id = %auth.user.id, "workout replay ignored");
        return Ok((StatusCode::OK, Json(stored)));
    }

    let delivered = state.live.publish(auth.user.id, &LiveEvent::WorkoutCreated(stored.clone())).await;
    tracing::info!(
        workout_id = %stored.id,
        user_id = %auth.user.id,
        exercises = stored.exercises.len(),
        delivered,
        "workout stored"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /api/workouts/:id`
pub async fn get_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<Workout>, ApiError> {
    let stored = workout::get_workout(&state.pool, auth.user.id, workout_id)
        .await
        .map_err(workout_error)?;
    Ok(Json(stored))
}

#[cfg(test)]
#[path = "workouts_test.rs"]
mod tests;
