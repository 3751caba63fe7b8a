//! Template routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use records::{Template, TemplateInput};
use uuid::Uuid;

use super::auth::AuthUser;
use super::{ApiError, api_error};
use crate::services::template::{self, TemplateError};
use crate::state::AppState;

pub(crate) fn template_error_to_status(err: &TemplateError) -> StatusCode {
    match err {
        TemplateError::MissingName | TemplateError::NoExercises => StatusCode::BAD_REQUEST,
        TemplateError::NotFound(_) => StatusCode::NOT_FOUND,
        TemplateError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn template_error(err: TemplateError) -> ApiError {
    api_error(template_error_to_status(&err), &err)
}

/// `GET /api/templates`
pub async fn list_templates(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<Template>>, ApiError> {
    let rows = template::list_templates(&state.pool, auth.user.id)
        .await
        .map_err(template_error)?;
    Ok(Json(rows))
}

/// `POST /api/templates`
pub async fn create_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<TemplateInput>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    let created = template::create_template(&state.pool, auth.user.id, &body)
        .await
        .map_err(template_error)?;
    tracing::info!(template_id = %created.id, user_id = %auth.user.id, "template created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/templates/{id}`
pub async fn get_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(template_id): Path<Uuid>,
) -> Result<Json<Template>, ApiError> {
    let row = template::get_template(&state.pool, auth.user.id, template_id)
        .await
        .map_err(template_error)?;
    Ok(Json(row))
}

/// `PUT /api/templates/{id}`: replace name and exercise order.
pub async fn update_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(template_id): Path<Uuid>,
    Json(body): Json<TemplateInput>,
) -> Result<Json<Template>, ApiError> {
    let row = template::update_template(&state.pool, auth.user.id, template_id, &body)
        .await
        .map_err(template_error)?;
    Ok(Json(row))
}

/// `DELETE /api/templates/{id}`
pub async fn delete_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(template_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    template::delete_template(&state.pool, auth.user.id, template_id)
        .await
        .map_err(template_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "templates_test.rs"]
mod tests;
