//! Workout templates: named, ordered exercise lists without sets.

use records::{ExerciseDef, Template, TemplateInput};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template name is required")]
    MissingName,
    #[error("template needs at least one exercise")]
    NoExercises,
    #[error("template not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Re-check what the client editor already validated.
///
/// # Errors
///
/// Returns [`TemplateError::MissingName`] for a blank name and
/// [`TemplateError::NoExercises`] for an empty list.
pub fn validate(input: &TemplateInput) -> Result<TemplateInput, TemplateError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(TemplateError::MissingName);
    }
    if input.exercises.is_empty() {
        return Err(TemplateError::NoExercises);
    }
    Ok(TemplateInput { name: name.to_owned(), exercises: input.exercises.clone() })
}

fn template_from_row(row: &sqlx::postgres::PgRow) -> Template {
    let Json(exercises): Json<Vec<ExerciseDef>> = row.get("exercises");
    Template { id: row.get("id"), name: row.get("name"), exercises, created_at: row.get("created_at") }
}

/// List templates in creation order.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_templates(pool: &PgPool, user_id: Uuid) -> Result<Vec<Template>, TemplateError> {
    let rows = sqlx::query(
        "SELECT id, name, exercises, created_at FROM templates WHERE user_id = $1 ORDER BY created_at, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(template_from_row).collect())
}

/// # Errors
///
/// Returns [`TemplateError::NotFound`] if absent or owned by someone else.
pub async fn get_template(pool: &PgPool, user_id: Uuid, template_id: Uuid) -> Result<Template, TemplateError> {
    let row = sqlx::query("SELECT id, name, exercises, created_at FROM templates WHERE id = $1 AND user_id = $2")
        .bind(template_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(TemplateError::NotFound(template_id))?;
    Ok(template_from_row(&row))
}

/// # Errors
///
/// Returns validation errors or a database error.
pub async fn create_template(pool: &PgPool, user_id: Uuid, input: &TemplateInput) -> Result<Template, TemplateError> {
    let input = validate(input)?;
    let row = sqlx::query(
        r"INSERT INTO templates (user_id, name, exercises)
          VALUES ($1, $2, $3)
          RETURNING id, name, exercises, created_at",
    )
    .bind(user_id)
    .bind(&input.name)
    .bind(Json(&input.exercises))
    .fetch_one(pool)
    .await?;
    Ok(template_from_row(&row))
}

/// Replace a template's name and exercise list wholesale.
///
/// # Errors
///
/// Returns validation errors, [`TemplateError::NotFound`], or a database error.
pub async fn update_template(
    pool: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
    input: &TemplateInput,
) -> Result<Template, TemplateError> {
    let input = validate(input)?;
    let row = sqlx::query(
        r"UPDATE templates
          SET name = $3, exercises = $4, updated_at = now()
          WHERE id = $1 AND user_id = $2
          RETURNING id, name, exercises, created_at",
    )
    .bind(template_id)
    .bind(user_id)
    .bind(&input.name)
    .bind(Json(&input.exercises))
    .fetch_optional(pool)
    .await?
    .ok_or(TemplateError::NotFound(template_id))?;
    Ok(template_from_row(&row))
}

/// # Errors
///
/// Returns [`TemplateError::NotFound`] if no such row belongs to the user.
pub async fn delete_template(pool: &PgPool, user_id: Uuid, template_id: Uuid) -> Result<(), TemplateError> {
    let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND user_id = $2")
        .bind(template_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(TemplateError::NotFound(template_id));
    }
    Ok(())
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
