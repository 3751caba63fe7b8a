//! The hosted-backend seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything the client needs from the server (identity, workout, exercise
//! and template documents, profile picture, account deletion) goes through
//! this trait. State objects and workflows depend on `&dyn Backend` only, so
//! tests substitute an in-memory fake.

use async_trait::async_trait;
use records::{CustomExercise, ExerciseDef, NewWorkout, Template, TemplateInput, User, Workout};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ClientError;
use crate::state::session::Session;

#[async_trait]
pub trait Backend: Send + Sync {
    // identity

    async fn register(&self, email: &str, password: &str) -> Result<Session, ClientError>;
    async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError>;
    async fn logout(&self) -> Result<(), ClientError>;
    async fn me(&self) -> Result<User, ClientError>;
    /// Re-check the password; returns a one-time ticket for destructive actions.
    async fn reauthenticate(&self, password: &str) -> Result<String, ClientError>;
    /// One-time ticket for the live websocket.
    async fn ws_ticket(&self) -> Result<String, ClientError>;

    // workouts

    /// Idempotent by `workout.id`: a repeat returns the stored document.
    async fn create_workout(&self, workout: &NewWorkout) -> Result<Workout, ClientError>;
    /// `Ok(None)` when no workout with this id exists for the user.
    async fn get_workout(&self, id: Uuid) -> Result<Option<Workout>, ClientError>;
    /// Newest first; `before` is an exclusive `created_at` cursor.
    async fn list_workouts(
        &self,
        limit: Option<u32>,
        before: Option<OffsetDateTime>,
    ) -> Result<Vec<Workout>, ClientError>;

    /// Full history, newest first.
    async fn list_all_workouts(&self) -> Result<Vec<Workout>, ClientError> {
        self.list_workouts(None, None).await
    }

    // exercises

    async fn list_exercises(&self) -> Result<Vec<CustomExercise>, ClientError>;
    async fn create_exercise(&self, def: &ExerciseDef) -> Result<CustomExercise, ClientError>;
    async fn delete_exercise(&self, id: Uuid) -> Result<(), ClientError>;

    // templates

    async fn list_templates(&self) -> Result<Vec<Template>, ClientError>;
    async fn get_template(&self, id: Uuid) -> Result<Template, ClientError>;
    async fn create_template(&self, input: &TemplateInput) -> Result<Template, ClientError>;
    async fn update_template(&self, id: Uuid, input: &TemplateInput) -> Result<Template, ClientError>;
    async fn delete_template(&self, id: Uuid) -> Result<(), ClientError>;

    // account

    async fn update_name(&self, name: &str) -> Result<User, ClientError>;
    async fn upload_picture(&self, bytes: Vec<u8>) -> Result<User, ClientError>;
    /// Requires a ticket from [`Backend::reauthenticate`].
    async fn delete_account(&self, reauth_ticket: &str) -> Result<(), ClientError>;
}
