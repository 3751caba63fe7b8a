//! In-memory `Backend` for workflow and state tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use records::{CustomExercise, ExerciseDef, NewWorkout, Template, TemplateInput, User, Workout};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ClientError;
use crate::net::backend::Backend;
use crate::state::session::Session;

pub(crate) const PASSWORD: &str = "correct-horse";

#[derive(Default)]
pub(crate) struct FakeData {
    pub workouts: Vec<Workout>,
    pub exercises: Vec<CustomExercise>,
    pub templates: Vec<Template>,
    pub tickets: Vec<String>,
    pub calls: HashMap<&'static str, usize>,
    /// Next `create_workout` fails with a 503.
    pub fail_create: bool,
    /// Every `get_workout` fails with a 503.
    pub fail_get: bool,
    /// Next `delete_account` fails after the ticket check.
    pub fail_delete: bool,
    pub deleted: bool,
    /// Clock used for `created_at` stamps; advances one minute per workout.
    pub clock: Option<OffsetDateTime>,
}

pub(crate) struct FakeBackend {
    pub user: User,
    data: Mutex<FakeData>,
}

fn unavailable() -> ClientError {
    ClientError::Status { status: 503, message: "backend unavailable".into() }
}

fn not_found() -> ClientError {
    ClientError::Status { status: 404, message: "not found".into() }
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        let user = User {
            id: Uuid::new_v4(),
            email: Some("lifter@example.com".into()),
            name: "lifter".into(),
            avatar_url: None,
            auth_method: "password".into(),
        };
        Self { user, data: Mutex::new(FakeData::default()) }
    }

    pub(crate) fn data(&self) -> MutexGuard<'_, FakeData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn calls(&self, name: &str) -> usize {
        self.data().calls.get(name).copied().unwrap_or(0)
    }

    fn record(&self, name: &'static str) -> MutexGuard<'_, FakeData> {
        let mut data = self.data();
        *data.calls.entry(name).or_default() += 1;
        data
    }

    fn session(&self) -> Session {
        Session { user: self.user.clone(), token: "fake-token".into() }
    }

    /// Seed a stored workout directly, newest last.
    pub(crate) fn seed_workout(&self, created_at: OffsetDateTime) -> Workout {
        let workout = Workout {
            id: Uuid::new_v4(),
            user_id: self.user.id,
            duration: "00:30:00".into(),
            created_at,
            exercises: vec![],
        };
        self.data().workouts.push(workout.clone());
        workout
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn register(&self, _email: &str, _password: &str) -> Result<Session, ClientError> {
        self.record("register");
        Ok(self.session())
    }

    async fn login(&self, _email: &str, password: &str) -> Result<Session, ClientError> {
        self.record("login");
        if password != PASSWORD {
            return Err(ClientError::Auth("invalid email or password".into()));
        }
        Ok(self.session())
    }

    async fn logout(&self) -> Result<(), ClientError> {
        self.record("logout");
        Ok(())
    }

    async fn me(&self) -> Result<User, ClientError> {
        self.record("me");
        Ok(self.user.clone())
    }

    async fn reauthenticate(&self, password: &str) -> Result<String, ClientError> {
        let mut data = self.record("reauthenticate");
        if password != PASSWORD {
            return Err(ClientError::Auth("invalid email or password".into()));
        }
        let ticket = Uuid::new_v4().to_string();
        data.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn ws_ticket(&self) -> Result<String, ClientError> {
        self.record("ws_ticket");
        Ok("ws-ticket".into())
    }

    async fn create_workout(&self, workout: &NewWorkout) -> Result<Workout, ClientError> {
        let mut data = self.record("create_workout");
        if data.fail_create {
            data.fail_create = false;
            return Err(unavailable());
        }
        if let Some(existing) = data.workouts.iter().find(|w| w.id == workout.id) {
            return Ok(existing.clone());
        }
        let now = data.clock.unwrap_or_else(OffsetDateTime::now_utc);
        data.clock = Some(now + time::Duration::minutes(1));
        let stored = Workout {
            id: workout.id,
            user_id: self.user.id,
            duration: workout.duration.clone(),
            created_at: now,
            exercises: workout.exercises.clone(),
        };
        data.workouts.push(stored.clone());
        Ok(stored)
    }

    async fn get_workout(&self, id: Uuid) -> Result<Option<Workout>, ClientError> {
        let data = self.record("get_workout");
        if data.fail_get {
            return Err(unavailable());
        }
        Ok(data.workouts.iter().find(|w| w.id == id).cloned())
    }

    async fn list_workouts(
        &self,
        limit: Option<u32>,
        before: Option<OffsetDateTime>,
    ) -> Result<Vec<Workout>, ClientError> {
        let data = self.record("list_workouts");
        let mut rows: Vec<Workout> = data
            .workouts
            .iter()
            .filter(|w| before.is_none_or(|b| w.created_at < b))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(rows)
    }

    async fn list_exercises(&self) -> Result<Vec<CustomExercise>, ClientError> {
        Ok(self.record("list_exercises").exercises.clone())
    }

    async fn create_exercise(&self, def: &ExerciseDef) -> Result<CustomExercise, ClientError> {
        let mut data = self.record("create_exercise");
        let created = CustomExercise { id: Uuid::new_v4(), def: def.clone() };
        data.exercises.push(created.clone());
        Ok(created)
    }

    async fn delete_exercise(&self, id: Uuid) -> Result<(), ClientError> {
        let mut data = self.record("delete_exercise");
        let before = data.exercises.len();
        data.exercises.retain(|e| e.id != id);
        if data.exercises.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<Template>, ClientError> {
        Ok(self.record("list_templates").templates.clone())
    }

    async fn get_template(&self, id: Uuid) -> Result<Template, ClientError> {
        let data = self.record("get_template");
        data.templates.iter().find(|t| t.id == id).cloned().ok_or_else(not_found)
    }

    async fn create_template(&self, input: &TemplateInput) -> Result<Template, ClientError> {
        let mut data = self.record("create_template");
        let created = Template {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            exercises: input.exercises.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        data.templates.push(created.clone());
        Ok(created)
    }

    async fn update_template(&self, id: Uuid, input: &TemplateInput) -> Result<Template, ClientError> {
        let mut data = self.record("update_template");
        let template = data.templates.iter_mut().find(|t| t.id == id).ok_or_else(not_found)?;
        template.name.clone_from(&input.name);
        template.exercises.clone_from(&input.exercises);
        Ok(template.clone())
    }

    async fn delete_template(&self, id: Uuid) -> Result<(), ClientError> {
        let mut data = self.record("delete_template");
        data.templates.retain(|t| t.id != id);
        Ok(())
    }

    async fn update_name(&self, name: &str) -> Result<User, ClientError> {
        self.record("update_name");
        Ok(User { name: name.to_owned(), ..self.user.clone() })
    }

    async fn upload_picture(&self, _bytes: Vec<u8>) -> Result<User, ClientError> {
        self.record("upload_picture");
        Ok(User { avatar_url: Some("http://localhost/uploads/pic.png?v=1".into()), ..self.user.clone() })
    }

    async fn delete_account(&self, reauth_ticket: &str) -> Result<(), ClientError> {
        let mut data = self.record("delete_account");
        let Some(pos) = data.tickets.iter().position(|t| t == reauth_ticket) else {
            return Err(ClientError::Status { status: 403, message: "reauthentication required".into() });
        };
        data.tickets.remove(pos);
        if data.fail_delete {
            data.fail_delete = false;
            return Err(unavailable());
        }
        data.workouts.clear();
        data.exercises.clear();
        data.templates.clear();
        data.deleted = true;
        Ok(())
    }
}
