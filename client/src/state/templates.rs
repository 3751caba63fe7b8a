//! Template editing: an ordered exercise list with drag reordering, checked
//! locally before anything is written to the backend.

use records::{ExerciseDef, Template, TemplateInput};
use uuid::Uuid;

use crate::error::ClientError;
use crate::net::backend::Backend;
use crate::reorder::{GestureEvent, InsertionMarker, ReorderGesture};

/// Blocking problems reported before a save is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("template name is required")]
    MissingName,
    #[error("template needs at least one exercise")]
    NoExercises,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateEditor {
    /// `None` until the template has been created on the backend.
    pub id: Option<Uuid>,
    pub name: String,
    pub exercises: Vec<ExerciseDef>,
    /// In-progress drag over `exercises`.
    gesture: ReorderGesture,
}

impl TemplateEditor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    #[must_use]
    pub fn from_template(template: &Template) -> Self {
        Self {
            id: Some(template.id),
            name: template.name.clone(),
            exercises: template.exercises.clone(),
            gesture: ReorderGesture::default(),
        }
    }

    pub fn add_exercise(&mut self, def: ExerciseDef) {
        self.exercises.push(def);
    }

    /// Remove the entry at `index`; `None` if out of range.
    pub fn remove_exercise(&mut self, index: usize) -> Option<ExerciseDef> {
        (index < self.exercises.len()).then(|| self.exercises.remove(index))
    }

    /// Advance the drag over the exercise list. Returns `true` when a drop
    /// moved an entry.
    pub fn drag(&mut self, event: GestureEvent) -> bool {
        self.gesture.apply(event, &mut self.exercises)
    }

    #[must_use]
    pub fn gesture(&self) -> &ReorderGesture {
        &self.gesture
    }

    /// Move in one step: pick up `from`, hover `marker`, drop. Replaces any
    /// drag already in progress.
    pub fn move_exercise(&mut self, from: usize, marker: InsertionMarker) -> bool {
        self.drag(GestureEvent::Start(from));
        self.drag(GestureEvent::Hover(marker));
        self.drag(GestureEvent::Drop)
    }

    /// # Errors
    ///
    /// Returns the first blocking problem: a blank name, then an empty list.
    pub fn validate(&self) -> Result<TemplateInput, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.exercises.is_empty() {
            return Err(ValidationError::NoExercises);
        }
        Ok(TemplateInput { name: name.to_owned(), exercises: self.exercises.clone() })
    }

    /// Create or replace the template. Validation runs first, so an invalid
    /// editor never reaches the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] or a backend error.
    pub async fn save(&mut self, backend: &dyn Backend) -> Result<Template, ClientError> {
        let input = self.validate()?;
        let saved = match self.id {
            Some(id) => backend.update_template(id, &input).await?,
            None => backend.create_template(&input).await?,
        };
        self.id = Some(saved.id);
        self.name.clone_from(&saved.name);
        Ok(saved)
    }
}

#[cfg(test)]
#[path = "templates_test.rs"]
mod tests;
