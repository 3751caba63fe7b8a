use super::*;
use crate::reorder::InsertPosition;
use crate::test_support::FakeBackend;

fn editor_with(names: &[&str]) -> TemplateEditor {
    let mut editor = TemplateEditor::new("Push Day");
    for name in names {
        editor.add_exercise(ExerciseDef::new(*name, "Strength", "Chest"));
    }
    editor
}

fn names(editor: &TemplateEditor) -> Vec<&str> {
    editor.exercises.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn blank_name_is_rejected_first() {
    let mut editor = TemplateEditor::new("   ");
    assert_eq!(editor.validate(), Err(ValidationError::MissingName));
    editor.name = "Legs".into();
    assert_eq!(editor.validate(), Err(ValidationError::NoExercises));
}

#[test]
fn validate_trims_name() {
    let mut editor = editor_with(&["Bench Press"]);
    editor.name = "  Push Day ".into();
    let input = editor.validate().expect("valid");
    assert_eq!(input.name, "Push Day");
    assert_eq!(input.exercises.len(), 1);
}

#[test]
fn move_exercise_uses_insertion_marker() {
    let mut editor = editor_with(&["A", "B", "C", "D", "E"]);
    assert!(editor.move_exercise(2, InsertionMarker { index: 0, position: InsertPosition::Before }));
    assert_eq!(names(&editor), vec!["C", "A", "B", "D", "E"]);
}

#[test]
fn drag_steps_move_only_on_drop() {
    let mut editor = editor_with(&["A", "B", "C"]);
    let marker = InsertionMarker { index: 2, position: InsertPosition::After };
    assert!(!editor.drag(GestureEvent::Start(0)));
    assert!(!editor.drag(GestureEvent::Hover(marker)));
    assert_eq!(editor.gesture().dragged(), Some(0));
    assert_eq!(names(&editor), vec!["A", "B", "C"]);
    assert!(editor.drag(GestureEvent::Drop));
    assert_eq!(names(&editor), vec!["B", "C", "A"]);
    assert_eq!(editor.gesture().dragged(), None);
}

#[test]
fn cancelled_drag_leaves_order_alone() {
    let mut editor = editor_with(&["A", "B", "C"]);
    editor.drag(GestureEvent::Start(2));
    editor.drag(GestureEvent::Hover(InsertionMarker { index: 0, position: InsertPosition::Before }));
    editor.drag(GestureEvent::Cancel);
    assert!(!editor.drag(GestureEvent::Drop));
    assert_eq!(names(&editor), vec!["A", "B", "C"]);
}

#[test]
fn move_exercise_replaces_pending_drag() {
    let mut editor = editor_with(&["A", "B", "C"]);
    editor.drag(GestureEvent::Start(0));
    assert!(editor.move_exercise(2, InsertionMarker { index: 0, position: InsertPosition::Before }));
    assert_eq!(names(&editor), vec!["C", "A", "B"]);
    assert_eq!(editor.gesture().dragged(), None);
}

#[test]
fn move_exercise_out_of_range_is_rejected() {
    let mut editor = editor_with(&["A", "B"]);
    assert!(!editor.move_exercise(5, InsertionMarker { index: 0, position: InsertPosition::Before }));
    assert_eq!(names(&editor), vec!["A", "B"]);
}

#[test]
fn remove_exercise_by_index() {
    let mut editor = editor_with(&["A", "B"]);
    assert_eq!(editor.remove_exercise(0).map(|e| e.name), Some("A".to_owned()));
    assert!(editor.remove_exercise(5).is_none());
    assert_eq!(names(&editor), vec!["B"]);
}

#[tokio::test]
async fn invalid_editor_never_reaches_backend() {
    let backend = FakeBackend::new();
    let mut editor = TemplateEditor::new("Empty");
    let err = editor.save(&backend).await.expect_err("no exercises");
    assert!(matches!(err, ClientError::Validation(ValidationError::NoExercises)));
    assert_eq!(backend.calls("create_template"), 0);
}

#[tokio::test]
async fn save_creates_then_updates() {
    let backend = FakeBackend::new();
    let mut editor = editor_with(&["Squat"]);

    let created = editor.save(&backend).await.expect("create");
    assert_eq!(editor.id, Some(created.id));

    editor.add_exercise(ExerciseDef::new("Lunge", "Strength", "Legs"));
    let updated = editor.save(&backend).await.expect("update");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.exercises.len(), 2);
    assert_eq!(backend.calls("create_template"), 1);
    assert_eq!(backend.calls("update_template"), 1);
}

#[test]
fn from_template_copies_fields() {
    let template = Template {
        id: Uuid::new_v4(),
        name: "Pull".into(),
        exercises: vec![ExerciseDef::new("Row", "Strength", "Back")],
        created_at: time::OffsetDateTime::UNIX_EPOCH,
    };
    let editor = TemplateEditor::from_template(&template);
    assert_eq!(editor.id, Some(template.id));
    assert_eq!(editor.exercises, template.exercises);
}
