use super::*;
use crate::storage::MemoryStore;
use time::macros::datetime;

const T0: OffsetDateTime = datetime!(2024-05-01 18:00:00 UTC);

fn bench() -> ExerciseDef {
    ExerciseDef::new("Bench Press", "Chest", "Chest")
}

fn row() -> ExerciseDef {
    ExerciseDef::new("Barbell Row", "Back", "Back")
}

#[test]
fn load_without_persisted_copy_is_empty_and_inactive() {
    let store = MemoryStore::new();
    let drafts = DraftStore::load(&store);
    assert!(!drafts.is_active());
    assert!(drafts.draft().selected_exercises.is_empty());
    assert_eq!(drafts.draft().elapsed_seconds, 0);
    assert!(drafts.draft().start_time.is_none());
}

#[test]
fn active_draft_round_trips_through_storage() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::load(&store);
    drafts.add_exercise(&mut store, bench(), T0).expect("add");
    drafts.update_set(&mut store, "Bench Press", 0, SetField::Weight, "80").expect("weight");
    drafts.update_set(&mut store, "Bench Press", 0, SetField::Reps, "").expect("reps");

    let reloaded = DraftStore::load(&store);
    assert_eq!(reloaded.draft(), drafts.draft());
    assert_eq!(reloaded.draft().sets[0].sets[0], DraftSet { weight: "80".into(), reps: String::new() });
}

#[test]
fn inactive_draft_leaves_no_persisted_copy() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::load(&store);
    drafts.start(&mut store, T0).expect("start");
    assert!(store.contains(ACTIVE_WORKOUT_KEY));

    drafts.clear(&mut store).expect("clear");
    assert!(!store.contains(ACTIVE_WORKOUT_KEY));
    assert!(!DraftStore::load(&store).is_active());
}

#[test]
fn corrupt_persisted_copy_is_treated_as_absent() {
    let mut store = MemoryStore::new();
    store.set(ACTIVE_WORKOUT_KEY, "{\"active\": tru".into()).expect("set");
    assert!(!DraftStore::load(&store).is_active());
}

#[test]
fn adding_to_inactive_draft_activates_it() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::default();
    assert!(drafts.add_exercise(&mut store, bench(), T0).expect("add"));
    assert!(drafts.is_active());
    assert_eq!(drafts.draft().start_time, Some(T0));
    assert_ne!(drafts.draft().id, Uuid::nil());
    assert_eq!(drafts.draft().sets[0].sets.len(), 1);
}

#[test]
fn adding_same_exercise_twice_is_ignored() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::default();
    drafts.add_exercise(&mut store, bench(), T0).expect("add");
    assert!(!drafts.add_exercise(&mut store, bench(), T0).expect("add again"));
    assert_eq!(drafts.draft().selected_exercises.len(), 1);
}

#[test]
fn start_keeps_an_active_draft() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::default();
    drafts.add_exercise(&mut store, bench(), T0).expect("add");
    let id = drafts.draft().id;
    drafts.start(&mut store, T0 + time::Duration::minutes(5)).expect("start");
    assert_eq!(drafts.draft().id, id);
    assert_eq!(drafts.draft().selected_exercises.len(), 1);
}

#[test]
fn start_from_template_seeds_one_set_per_exercise() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::default();
    let template = Template { id: Uuid::new_v4(), name: "Pull".into(), exercises: vec![row(), bench()], created_at: T0 };
    drafts.start_from_template(&mut store, &template, T0).expect("start");

    let names: Vec<&str> = drafts.draft().selected_exercises.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Barbell Row", "Bench Press"]);
    assert!(drafts.draft().sets.iter().all(|s| s.sets.len() == 1));
    assert!(store.contains(ACTIVE_WORKOUT_KEY));
}

#[test]
fn edits_to_unknown_targets_report_false() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::default();
    drafts.add_exercise(&mut store, bench(), T0).expect("add");
    assert!(!drafts.update_set(&mut store, "Squat", 0, SetField::Reps, "5").expect("update"));
    assert!(!drafts.update_set(&mut store, "Bench Press", 3, SetField::Reps, "5").expect("update"));
    assert!(!drafts.add_set(&mut store, "Squat").expect("add set"));
}

#[test]
fn remove_exercise_drops_its_sets() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::default();
    drafts.add_exercise(&mut store, bench(), T0).expect("add");
    drafts.add_exercise(&mut store, row(), T0).expect("add");
    assert!(drafts.remove_exercise(&mut store, "Bench Press").expect("remove"));
    assert_eq!(drafts.draft().selected_exercises, vec![row()]);
    assert_eq!(drafts.draft().sets.len(), 1);
    assert!(!drafts.remove_exercise(&mut store, "Bench Press").expect("remove again"));
}

#[test]
fn tick_recomputes_elapsed_from_start() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::default();
    drafts.start(&mut store, T0).expect("start");
    assert_eq!(drafts.tick(&mut store, T0 + time::Duration::seconds(95)).expect("tick"), 95);
    assert_eq!(DraftStore::load(&store).draft().elapsed_seconds, 95);
    // A clock that went backwards never yields a negative duration.
    assert_eq!(drafts.tick(&mut store, T0 - time::Duration::seconds(10)).expect("tick"), 0);
}

#[test]
fn tick_on_inactive_draft_is_a_no_op() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::default();
    assert_eq!(drafts.tick(&mut store, T0).expect("tick"), 0);
    assert!(!store.contains(ACTIVE_WORKOUT_KEY));
}

#[test]
fn new_workout_preserves_order_and_numbers_sets() {
    let mut store = MemoryStore::new();
    let mut drafts = DraftStore::default();
    drafts.add_exercise(&mut store, row(), T0).expect("add");
    drafts.add_exercise(&mut store, bench(), T0).expect("add");
    drafts.add_set(&mut store, "Bench Press").expect("set");
    drafts.add_set(&mut store, "Bench Press").expect("set");
    drafts.update_set(&mut store, "Bench Press", 2, SetField::Weight, "100").expect("edit");
    drafts.tick(&mut store, T0 + time::Duration::seconds(3_725)).expect("tick");

    let new = drafts.to_new_workout();
    assert_eq!(new.id, drafts.draft().id);
    assert_eq!(new.duration, "01:02:05");
    assert_eq!(new.exercises.len(), 2);
    assert_eq!(new.exercises[0].name, "Barbell Row");
    assert_eq!(new.exercises[0].sets.len(), 1);
    let numbers: Vec<u32> = new.exercises[1].sets.iter().map(|s| s.set_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(new.exercises[1].sets[2].weight, "100");
}
