//! Bundled exercise catalog.
//!
//! The catalog is reference data compiled into the binary. User-authored
//! exercises are merged in at read time; nothing here is ever persisted.

use std::collections::BTreeMap;

use crate::{CustomExercise, ExerciseDef};

/// A catalog entry with static strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltInExercise {
    pub name: &'static str,
    pub category: &'static str,
    pub muscle: &'static str,
}

impl BuiltInExercise {
    #[must_use]
    pub fn to_def(self) -> ExerciseDef {
        ExerciseDef::new(self.name, self.category, self.muscle)
    }
}

const fn ex(name: &'static str, category: &'static str, muscle: &'static str) -> BuiltInExercise {
    BuiltInExercise { name, category, muscle }
}

pub const BUILT_IN: &[BuiltInExercise] = &[
    ex("Bench Press", "Barbell", "Chest"),
    ex("Incline Bench Press", "Barbell", "Chest"),
    ex("Dumbbell Fly", "Dumbbell", "Chest"),
    ex("Push Up", "Bodyweight", "Chest"),
    ex("Deadlift", "Barbell", "Back"),
    ex("Barbell Row", "Barbell", "Back"),
    ex("Pull Up", "Bodyweight", "Back"),
    ex("Lat Pulldown", "Cable", "Back"),
    ex("Seated Cable Row", "Cable", "Back"),
    ex("Squat", "Barbell", "Legs"),
    ex("Front Squat", "Barbell", "Legs"),
    ex("Leg Press", "Machine", "Legs"),
    ex("Romanian Deadlift", "Barbell", "Legs"),
    ex("Lunge", "Dumbbell", "Legs"),
    ex("Leg Curl", "Machine", "Legs"),
    ex("Calf Raise", "Machine", "Legs"),
    ex("Overhead Press", "Barbell", "Shoulders"),
    ex("Lateral Raise", "Dumbbell", "Shoulders"),
    ex("Face Pull", "Cable", "Shoulders"),
    ex("Barbell Curl", "Barbell", "Arms"),
    ex("Hammer Curl", "Dumbbell", "Arms"),
    ex("Tricep Pushdown", "Cable", "Arms"),
    ex("Skull Crusher", "Barbell", "Arms"),
    ex("Dip", "Bodyweight", "Arms"),
    ex("Plank", "Bodyweight", "Core"),
    ex("Hanging Leg Raise", "Bodyweight", "Core"),
    ex("Cable Crunch", "Cable", "Core"),
    ex("Running", "Cardio", "Full Body"),
    ex("Rowing Machine", "Cardio", "Full Body"),
];

/// Look up a built-in exercise by case-insensitive name.
#[must_use]
pub fn find_built_in(name: &str) -> Option<BuiltInExercise> {
    let needle = name.trim();
    BUILT_IN
        .iter()
        .copied()
        .find(|entry| entry.name.eq_ignore_ascii_case(needle))
}

/// Merge built-ins with user-authored exercises.
///
/// Names are compared case-insensitively; a custom exercise replaces a
/// built-in of the same name. Output is sorted by name.
#[must_use]
pub fn merge_catalog(custom: &[CustomExercise]) -> Vec<ExerciseDef> {
    let mut merged: BTreeMap<String, ExerciseDef> = BUILT_IN
        .iter()
        .map(|entry| (entry.name.to_ascii_lowercase(), entry.to_def()))
        .collect();

    for exercise in custom {
        let key = exercise.def.name.trim().to_ascii_lowercase();
        if key.is_empty() {
            continue;
        }
        merged.insert(key, exercise.def.clone());
    }

    merged.into_values().collect()
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
