//! Plain-text rendering for each screen. Pure functions over client state so
//! the output can be tested without a terminal.

use client::state::draft::WorkoutDraft;
use client::stats::{ProgressPoint, WorkoutStats};
use records::{CustomExercise, ExerciseDef, Template, User, Workout, format_duration};
use time::OffsetDateTime;

fn date(at: OffsetDateTime) -> String {
    at.date().to_string()
}

#[must_use]
pub fn greeting(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("Welcome back, {}.", user.name),
        None => "Not signed in. Run `liftbook login` or `liftbook register`.".to_owned(),
    }
}

#[must_use]
pub fn profile(user: &User) -> String {
    format!(
        "name:    {}\nemail:   {}\nsign-in: {}\npicture: {}",
        user.name,
        user.email.as_deref().unwrap_or("-"),
        user.auth_method,
        user.avatar_url.as_deref().unwrap_or("-")
    )
}

/// Active draft: elapsed clock, then each exercise with numbered sets.
#[must_use]
pub fn draft(draft: &WorkoutDraft) -> String {
    if !draft.active {
        return "No active workout. Start one with `liftbook workout start`.".to_owned();
    }
    let mut out = format!(
        "Workout in progress ({}), {} exercise(s), {} set(s)",
        format_duration(draft.elapsed_seconds),
        draft.selected_exercises.len(),
        draft.set_count()
    );
    for def in &draft.selected_exercises {
        out.push_str(&format!("\n  {} [{}]", def.name, def.muscle));
        let sets = draft.sets_for(&def.name).map(|s| s.sets.as_slice()).unwrap_or_default();
        for (n, set) in sets.iter().enumerate() {
            let weight = if set.weight.is_empty() { "-" } else { &set.weight };
            let reps = if set.reps.is_empty() { "-" } else { &set.reps };
            out.push_str(&format!("\n    {}. {weight} x {reps}", n + 1));
        }
    }
    out
}

/// One history row: date, duration, exercise names.
#[must_use]
pub fn workout_line(workout: &Workout) -> String {
    let names: Vec<&str> = workout.exercises.iter().map(|e| e.name.as_str()).collect();
    let summary = if names.is_empty() { "(no exercises)".to_owned() } else { names.join(", ") };
    format!("{}  {}  {summary}", date(workout.created_at), workout.duration)
}

#[must_use]
pub fn stats(stats: &WorkoutStats) -> String {
    let average = stats.average_duration_secs.map_or_else(|| "-".to_owned(), format_duration);
    let mut out = format!(
        "Total workouts: {}\nMost frequent:  {}\nAverage length: {average}",
        stats.total_workouts,
        stats.most_frequent_exercise.as_deref().unwrap_or("-")
    );
    if !stats.muscle_distribution.is_empty() {
        out.push_str("\nMuscle groups:");
        for (muscle, count) in &stats.muscle_distribution {
            out.push_str(&format!("\n  {muscle:<12} {count}"));
        }
    }
    if !stats.top_exercises.is_empty() {
        out.push_str("\nTop exercises:");
        for (i, (name, count)) in stats.top_exercises.iter().enumerate() {
            out.push_str(&format!("\n  {}. {name} ({count})", i + 1));
        }
    }
    out
}

#[must_use]
pub fn progress(exercise: &str, points: &[ProgressPoint]) -> String {
    if points.is_empty() {
        return format!("No workouts with {exercise} yet.");
    }
    let mut out = format!("{exercise} progress:");
    for point in points {
        let best = point.best_weight.map_or_else(|| "-".to_owned(), |w| w.to_string());
        out.push_str(&format!("\n  {}  best {best}  reps {}", date(point.date), point.total_reps));
    }
    out
}

#[must_use]
pub fn template(template: &Template) -> String {
    let mut out = format!("{}  {}", template.id, template.name);
    for (i, def) in template.exercises.iter().enumerate() {
        out.push_str(&format!("\n  {}. {} [{}]", i + 1, def.name, def.muscle));
    }
    out
}

#[must_use]
pub fn catalog_line(def: &ExerciseDef, custom: Option<&CustomExercise>) -> String {
    match custom {
        Some(c) => format!("{:<24} {:<14} {:<10} {}", def.name, def.category, def.muscle, c.id),
        None => format!("{:<24} {:<14} {}", def.name, def.category, def.muscle),
    }
}

#[cfg(test)]
#[path = "screens_test.rs"]
mod tests;
