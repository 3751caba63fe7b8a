//! Aggregate statistics over a user's workout history.
//!
//! Pure functions; callers decide whether the input came from the cache or a
//! fresh fetch. Input order matters only for tie-breaking: the earlier
//! occurrence wins.

use std::collections::{BTreeSet, HashMap};

use records::{Workout, parse_duration};
use serde::Serialize;
use time::OffsetDateTime;

pub const TOP_EXERCISES: usize = 5;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WorkoutStats {
    pub total_workouts: usize,
    pub most_frequent_exercise: Option<String>,
    /// Mean over durations that parse; `None` if none do.
    pub average_duration_secs: Option<u64>,
    /// `(muscle, exercise occurrences)`, descending by count then name.
    pub muscle_distribution: Vec<(String, usize)>,
    /// Up to five `(exercise, occurrences)`, descending by count.
    pub top_exercises: Vec<(String, usize)>,
    /// Distinct exercise names, sorted, for the drill-down selector.
    pub exercise_names: Vec<String>,
}

/// Occurrence counts in first-seen order.
fn count_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    for item in items {
        if let Some(&i) = index.get(item) {
            order[i].1 += 1;
        } else {
            index.insert(item, order.len());
            order.push((item.to_owned(), 1));
        }
    }
    order
}

#[must_use]
pub fn compute_stats(workouts: &[Workout]) -> WorkoutStats {
    let exercise_names = || workouts.iter().flat_map(|w| w.exercises.iter().map(|e| e.name.as_str()));

    // Stable sort keeps first-seen order among equal counts.
    let mut by_exercise = count_in_order(exercise_names());
    by_exercise.sort_by(|a, b| b.1.cmp(&a.1));

    let mut muscle_distribution =
        count_in_order(workouts.iter().flat_map(|w| w.exercises.iter().map(|e| e.muscle.as_str())));
    muscle_distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let durations: Vec<u64> = workouts
        .iter()
        .filter_map(|w| match parse_duration(&w.duration) {
            Ok(secs) => Some(secs),
            Err(e) => {
                tracing::debug!(workout_id = %w.id, error = %e, "stats: skipping unparseable duration");
                None
            }
        })
        .collect();
    // Widened to u128: the sum of many u64 durations must not wrap.
    let total_secs: u128 = durations.iter().map(|&secs| u128::from(secs)).sum();
    let average_duration_secs = match u128::try_from(durations.len()) {
        Ok(n) if n > 0 => Some(u64::try_from(total_secs / n).unwrap_or(u64::MAX)),
        _ => None,
    };

    WorkoutStats {
        total_workouts: workouts.len(),
        most_frequent_exercise: by_exercise.first().map(|(name, _)| name.clone()),
        average_duration_secs,
        muscle_distribution,
        top_exercises: by_exercise.iter().take(TOP_EXERCISES).cloned().collect(),
        exercise_names: exercise_names()
            .map(str::to_owned)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    }
}

/// One workout's performance of a single exercise.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressPoint {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Heaviest set among those with a numeric weight.
    pub best_weight: Option<f64>,
    /// Sum over sets with numeric reps, saturating at `u64::MAX`.
    pub total_reps: u64,
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

/// Drill-down series for `exercise`, oldest first.
#[must_use]
pub fn exercise_progress(workouts: &[Workout], exercise: &str) -> Vec<ProgressPoint> {
    let mut points: Vec<ProgressPoint> = workouts
        .iter()
        .filter_map(|w| {
            if !w.exercises.iter().any(|e| e.name == exercise) {
                return None;
            }
            let sets: Vec<_> = w
                .exercises
                .iter()
                .filter(|e| e.name == exercise)
                .flat_map(|e| e.sets.iter())
                .collect();
            let best_weight = sets
                .iter()
                .filter_map(|s| parse_number::<f64>(&s.weight))
                .filter(|v| v.is_finite())
                .reduce(f64::max);
            let total_reps = sets
                .iter()
                .filter_map(|s| parse_number::<u64>(&s.reps))
                .fold(0u64, u64::saturating_add);
            Some(ProgressPoint { date: w.created_at, best_weight, total_reps })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
