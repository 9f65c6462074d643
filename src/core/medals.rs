//! Achievement engine - evaluates the medal catalog against current state.
//!
//! Every criterion is a pure predicate over the habit and log collections;
//! the engine has no memory of prior evaluations. Achievement timestamps are
//! therefore recomputed on every read: a satisfied medal is stamped with the
//! moment of evaluation, not the moment the criterion was first met.

use crate::config::catalog::{MEDAL_DEFINITIONS, MedalDefinition};
use crate::core::stats::{calculate_longest_streak, calculate_points};
use crate::entities::habit::Frequency;
use crate::entities::{habit, habit_log};
use serde::Serialize;

/// A medal definition together with its achievement timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Medal {
    /// The static catalog entry
    #[serde(flatten)]
    pub definition: MedalDefinition,
    /// Epoch milliseconds of the evaluation that found the criterion
    /// satisfied
    pub achieved_at: i64,
}

/// Evaluates a single medal criterion against the current state.
///
/// Criteria are keyed by definition id; unknown ids evaluate false.
#[must_use]
pub fn check_medal_achievement(
    definition: &MedalDefinition,
    habits: &[habit::Model],
    logs: &[habit_log::Model],
) -> bool {
    match definition.id {
        // Create the first habit
        "beginner_steps" => !habits.is_empty(),
        // Complete any daily habit 7 days in a row
        "perfect_week_daily" => habits.iter().any(|habit| {
            habit.frequency == Frequency::Daily && calculate_longest_streak(habit, logs) >= 7
        }),
        // Keep 5 habits active
        "habit_collector_5" => habits.len() >= 5,
        // Accumulate 1000 points
        "point_hoarder_1000" => calculate_points(logs, habits) >= 1000,
        // Keep any habit, any frequency, on a 30-unit streak
        "streak_master_30" => habits
            .iter()
            .any(|habit| calculate_longest_streak(habit, logs) >= 30),
        _ => false,
    }
}

/// Evaluates the whole catalog and returns only the satisfied medals, each
/// stamped with `now_ms`.
///
/// Callers needing the full catalog with achieved/unachieved status must
/// merge this against [`MEDAL_DEFINITIONS`] themselves.
#[must_use]
pub fn get_achieved_medals(
    habits: &[habit::Model],
    logs: &[habit_log::Model],
    now_ms: i64,
) -> Vec<Medal> {
    MEDAL_DEFINITIONS
        .iter()
        .filter(|definition| check_medal_achievement(definition, habits, logs))
        .map(|&definition| Medal {
            definition,
            achieved_at: now_ms,
        })
        .collect()
}
