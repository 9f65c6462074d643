//! Fixed configuration tables consumed by the core engines.
//!
//! The gamification rules are deliberately static: a fixed difficulty-to-
//! points mapping, an ascending level threshold table, a closed habit
//! category list and an ordered medal catalog. The engines read these
//! tables; nothing in the crate mutates them.

use serde::Serialize;

/// Cumulative points required to reach each level; level `n` unlocks at
/// `LEVEL_THRESHOLDS[n - 1]`.
pub const LEVEL_THRESHOLDS: [i64; 11] = [0, 100, 300, 600, 1000, 1500, 2100, 2800, 3600, 4500, 5500];

/// Habit categories offered by the surrounding UI. The final entry is the
/// catch-all sentinel that switches the category field to free-form text.
pub const HABIT_CATEGORIES: [&str; 10] = [
    "Fitness",
    "Health",
    "Work",
    "Learning",
    "Finances",
    "Hobbies",
    "Personal Growth",
    "Home",
    "Social",
    OTHER_CATEGORY,
];

/// Catch-all category sentinel.
pub const OTHER_CATEGORY: &str = "Other";

/// Maps an ordinal difficulty to its fixed point reward.
///
/// Returns `None` for anything outside 1..=3; no other combination of
/// difficulty and points is valid anywhere in the system.
#[must_use]
pub const fn points_for_difficulty(difficulty: i32) -> Option<i32> {
    match difficulty {
        1 => Some(10),
        2 => Some(20),
        3 => Some(30),
        _ => None,
    }
}

/// Static catalog entry describing one medal.
///
/// The criterion behind each id lives in `core::medals`; this struct only
/// carries display data for the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MedalDefinition {
    /// Stable criterion key
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short description of how to earn the medal
    pub description: &'static str,
    /// Icon reference consumed by the UI layer
    pub icon: &'static str,
    /// Category label for UI grouping
    pub group: &'static str,
}

/// Ordered medal catalog.
pub const MEDAL_DEFINITIONS: [MedalDefinition; 5] = [
    MedalDefinition {
        id: "beginner_steps",
        name: "First Steps",
        description: "Create your first habit and start your journey.",
        icon: "award",
        group: "Creation",
    },
    MedalDefinition {
        id: "perfect_week_daily",
        name: "Flawless Week",
        description: "Complete a daily habit 7 days in a row.",
        icon: "calendar-check",
        group: "Consistency",
    },
    MedalDefinition {
        id: "habit_collector_5",
        name: "Habit Collector",
        description: "Keep 5 habits active at the same time.",
        icon: "list-plus",
        group: "Creation",
    },
    MedalDefinition {
        id: "point_hoarder_1000",
        name: "Point Hoarder",
        description: "Reach a total of 1000 habit points.",
        icon: "star",
        group: "Points",
    },
    MedalDefinition {
        id: "streak_master_30",
        name: "Streak Master",
        description: "Keep any habit on a 30-day streak.",
        icon: "trending-up",
        group: "Consistency",
    },
];
