//! Shared test utilities for `HabitZen`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::config::catalog::points_for_difficulty;
use crate::entities::habit::Frequency;
use crate::entities::{habit, habit_log};
use crate::errors::Result;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables and indexes
/// initialized. This is the standard setup for all persistence tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for building a calendar date in tests.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Epoch milliseconds at UTC midnight of the given day.
#[must_use]
pub fn date_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
}

/// Builds a habit model with sensible defaults.
///
/// # Defaults
/// * `name`: the id
/// * `category`: "Fitness"
/// * `color`: None
/// * `points`: derived from the difficulty mapping
#[must_use]
pub fn make_habit(
    id: &str,
    frequency: Frequency,
    difficulty: i32,
    created: NaiveDate,
) -> habit::Model {
    habit::Model {
        id: id.to_string(),
        name: id.to_string(),
        category: "Fitness".to_string(),
        difficulty,
        frequency,
        color: None,
        created_at: date_ms(created),
        points: points_for_difficulty(difficulty).unwrap_or(0),
    }
}

/// Builds a completion log for a habit on a day, without notes.
///
/// The log id encodes the `(habit_id, date)` pair so fixtures stay unique
/// under the one-log-per-day invariant.
#[must_use]
pub fn make_log(habit_id: &str, day: NaiveDate) -> habit_log::Model {
    habit_log::Model {
        id: format!("{habit_id}-{day}"),
        habit_id: habit_id.to_string(),
        date: day.format("%Y-%m-%d").to_string(),
        completed_at: date_ms(day),
        notes: None,
    }
}
