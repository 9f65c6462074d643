//! Database configuration module for `HabitZen`.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Tables are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL. On top of the generated
//! tables it creates the unique `(habit_id, date)` index that backs the
//! one-log-per-day invariant.

use crate::entities::{Habit, HabitLog, habit_log};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Name of the unique index enforcing one log per `(habit_id, date)` pair.
pub const LOG_UNIQUENESS_INDEX: &str = "idx_habit_logs_habit_id_date";

/// Gets the database URL from environment variable or returns the default
/// `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back
/// to a local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/habitzen.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the
/// `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is
/// set. This function handles connection errors and provides a clean
/// interface for database access throughout the application.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation
/// from entity definitions, plus the `(habit_id, date)` unique index.
///
/// Safe to call on every startup: both the tables and the index are created
/// with `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut habit_table = schema.create_table_from_entity(Habit);
    habit_table.if_not_exists();
    let mut habit_log_table = schema.create_table_from_entity(HabitLog);
    habit_log_table.if_not_exists();

    db.execute(builder.build(&habit_table)).await?;
    db.execute(builder.build(&habit_log_table)).await?;

    // A day is either completed or not; the statistics code never has to
    // deduplicate same-day completions.
    let uniqueness = Index::create()
        .if_not_exists()
        .name(LOG_UNIQUENESS_INDEX)
        .table(HabitLog)
        .col(habit_log::Column::HabitId)
        .col(habit_log::Column::Date)
        .unique()
        .to_owned();
    db.execute(builder.build(&uniqueness)).await?;

    Ok(())
}
