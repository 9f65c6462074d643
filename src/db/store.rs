//! Storage port consumed by the synchronization layer.
//!
//! The port is an explicit, injected interface rather than an ambient
//! module-level store: the synchronization layer receives an
//! `Arc<dyn HabitStore>` in its constructor, and tests substitute their own
//! implementations (an in-memory database, or a failing store for rollback
//! coverage).

use crate::db::{habits, logs};
use crate::entities::{habit, habit_log};
use crate::errors::Result;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

/// CRUD contract over habits and completion logs.
///
/// Implementations must enforce the `(habit_id, date)` log uniqueness
/// constraint (a duplicate create resolves to the existing log) and must
/// cascade habit deletion to the habit's logs atomically.
#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Persists a new habit; the returned model carries the final id.
    async fn create_habit(&self, habit: habit::Model) -> Result<habit::Model>;
    /// Retrieves all habits, newest first.
    async fn list_habits(&self) -> Result<Vec<habit::Model>>;
    /// Overwrites an existing habit.
    async fn update_habit(&self, habit: habit::Model) -> Result<habit::Model>;
    /// Deletes a habit and all of its logs, all-or-nothing.
    async fn delete_habit(&self, id: &str) -> Result<()>;
    /// Persists a completion log; a duplicate `(habit_id, date)` resolves to
    /// the existing log.
    async fn create_log(&self, log: habit_log::Model) -> Result<habit_log::Model>;
    /// Finds the log for one habit on one `YYYY-MM-DD` date.
    async fn get_log(&self, habit_id: &str, date: &str) -> Result<Option<habit_log::Model>>;
    /// Retrieves logs, optionally scoped to one habit.
    async fn list_logs(&self, habit_id: Option<&str>) -> Result<Vec<habit_log::Model>>;
    /// Overwrites an existing log.
    async fn update_log(&self, log: habit_log::Model) -> Result<habit_log::Model>;
    /// Deletes a log by id.
    async fn delete_log(&self, id: &str) -> Result<()>;
}

/// `SQLite`-backed implementation of the storage port.
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an established database connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Access to the underlying connection, e.g. for schema setup.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl HabitStore for SqliteStore {
    async fn create_habit(&self, habit: habit::Model) -> Result<habit::Model> {
        habits::create_habit(&self.db, habit).await
    }

    async fn list_habits(&self) -> Result<Vec<habit::Model>> {
        habits::list_habits(&self.db).await
    }

    async fn update_habit(&self, habit: habit::Model) -> Result<habit::Model> {
        habits::update_habit(&self.db, habit).await
    }

    async fn delete_habit(&self, id: &str) -> Result<()> {
        habits::delete_habit(&self.db, id).await
    }

    async fn create_log(&self, log: habit_log::Model) -> Result<habit_log::Model> {
        logs::create_log(&self.db, log).await
    }

    async fn get_log(&self, habit_id: &str, date: &str) -> Result<Option<habit_log::Model>> {
        logs::get_log_by_habit_and_date(&self.db, habit_id, date).await
    }

    async fn list_logs(&self, habit_id: Option<&str>) -> Result<Vec<habit_log::Model>> {
        logs::list_logs(&self.db, habit_id).await
    }

    async fn update_log(&self, log: habit_log::Model) -> Result<habit_log::Model> {
        logs::update_log(&self.db, log).await
    }

    async fn delete_log(&self, id: &str) -> Result<()> {
        logs::delete_log(&self.db, id).await
    }
}
