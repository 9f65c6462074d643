//! Database access layer.
//!
//! Per-table query modules expose free functions over a `SeaORM` connection,
//! and `store` wraps them behind the object-safe [`HabitStore`] port the
//! synchronization layer consumes.

/// Habit table queries
pub mod habits;
/// Habit log table queries
pub mod logs;
/// Storage port and its sqlite-backed implementation
pub mod store;

pub use store::{HabitStore, SqliteStore};
