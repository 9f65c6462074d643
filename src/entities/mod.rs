//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod habit;
pub mod habit_log;

// Re-export specific types to avoid conflicts
pub use habit::{Column as HabitColumn, Entity as Habit, Model as HabitModel};
pub use habit_log::{Column as HabitLogColumn, Entity as HabitLog, Model as HabitLogModel};
