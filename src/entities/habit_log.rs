//! Habit log entity - Records that a habit was completed on a calendar date.
//!
//! The `(habit_id, date)` pair is unique: a day is either completed or not,
//! never double-counted. The uniqueness is enforced by a database index (see
//! `config::database::create_tables`) and relied upon by all statistics code.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Habit log database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habit_logs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Client-generated UUID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning habit id; many logs to one habit
    pub habit_id: String,
    /// Calendar day the habit was completed, `YYYY-MM-DD`, no time component
    pub date: String,
    /// Timestamp of the logging action in epoch milliseconds
    pub completed_at: i64,
    /// Optional free-text annotation, mutable independently of completion
    pub notes: Option<String>,
}

/// Defines relationships between HabitLog and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each log belongs to exactly one habit
    #[sea_orm(
        belongs_to = "super::habit::Entity",
        from = "Column::HabitId",
        to = "super::habit::Column::Id"
    )]
    Habit,
}

impl Related<super::habit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Habit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
