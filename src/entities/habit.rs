//! Habit entity - Represents a recurring user-defined activity.
//!
//! Each habit has a name, category, difficulty, target cadence and a fixed
//! point reward derived from its difficulty. Habits are identified by
//! client-generated UUIDs and keep their creation timestamp as the lower
//! bound for every "possible completion" calculation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Target cadence of a habit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One expected completion per calendar day
    #[sea_orm(string_value = "daily")]
    Daily,
    /// At least one completion per Monday-start week
    #[sea_orm(string_value = "weekly")]
    Weekly,
}

/// Habit database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habits")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Client-generated UUID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Human-readable name, non-empty, at most 100 characters
    pub name: String,
    /// Catalog category, or free-form text when the user picked "Other"
    pub category: String,
    /// Ordinal difficulty: 1 (easy), 2 (medium), 3 (hard)
    pub difficulty: i32,
    /// Target cadence
    pub frequency: Frequency,
    /// Optional display accent; no effect on statistics
    pub color: Option<String>,
    /// Creation timestamp in epoch milliseconds; immutable after creation
    pub created_at: i64,
    /// Point reward per completion, always consistent with `difficulty`
    /// under the fixed 1→10, 2→20, 3→30 mapping
    pub points: i32,
}

/// Defines relationships between Habit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One habit has many completion logs
    #[sea_orm(has_many = "super::habit_log::Entity")]
    HabitLogs,
}

impl Related<super::habit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HabitLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
