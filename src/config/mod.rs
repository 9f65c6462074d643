/// Fixed gamification catalog tables (points mapping, level thresholds,
/// categories, medal definitions)
pub mod catalog;

/// Database configuration and connection management
pub mod database;
