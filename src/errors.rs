//! Unified error types and result handling for `HabitZen`.
//!
//! Errors fall into the taxonomy the rest of the crate relies on:
//! validation failures are rejected before any state is touched, not-found
//! lookups short-circuit mutations, and database failures are recoverable
//! signals that trigger rollback at the synchronization layer.

use thiserror::Error;

/// Unified error type for all `HabitZen` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any mutation was proposed.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// A lookup by id found nothing in the current state.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up ("habit", "habit log")
        entity: &'static str,
        /// The id that missed
        id: String,
    },

    /// Storage collaborator failure; recoverable, triggers rollback.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Export snapshot serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure while writing a backup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
