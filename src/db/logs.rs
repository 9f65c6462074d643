//! Habit log table queries - Handles all completion log persistence.
//!
//! The `(habit_id, date)` uniqueness constraint is treated as a feature
//! here: creating a log for an already-logged day resolves to the existing
//! row instead of failing, so "already completed" is a benign signal for
//! callers.

use crate::entities::{HabitLog, habit_log};
use crate::errors::{Error, Result};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Inserts a completion log, resolving duplicates to the existing row.
///
/// If a log for the model's `(habit_id, date)` pair already exists it is
/// returned as-is and nothing is written; the unique index makes the
/// check-then-insert race safe as well.
pub async fn create_log<C>(db: &C, log: habit_log::Model) -> Result<habit_log::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_log_by_habit_and_date(db, &log.habit_id, &log.date).await? {
        debug!(
            habit_id = %log.habit_id,
            date = %log.date,
            "completion already logged, reusing existing entry"
        );
        return Ok(existing);
    }

    let habit_id = log.habit_id.clone();
    let date = log.date.clone();
    let active = habit_log::ActiveModel {
        id: Set(log.id),
        habit_id: Set(log.habit_id),
        date: Set(log.date),
        completed_at: Set(log.completed_at),
        notes: Set(log.notes),
    };

    match active.insert(db).await {
        Ok(stored) => Ok(stored),
        Err(insert_err) => {
            // Unique index violation from a concurrent insert; adopt the row
            // that won.
            match get_log_by_habit_and_date(db, &habit_id, &date).await? {
                Some(existing) => Ok(existing),
                None => Err(insert_err.into()),
            }
        }
    }
}

/// Finds the log for one habit on one calendar date, if any.
pub async fn get_log_by_habit_and_date<C>(
    db: &C,
    habit_id: &str,
    date: &str,
) -> Result<Option<habit_log::Model>>
where
    C: ConnectionTrait,
{
    HabitLog::find()
        .filter(habit_log::Column::HabitId.eq(habit_id))
        .filter(habit_log::Column::Date.eq(date))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves logs ordered by date, optionally scoped to one habit.
pub async fn list_logs<C>(db: &C, habit_id: Option<&str>) -> Result<Vec<habit_log::Model>>
where
    C: ConnectionTrait,
{
    let mut query = HabitLog::find().order_by_asc(habit_log::Column::Date);
    if let Some(habit_id) = habit_id {
        query = query.filter(habit_log::Column::HabitId.eq(habit_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Overwrites an existing log row with the given model.
pub async fn update_log<C>(db: &C, log: habit_log::Model) -> Result<habit_log::Model>
where
    C: ConnectionTrait,
{
    if HabitLog::find_by_id(&log.id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            entity: "habit log",
            id: log.id,
        });
    }

    let active = habit_log::ActiveModel {
        id: Set(log.id),
        habit_id: Set(log.habit_id),
        date: Set(log.date),
        completed_at: Set(log.completed_at),
        notes: Set(log.notes),
    };

    active.update(db).await.map_err(Into::into)
}

/// Deletes a log by id; deleting a missing log is a not-found error.
pub async fn delete_log<C>(db: &C, id: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = HabitLog::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "habit log",
            id: id.to_string(),
        });
    }
    Ok(())
}
