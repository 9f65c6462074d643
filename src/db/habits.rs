//! Habit table queries - Handles all habit persistence operations.
//!
//! Provides functions for creating, retrieving, updating, and deleting
//! habits. Deleting a habit cascades to its logs inside a single database
//! transaction so a log never outlives its habit.

use crate::entities::{Habit, HabitLog, habit, habit_log};
use crate::errors::{Error, Result};
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};

/// Inserts a new habit row and returns the stored model.
///
/// The id is taken from the given model; callers generate it client-side.
pub async fn create_habit<C>(db: &C, habit: habit::Model) -> Result<habit::Model>
where
    C: ConnectionTrait,
{
    let active = habit::ActiveModel {
        id: Set(habit.id),
        name: Set(habit.name),
        category: Set(habit.category),
        difficulty: Set(habit.difficulty),
        frequency: Set(habit.frequency),
        color: Set(habit.color),
        created_at: Set(habit.created_at),
        points: Set(habit.points),
    };

    active.insert(db).await.map_err(Into::into)
}

/// Retrieves all habits, newest first.
pub async fn list_habits<C>(db: &C) -> Result<Vec<habit::Model>>
where
    C: ConnectionTrait,
{
    Habit::find()
        .order_by_desc(habit::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a habit by its id.
pub async fn get_habit_by_id<C>(db: &C, id: &str) -> Result<Option<habit::Model>>
where
    C: ConnectionTrait,
{
    Habit::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Overwrites an existing habit row with the given model.
///
/// Fails with a not-found error when no row with the model's id exists,
/// without touching anything.
pub async fn update_habit<C>(db: &C, habit: habit::Model) -> Result<habit::Model>
where
    C: ConnectionTrait,
{
    if get_habit_by_id(db, &habit.id).await?.is_none() {
        return Err(Error::NotFound {
            entity: "habit",
            id: habit.id,
        });
    }

    let active = habit::ActiveModel {
        id: Set(habit.id),
        name: Set(habit.name),
        category: Set(habit.category),
        difficulty: Set(habit.difficulty),
        frequency: Set(habit.frequency),
        color: Set(habit.color),
        created_at: Set(habit.created_at),
        points: Set(habit.points),
    };

    active.update(db).await.map_err(Into::into)
}

/// Deletes a habit and every log referencing it, atomically.
///
/// Both deletes run in one transaction: either the habit and all of its
/// logs disappear together or nothing changes.
pub async fn delete_habit(db: &DatabaseConnection, id: &str) -> Result<()> {
    let txn = db.begin().await?;

    let habit = Habit::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "habit",
            id: id.to_string(),
        })?;

    HabitLog::delete_many()
        .filter(habit_log::Column::HabitId.eq(id))
        .exec(&txn)
        .await?;
    Habit::delete_by_id(&habit.id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::db::logs;
    use crate::entities::habit::Frequency;
    use crate::test_utils::{date, make_habit, make_log, setup_test_db};

    #[tokio::test]
    async fn test_create_and_list_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let mut older = make_habit("a", Frequency::Daily, 1, date(2026, 1, 1));
        older.created_at = 1_000;
        let mut newer = make_habit("b", Frequency::Daily, 1, date(2026, 1, 2));
        newer.created_at = 2_000;

        create_habit(&db, older).await?;
        create_habit(&db, newer).await?;

        let listed = list_habits(&db).await?;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "b");
        assert_eq!(listed[1].id, "a");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_habit_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let habit = make_habit("ghost", Frequency::Daily, 1, date(2026, 1, 1));
        let result = update_habit(&db, habit).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "habit", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_cascades_to_logs() -> Result<()> {
        let db = setup_test_db().await?;
        create_habit(&db, make_habit("h", Frequency::Daily, 1, date(2026, 1, 1))).await?;
        create_habit(&db, make_habit("other", Frequency::Daily, 1, date(2026, 1, 1))).await?;
        logs::create_log(&db, make_log("h", date(2026, 1, 2))).await?;
        logs::create_log(&db, make_log("h", date(2026, 1, 3))).await?;
        logs::create_log(&db, make_log("other", date(2026, 1, 2))).await?;

        delete_habit(&db, "h").await?;

        assert!(get_habit_by_id(&db, "h").await?.is_none());
        let remaining = logs::list_logs(&db, None).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].habit_id, "other");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_habit_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_habit(&db, "nope").await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }
}
