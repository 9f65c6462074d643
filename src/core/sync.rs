//! Synchronization layer - optimistic local mutation with rollback.
//!
//! [`HabitTracker`] owns the in-memory habit and log collections the
//! statistics and achievement engines read, and mediates every mutation
//! against an injected [`HabitStore`]. Each mutation follows the same
//! lifecycle: snapshot the affected collections, apply the change in memory
//! immediately (propose), issue the corresponding write (persist), then
//! reconcile - adopt the store-assigned identity on success, or restore the
//! snapshot on failure. Readers always observe either the pre-mutation state
//! or the optimistic state, never a half-applied one.
//!
//! Mutations take `&mut self`, so the propose-persist-reconcile window of
//! one mutation can never interleave with another on the same tracker.

use crate::config::catalog::points_for_difficulty;
use crate::core::medals::{Medal, get_achieved_medals};
use crate::core::stats::{OverallStats, get_overall_stats};
use crate::db::HabitStore;
use crate::entities::habit::Frequency;
use crate::entities::{habit, habit_log};
use crate::errors::{Error, Result};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// User-supplied fields for creating or editing a habit.
#[derive(Debug, Clone)]
pub struct HabitForm {
    /// Display name, non-empty, at most 100 characters
    pub name: String,
    /// Category label; catalog value or free-form text
    pub category: String,
    /// Ordinal difficulty in 1..=3
    pub difficulty: i32,
    /// Target cadence
    pub frequency: Frequency,
    /// Optional display accent
    pub color: Option<String>,
}

/// Outcome of a completion toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionChange {
    /// The day was unlogged; a new completion log now exists
    Completed(habit_log::Model),
    /// The day was already logged; the log was removed
    Uncompleted {
        /// Id of the removed log
        log_id: String,
    },
}

/// Owns the in-memory state and orchestrates reads/writes against the
/// storage collaborator.
pub struct HabitTracker {
    store: Arc<dyn HabitStore>,
    habits: Vec<habit::Model>,
    logs: Vec<habit_log::Model>,
}

impl HabitTracker {
    /// Creates an empty tracker over the given storage port.
    #[must_use]
    pub fn new(store: Arc<dyn HabitStore>) -> Self {
        Self {
            store,
            habits: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Replaces the in-memory collections with the store's current state.
    ///
    /// Habits arrive newest first; logs in date order.
    pub async fn load(&mut self) -> Result<()> {
        self.habits = self.store.list_habits().await?;
        self.logs = self.store.list_logs(None).await?;
        info!(
            habits = self.habits.len(),
            logs = self.logs.len(),
            "loaded tracker state"
        );
        Ok(())
    }

    /// All habits, newest first.
    #[must_use]
    pub fn habits(&self) -> &[habit::Model] {
        &self.habits
    }

    /// All completion logs.
    #[must_use]
    pub fn logs(&self) -> &[habit_log::Model] {
        &self.logs
    }

    /// Whether a habit has a completion log on the given calendar day.
    #[must_use]
    pub fn is_completed_on(&self, habit_id: &str, date: NaiveDate) -> bool {
        let date = date.format("%Y-%m-%d").to_string();
        self.logs
            .iter()
            .any(|log| log.habit_id == habit_id && log.date == date)
    }

    /// Dashboard summary over the current in-memory state.
    #[must_use]
    pub fn overall_stats(&self, today: NaiveDate) -> OverallStats {
        get_overall_stats(&self.habits, &self.logs, today)
    }

    /// Currently satisfied medals, stamped with `now_ms`.
    #[must_use]
    pub fn achieved_medals(&self, now_ms: i64) -> Vec<Medal> {
        get_achieved_medals(&self.habits, &self.logs, now_ms)
    }

    /// Creates a habit from validated form data.
    ///
    /// The habit appears in memory immediately under a provisional UUID; if
    /// persistence assigns a different final id it is rewritten in place,
    /// and a persistence failure removes the habit again.
    pub async fn create_habit(&mut self, form: HabitForm) -> Result<habit::Model> {
        let points = validate_form(&form)?;
        let habit = habit::Model {
            id: Uuid::new_v4().to_string(),
            name: form.name.trim().to_string(),
            category: form.category.trim().to_string(),
            difficulty: form.difficulty,
            frequency: form.frequency,
            color: form.color,
            created_at: Utc::now().timestamp_millis(),
            points,
        };
        let provisional_id = habit.id.clone();

        let snapshot = self.habits.clone();
        self.habits.insert(0, habit.clone());

        match self.store.create_habit(habit).await {
            Ok(stored) => {
                if stored.id != provisional_id {
                    self.adopt_habit_id(&provisional_id, &stored.id);
                }
                info!(habit = %stored.name, id = %stored.id, "created habit");
                Ok(stored)
            }
            Err(error) => {
                self.habits = snapshot;
                warn!(%error, "habit creation failed, state rolled back");
                Err(error)
            }
        }
    }

    /// Applies form data to an existing habit, recomputing its points.
    pub async fn edit_habit(&mut self, id: &str, form: HabitForm) -> Result<habit::Model> {
        let points = validate_form(&form)?;
        let Some(position) = self.habits.iter().position(|h| h.id == id) else {
            return Err(Error::NotFound {
                entity: "habit",
                id: id.to_string(),
            });
        };

        let mut updated = self.habits[position].clone();
        updated.name = form.name.trim().to_string();
        updated.category = form.category.trim().to_string();
        updated.difficulty = form.difficulty;
        updated.frequency = form.frequency;
        updated.color = form.color;
        updated.points = points;

        let snapshot = self.habits.clone();
        self.habits[position] = updated.clone();

        match self.store.update_habit(updated).await {
            Ok(stored) => {
                info!(habit = %stored.name, id = %stored.id, "updated habit");
                Ok(stored)
            }
            Err(error) => {
                self.habits = snapshot;
                warn!(%error, id, "habit update failed, state rolled back");
                Err(error)
            }
        }
    }

    /// Deletes a habit and all of its logs.
    ///
    /// Both collections change in the same optimistic update and the store
    /// persists the cascade atomically; on failure both are restored
    /// together.
    pub async fn delete_habit(&mut self, id: &str) -> Result<()> {
        if !self.habits.iter().any(|h| h.id == id) {
            return Err(Error::NotFound {
                entity: "habit",
                id: id.to_string(),
            });
        }

        let habit_snapshot = self.habits.clone();
        let log_snapshot = self.logs.clone();
        self.habits.retain(|h| h.id != id);
        self.logs.retain(|log| log.habit_id != id);

        match self.store.delete_habit(id).await {
            Ok(()) => {
                info!(id, "deleted habit and its logs");
                Ok(())
            }
            // The store already has no such habit; the goal state holds
            Err(Error::NotFound { .. }) => {
                info!(id, "habit was already gone from the store");
                Ok(())
            }
            Err(error) => {
                self.habits = habit_snapshot;
                self.logs = log_snapshot;
                warn!(%error, id, "habit deletion failed, state rolled back");
                Err(error)
            }
        }
    }

    /// Toggles completion of a habit for one calendar day.
    ///
    /// The branch is decided against the in-memory collection: an existing
    /// log is deleted (uncomplete), an absent one is created (complete,
    /// optionally carrying a note). Persistence may reveal the state had
    /// diverged; the store wins either way. A store that already held a log
    /// for the day has its authoritative log replace the provisional one,
    /// and a store that already lost the log leaves the uncomplete as a
    /// no-op success.
    pub async fn toggle_completion(
        &mut self,
        habit_id: &str,
        date: NaiveDate,
        notes: Option<String>,
    ) -> Result<CompletionChange> {
        if !self.habits.iter().any(|h| h.id == habit_id) {
            return Err(Error::NotFound {
                entity: "habit",
                id: habit_id.to_string(),
            });
        }
        let date = date.format("%Y-%m-%d").to_string();

        let existing = self
            .logs
            .iter()
            .find(|log| log.habit_id == habit_id && log.date == date)
            .cloned();

        if let Some(existing) = existing {
            let snapshot = self.logs.clone();
            self.logs.retain(|log| log.id != existing.id);

            match self.store.delete_log(&existing.id).await {
                Ok(()) => {
                    info!(habit_id, %date, "habit unmarked for the day");
                    Ok(CompletionChange::Uncompleted {
                        log_id: existing.id,
                    })
                }
                // The log was stale; the store already holds none for the
                // day, so the in-memory removal stands
                Err(Error::NotFound { .. }) => {
                    info!(habit_id, %date, "log was already gone from the store");
                    Ok(CompletionChange::Uncompleted {
                        log_id: existing.id,
                    })
                }
                Err(error) => {
                    self.logs = snapshot;
                    warn!(%error, habit_id, "uncomplete failed, state rolled back");
                    Err(error)
                }
            }
        } else {
            let log = habit_log::Model {
                id: Uuid::new_v4().to_string(),
                habit_id: habit_id.to_string(),
                date,
                completed_at: Utc::now().timestamp_millis(),
                notes,
            };
            let provisional_id = log.id.clone();

            let snapshot = self.logs.clone();
            self.logs.push(log.clone());

            match self.store.create_log(log).await {
                Ok(stored) => {
                    if stored.id != provisional_id {
                        self.adopt_log(&provisional_id, stored.clone());
                    }
                    info!(habit_id, date = %stored.date, "habit marked complete");
                    Ok(CompletionChange::Completed(stored))
                }
                Err(error) => {
                    self.logs = snapshot;
                    warn!(%error, habit_id, "complete failed, state rolled back");
                    Err(error)
                }
            }
        }
    }

    /// Replaces the notes of an existing completion log.
    pub async fn edit_log_notes(
        &mut self,
        log_id: &str,
        notes: Option<String>,
    ) -> Result<habit_log::Model> {
        let Some(position) = self.logs.iter().position(|log| log.id == log_id) else {
            return Err(Error::NotFound {
                entity: "habit log",
                id: log_id.to_string(),
            });
        };

        let mut updated = self.logs[position].clone();
        updated.notes = notes;

        let snapshot = self.logs.clone();
        self.logs[position] = updated.clone();

        match self.store.update_log(updated).await {
            Ok(stored) => {
                info!(log_id, "updated log notes");
                Ok(stored)
            }
            Err(error) => {
                self.logs = snapshot;
                warn!(%error, log_id, "log note update failed, state rolled back");
                Err(error)
            }
        }
    }

    /// Rewrites a provisional habit id with the store-assigned one, in
    /// place, so no duplicate entry appears.
    fn adopt_habit_id(&mut self, provisional: &str, assigned: &str) {
        if let Some(habit) = self.habits.iter_mut().find(|h| h.id == provisional) {
            habit.id = assigned.to_string();
        }
    }

    /// Replaces a provisional log with the authoritative stored one.
    fn adopt_log(&mut self, provisional: &str, stored: habit_log::Model) {
        if let Some(position) = self.logs.iter().position(|log| log.id == provisional) {
            self.logs[position] = stored;
        }
    }
}

/// Validates habit form data and resolves the point reward.
fn validate_form(form: &HabitForm) -> Result<i32> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "habit name cannot be empty".to_string(),
        });
    }
    if name.chars().count() > 100 {
        return Err(Error::Validation {
            message: "habit name cannot exceed 100 characters".to_string(),
        });
    }
    if form.category.trim().is_empty() {
        return Err(Error::Validation {
            message: "habit category cannot be empty".to_string(),
        });
    }
    points_for_difficulty(form.difficulty).ok_or_else(|| Error::Validation {
        message: format!("difficulty must be 1, 2 or 3, got {}", form.difficulty),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::db::SqliteStore;
    use crate::test_utils::{date, setup_test_db};
    use async_trait::async_trait;
    use sea_orm::DbErr;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn form(name: &str, difficulty: i32, frequency: Frequency) -> HabitForm {
        HabitForm {
            name: name.to_string(),
            category: "Fitness".to_string(),
            difficulty,
            frequency,
            color: None,
        }
    }

    async fn setup_tracker() -> Result<HabitTracker> {
        let db = setup_test_db().await?;
        Ok(HabitTracker::new(Arc::new(SqliteStore::new(db))))
    }

    /// Store wrapper that fails every write while the flag is raised; reads
    /// pass through to a real in-memory database.
    struct FailingStore {
        inner: SqliteStore,
        fail_writes: AtomicBool,
    }

    impl FailingStore {
        fn check(&self) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Error::Database(DbErr::Custom(
                    "injected write failure".to_string(),
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl HabitStore for FailingStore {
        async fn create_habit(&self, habit: habit::Model) -> Result<habit::Model> {
            self.check()?;
            self.inner.create_habit(habit).await
        }
        async fn list_habits(&self) -> Result<Vec<habit::Model>> {
            self.inner.list_habits().await
        }
        async fn update_habit(&self, habit: habit::Model) -> Result<habit::Model> {
            self.check()?;
            self.inner.update_habit(habit).await
        }
        async fn delete_habit(&self, id: &str) -> Result<()> {
            self.check()?;
            self.inner.delete_habit(id).await
        }
        async fn create_log(&self, log: habit_log::Model) -> Result<habit_log::Model> {
            self.check()?;
            self.inner.create_log(log).await
        }
        async fn get_log(&self, habit_id: &str, d: &str) -> Result<Option<habit_log::Model>> {
            self.inner.get_log(habit_id, d).await
        }
        async fn list_logs(&self, habit_id: Option<&str>) -> Result<Vec<habit_log::Model>> {
            self.inner.list_logs(habit_id).await
        }
        async fn update_log(&self, log: habit_log::Model) -> Result<habit_log::Model> {
            self.check()?;
            self.inner.update_log(log).await
        }
        async fn delete_log(&self, id: &str) -> Result<()> {
            self.check()?;
            self.inner.delete_log(id).await
        }
    }

    async fn setup_failing_tracker() -> Result<(HabitTracker, Arc<FailingStore>)> {
        let db = setup_test_db().await?;
        let store = Arc::new(FailingStore {
            inner: SqliteStore::new(db),
            fail_writes: AtomicBool::new(false),
        });
        Ok((HabitTracker::new(Arc::clone(&store) as Arc<dyn HabitStore>), store))
    }

    #[tokio::test]
    async fn test_create_habit_persists_and_derives_points() -> Result<()> {
        let mut tracker = setup_tracker().await?;
        let habit = tracker.create_habit(form("Read", 2, Frequency::Daily)).await?;

        assert_eq!(habit.points, 20);
        assert_eq!(tracker.habits().len(), 1);
        assert_eq!(tracker.habits()[0].id, habit.id);

        // Survives a reload from the store
        tracker.load().await?;
        assert_eq!(tracker.habits().len(), 1);
        assert_eq!(tracker.habits()[0].points, 20);
        Ok(())
    }

    #[tokio::test]
    async fn test_validation_rejects_before_any_mutation() -> Result<()> {
        let mut tracker = setup_tracker().await?;

        for bad in [
            form("", 2, Frequency::Daily),
            form(&"x".repeat(101), 2, Frequency::Daily),
            form("Read", 0, Frequency::Daily),
            form("Read", 4, Frequency::Daily),
        ] {
            let result = tracker.create_habit(bad).await;
            assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        }
        // Neither memory nor store saw anything
        assert!(tracker.habits().is_empty());
        tracker.load().await?;
        assert!(tracker.habits().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_recomputes_points() -> Result<()> {
        let mut tracker = setup_tracker().await?;
        let habit = tracker.create_habit(form("Run", 1, Frequency::Daily)).await?;
        assert_eq!(habit.points, 10);

        let updated = tracker.edit_habit(&habit.id, form("Run", 3, Frequency::Daily)).await?;
        assert_eq!(updated.points, 30);
        assert_eq!(tracker.habits()[0].points, 30);

        tracker.load().await?;
        assert_eq!(tracker.habits()[0].points, 30);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_missing_habit_short_circuits() -> Result<()> {
        let mut tracker = setup_tracker().await?;
        let result = tracker.edit_habit("ghost", form("x", 1, Frequency::Daily)).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_twice_is_idempotent() -> Result<()> {
        let mut tracker = setup_tracker().await?;
        let habit = tracker.create_habit(form("Water", 1, Frequency::Daily)).await?;
        let today = date(2026, 5, 10);

        let change = tracker.toggle_completion(&habit.id, today, None).await?;
        assert!(matches!(change, CompletionChange::Completed(_)));
        assert!(tracker.is_completed_on(&habit.id, today));

        let change = tracker.toggle_completion(&habit.id, today, None).await?;
        assert!(matches!(change, CompletionChange::Uncompleted { .. }));
        assert!(!tracker.is_completed_on(&habit.id, today));

        // Back to zero logs for the pair, in the store as well
        tracker.load().await?;
        assert!(tracker.logs().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_carries_notes() -> Result<()> {
        let mut tracker = setup_tracker().await?;
        let habit = tracker.create_habit(form("Journal", 1, Frequency::Daily)).await?;

        let change = tracker
            .toggle_completion(&habit.id, date(2026, 5, 10), Some("two pages".to_string()))
            .await?;
        let CompletionChange::Completed(log) = change else {
            panic!("expected completion");
        };
        assert_eq!(log.notes.as_deref(), Some("two pages"));

        let updated = tracker.edit_log_notes(&log.id, Some("three pages".to_string())).await?;
        assert_eq!(updated.notes.as_deref(), Some("three pages"));
        tracker.load().await?;
        assert_eq!(tracker.logs()[0].notes.as_deref(), Some("three pages"));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_habit_cascades_in_memory_and_store() -> Result<()> {
        let mut tracker = setup_tracker().await?;
        let keep = tracker.create_habit(form("Keep", 1, Frequency::Daily)).await?;
        let drop = tracker.create_habit(form("Drop", 1, Frequency::Daily)).await?;
        tracker.toggle_completion(&keep.id, date(2026, 5, 9), None).await?;
        tracker.toggle_completion(&drop.id, date(2026, 5, 9), None).await?;
        tracker.toggle_completion(&drop.id, date(2026, 5, 10), None).await?;

        tracker.delete_habit(&drop.id).await?;

        assert_eq!(tracker.habits().len(), 1);
        assert!(tracker.logs().iter().all(|log| log.habit_id == keep.id));
        tracker.load().await?;
        assert_eq!(tracker.habits().len(), 1);
        assert!(tracker.logs().iter().all(|log| log.habit_id == keep.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_create_rolls_back() -> Result<()> {
        let (mut tracker, store) = setup_failing_tracker().await?;
        store.fail_writes.store(true, Ordering::SeqCst);

        let result = tracker.create_habit(form("Doomed", 1, Frequency::Daily)).await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));
        assert!(tracker.habits().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_toggle_rolls_back_and_retry_succeeds() -> Result<()> {
        let (mut tracker, store) = setup_failing_tracker().await?;
        let habit = tracker.create_habit(form("Flaky", 1, Frequency::Daily)).await?;
        let today = date(2026, 5, 10);

        store.fail_writes.store(true, Ordering::SeqCst);
        let result = tracker.toggle_completion(&habit.id, today, None).await;
        assert!(result.is_err());
        assert!(!tracker.is_completed_on(&habit.id, today));

        // A fresh attempt after the failure starts a new cycle and succeeds
        store.fail_writes.store(false, Ordering::SeqCst);
        tracker.toggle_completion(&habit.id, today, None).await?;
        assert!(tracker.is_completed_on(&habit.id, today));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_delete_restores_both_collections() -> Result<()> {
        let (mut tracker, store) = setup_failing_tracker().await?;
        let habit = tracker.create_habit(form("Sticky", 1, Frequency::Daily)).await?;
        tracker.toggle_completion(&habit.id, date(2026, 5, 10), None).await?;

        store.fail_writes.store(true, Ordering::SeqCst);
        let result = tracker.delete_habit(&habit.id).await;
        assert!(result.is_err());
        assert_eq!(tracker.habits().len(), 1);
        assert_eq!(tracker.logs().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_uncomplete_succeeds_when_store_lost_the_log() -> Result<()> {
        let mut tracker = setup_tracker().await?;
        let habit = tracker.create_habit(form("Shared", 1, Frequency::Daily)).await?;
        let today = date(2026, 5, 10);

        let change = tracker.toggle_completion(&habit.id, today, None).await?;
        let CompletionChange::Completed(log) = change else {
            panic!("expected completion");
        };
        // Another surface already removed the log behind the tracker's back
        tracker.store.delete_log(&log.id).await?;

        let change = tracker.toggle_completion(&habit.id, today, None).await?;
        assert_eq!(change, CompletionChange::Uncompleted { log_id: log.id });
        assert!(!tracker.is_completed_on(&habit.id, today));
        tracker.load().await?;
        assert!(tracker.logs().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_habit_succeeds_when_store_lost_the_habit() -> Result<()> {
        let mut tracker = setup_tracker().await?;
        let habit = tracker.create_habit(form("Shared", 1, Frequency::Daily)).await?;
        tracker.store.delete_habit(&habit.id).await?;

        tracker.delete_habit(&habit.id).await?;

        assert!(tracker.habits().is_empty());
        tracker.load().await?;
        assert!(tracker.habits().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_store_divergence_adopts_authoritative_log() -> Result<()> {
        let mut tracker = setup_tracker().await?;
        let habit = tracker.create_habit(form("Shared", 1, Frequency::Daily)).await?;
        let today = date(2026, 5, 10);

        // Another surface already persisted a log for the same day
        let foreign = habit_log::Model {
            id: "foreign-log".to_string(),
            habit_id: habit.id.clone(),
            date: today.format("%Y-%m-%d").to_string(),
            completed_at: 0,
            notes: None,
        };
        tracker.store.create_log(foreign).await?;

        let change = tracker.toggle_completion(&habit.id, today, None).await?;
        let CompletionChange::Completed(log) = change else {
            panic!("expected completion");
        };
        // The provisional log was replaced by the store's authoritative row
        assert_eq!(log.id, "foreign-log");
        assert_eq!(tracker.logs().len(), 1);
        assert_eq!(tracker.logs()[0].id, "foreign-log");
        Ok(())
    }
}
