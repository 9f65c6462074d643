//! Backup export - snapshot serialization of habits and logs.
//!
//! Produces one pretty-printed JSON document with camelCase fields, suitable
//! for download as a portable backup file. Read-only and on-demand; there is
//! no import counterpart in the core.

use crate::entities::{habit, habit_log};
use crate::errors::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Snapshot of the complete tracker state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    /// All habits
    pub habits: Vec<habit::Model>,
    /// All completion logs
    pub habit_logs: Vec<habit_log::Model>,
}

/// Serializes the given state to one pretty-printed JSON document.
pub fn export_json(habits: &[habit::Model], logs: &[habit_log::Model]) -> Result<String> {
    let data = ExportData {
        habits: habits.to_vec(),
        habit_logs: logs.to_vec(),
    };
    serde_json::to_string_pretty(&data).map_err(Into::into)
}

/// File name of a backup taken on the given day.
#[must_use]
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("habitzen_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Writes a dated backup file into `dir` and returns its path.
pub fn write_backup(
    dir: &Path,
    habits: &[habit::Model],
    logs: &[habit_log::Model],
    date: NaiveDate,
) -> Result<PathBuf> {
    let path = dir.join(backup_file_name(date));
    std::fs::write(&path, export_json(habits, logs)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::habit::Frequency;
    use crate::test_utils::{date, make_habit, make_log};

    #[test]
    fn test_round_trip_preserves_every_field() {
        let mut habit = make_habit("h", Frequency::Weekly, 3, date(2026, 1, 1));
        habit.color = Some("hsl(142 71% 45%)".to_string());
        let mut log = make_log("h", date(2026, 1, 5));
        log.notes = Some("early morning".to_string());

        let json = export_json(&[habit.clone()], &[log.clone()]).unwrap();
        let restored: ExportData = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.habits, vec![habit]);
        assert_eq!(restored.habit_logs, vec![log]);
    }

    #[test]
    fn test_snapshot_uses_portable_field_names() {
        let habit = make_habit("h", Frequency::Daily, 1, date(2026, 1, 1));
        let log = make_log("h", date(2026, 1, 2));
        let json = export_json(&[habit], &[log]).unwrap();

        assert!(json.contains("\"habitLogs\""));
        assert!(json.contains("\"habitId\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"completedAt\""));
        assert!(json.contains("\"frequency\": \"daily\""));
    }

    #[test]
    fn test_backup_file_name_carries_date() {
        assert_eq!(
            backup_file_name(date(2026, 8, 23)),
            "habitzen_backup_2026-08-23.json"
        );
    }
}
