//! Per-habit consistency heatmap.
//!
//! Builds the Sunday-start weekly grid the consistency view renders: one
//! column per week, seven cells per column, covering `num_weeks` trailing
//! weeks ending today. Cells outside the covered range are pad cells with an
//! empty date so the grid stays rectangular.

use crate::core::stats::parse_log_date;
use crate::entities::habit_log;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

/// One day cell of the heatmap grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    /// ISO `YYYY-MM-DD` date, empty for pad cells outside the covered range
    pub date: String,
    /// Completion count for the day; 0 or 1 under the log uniqueness
    /// invariant
    pub count: u32,
    /// Coarse intensity: 0 = not completed, 1 = completed
    pub level: u32,
}

/// Month label anchored to a week column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthLabel {
    /// Abbreviated month name
    pub month: String,
    /// Index of the week column the label sits over
    pub week_index: usize,
}

/// Complete heatmap payload for one habit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapData {
    /// Week columns, oldest first; each column holds 7 cells Sunday..Saturday
    pub weeks: Vec<Vec<HeatmapCell>>,
    /// Month anchors, deduplicated so labels never crowd adjacent columns
    pub month_labels: Vec<MonthLabel>,
}

/// Builds the heatmap grid for one habit over the trailing `num_weeks`
/// (default 16) ending `today`.
#[must_use]
pub fn get_habit_heatmap_data(
    habit_id: &str,
    logs: &[habit_log::Model],
    num_weeks: Option<u32>,
    today: NaiveDate,
) -> HeatmapData {
    let num_weeks = num_weeks.unwrap_or(16).max(1);
    let completed: HashSet<NaiveDate> = logs
        .iter()
        .filter(|log| log.habit_id == habit_id)
        .filter_map(|log| parse_log_date(&log.date))
        .collect();

    let range_start = today - Duration::days(i64::from(num_weeks) * 7 - 1);
    let grid_start =
        range_start - Duration::days(i64::from(range_start.weekday().num_days_from_sunday()));

    let mut weeks = Vec::new();
    let mut month_labels: Vec<MonthLabel> = Vec::new();
    let mut seen_month: Option<(i32, u32)> = None;

    let mut week_first = grid_start;
    while week_first <= today {
        let week_index = weeks.len();
        let mut column = Vec::with_capacity(7);
        let mut column_month: Option<(i32, u32)> = None;

        for day_offset in 0..7 {
            let day = week_first + Duration::days(day_offset);
            if day < range_start || day > today {
                column.push(HeatmapCell {
                    date: String::new(),
                    count: 0,
                    level: 0,
                });
                continue;
            }
            if column_month.is_none() {
                column_month = Some((day.year(), day.month()));
            }
            let count = u32::from(completed.contains(&day));
            column.push(HeatmapCell {
                date: day.format("%Y-%m-%d").to_string(),
                count,
                level: count,
            });
        }

        if let Some(month) = column_month {
            if seen_month != Some(month) {
                let spaced = month_labels
                    .last()
                    .is_none_or(|label| week_index - label.week_index >= 2);
                if spaced {
                    let first = week_first.max(range_start);
                    month_labels.push(MonthLabel {
                        month: first.format("%b").to_string(),
                        week_index,
                    });
                }
                seen_month = Some(month);
            }
        }

        weeks.push(column);
        week_first += Duration::days(7);
    }

    HeatmapData {
        weeks,
        month_labels,
    }
}
