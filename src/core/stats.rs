//! Statistics engine - pure derived metrics over habits and completion logs.
//!
//! Every function here is a pure computation: given the same habit and log
//! collections it returns identical output and never mutates its inputs.
//! "Today" is always an explicit parameter so callers (and tests) control
//! the clock. All date handling uses calendar-day semantics; weeks are
//! Monday-start dates stepped by exactly 7 days, never reconstructed from
//! `(year, week_number)` pairs.
//!
//! Malformed-but-type-valid input never errors: a log whose `habit_id`
//! resolves to no habit contributes nothing to point totals, and a log with
//! an unparseable date is skipped.

use crate::config::catalog::LEVEL_THRESHOLDS;
use crate::entities::habit::Frequency;
use crate::entities::{habit, habit_log};
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Aggregated dashboard summary produced by [`get_overall_stats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    /// Number of habits, any frequency
    pub total_habits: usize,
    /// Number of completion logs across all habits
    pub total_completions: usize,
    /// Total points earned (orphaned logs excluded)
    pub total_points: i64,
    /// Maximum current streak across all habits
    pub current_overall_streak: u32,
    /// Maximum longest streak across all habits
    pub longest_overall_streak: u32,
    /// Trailing-30-day success rate over daily habits, percent, one decimal
    pub success_rate: f64,
    /// Current user level
    pub user_level: u32,
    /// Points missing to reach the next level, 0 at max level
    pub points_to_next_level: i64,
    /// Percent position between the current and next threshold
    pub current_level_progress: f64,
}

/// Level progression derived from cumulative points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    /// Current level, 1-based
    pub level: u32,
    /// Points missing to the next threshold, 0 at max level
    pub points_to_next_level: i64,
    /// Percent position within the current level, clamped to 0..=100
    pub current_level_progress: f64,
    /// Threshold the current level unlocked at
    pub current_level_min_points: i64,
    /// Next threshold, `None` at max level
    pub next_level_min_points: Option<i64>,
}

/// One slice of the completion pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    /// Bucket label
    pub name: String,
    /// Count of (habit, day) pairs in the bucket
    pub value: u32,
}

/// Pie bucket label: completed (habit, day) pairs.
pub const PIE_COMPLETED: &str = "Completed";
/// Pie bucket label: missed (habit, day) pairs.
pub const PIE_MISSED: &str = "Missed";
/// Sentinel bucket when the user has no daily habits at all.
pub const PIE_NO_DAILY_HABITS: &str = "No daily habits";
/// Sentinel bucket when daily habits exist but no day in the window counts.
pub const PIE_NO_ACTIVITY: &str = "No activity";

/// Bucketing granularity for [`get_success_rate_trend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    /// Monday-start calendar weeks
    Weekly,
    /// Calendar months
    Monthly,
}

/// One point of the success-rate trend, oldest first in the returned series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Period label ("This week", "Last week", "Week 14", "Mar 2026", ...)
    pub name: String,
    /// Success rate for the period, percent, one decimal
    pub rate: f64,
}

/// Sums the owning habit's points for every log. Logs referencing a deleted
/// or missing habit contribute zero.
#[must_use]
pub fn calculate_points(logs: &[habit_log::Model], habits: &[habit::Model]) -> i64 {
    let by_id: HashMap<&str, &habit::Model> =
        habits.iter().map(|h| (h.id.as_str(), h)).collect();

    logs.iter()
        .filter_map(|log| by_id.get(log.habit_id.as_str()))
        .map(|habit| i64::from(habit.points))
        .sum()
}

/// Length of the unbroken run of completions ending at `today`, in the unit
/// of the habit's frequency.
///
/// Daily: 0 if the most recent log is more than one calendar day old,
/// otherwise the count of consecutive days walking backward from the most
/// recent log. Weekly: 0 if the current Monday-start week has no log,
/// otherwise the count of consecutive weeks with at least one completion
/// (multiple completions in one week count once).
#[must_use]
pub fn calculate_current_streak(
    habit: &habit::Model,
    logs: &[habit_log::Model],
    today: NaiveDate,
) -> u32 {
    let dates = habit_dates(&habit.id, logs);
    match habit.frequency {
        Frequency::Daily => {
            let Some(&latest) = dates.last() else {
                return 0;
            };
            if (today - latest).num_days() > 1 {
                return 0;
            }
            let mut streak = 1;
            for pair in dates.windows(2).rev() {
                if (pair[1] - pair[0]).num_days() == 1 {
                    streak += 1;
                } else {
                    break;
                }
            }
            streak
        }
        Frequency::Weekly => {
            let weeks: BTreeSet<NaiveDate> = dates.iter().map(|&d| week_start(d)).collect();
            let mut cursor = week_start(today);
            let mut streak = 0;
            while weeks.contains(&cursor) {
                streak += 1;
                cursor -= Duration::days(7);
            }
            streak
        }
    }
}

/// Maximum streak length ever achieved, scanning the entire history without
/// anchoring to "now".
///
/// Daily runs reset on any gap greater than one day; weekly runs reset on
/// any skipped week. Same-day and same-week duplicates neither extend nor
/// break a run.
#[must_use]
pub fn calculate_longest_streak(habit: &habit::Model, logs: &[habit_log::Model]) -> u32 {
    let dates = habit_dates(&habit.id, logs);
    match habit.frequency {
        Frequency::Daily => longest_run(&dates, 1),
        Frequency::Weekly => {
            let mut weeks: Vec<NaiveDate> = dates.iter().map(|&d| week_start(d)).collect();
            weeks.dedup();
            longest_run(&weeks, 7)
        }
    }
}

/// Maps cumulative points onto the fixed level threshold table.
#[must_use]
pub fn calculate_user_level(total_points: i64) -> LevelProgress {
    let mut level = 1;
    for (index, &threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
        if total_points >= threshold {
            level = index + 1;
        } else {
            break;
        }
    }

    let current_level_min_points = LEVEL_THRESHOLDS[level - 1];
    let level = level as u32;

    LEVEL_THRESHOLDS.get(level as usize).copied().map_or(
        LevelProgress {
            level,
            points_to_next_level: 0,
            current_level_progress: 100.0,
            current_level_min_points,
            next_level_min_points: None,
        },
        |next_level_min_points| {
            let span = next_level_min_points - current_level_min_points;
            let progress = if span > 0 {
                (total_points - current_level_min_points) as f64 / span as f64 * 100.0
            } else {
                100.0
            };
            LevelProgress {
                level,
                points_to_next_level: (next_level_min_points - total_points).max(0),
                current_level_progress: round_one(progress.clamp(0.0, 100.0)),
                current_level_min_points,
                next_level_min_points: Some(next_level_min_points),
            }
        },
    )
}

/// Aggregates the dashboard summary: counts, points, best streaks, level and
/// the trailing-30-day success rate (daily habits only, days counted from
/// `max(habit creation, today - 29)` through `today`).
#[must_use]
pub fn get_overall_stats(
    habits: &[habit::Model],
    logs: &[habit_log::Model],
    today: NaiveDate,
) -> OverallStats {
    let total_points = calculate_points(logs, habits);
    let level = calculate_user_level(total_points);

    let mut current_overall_streak = 0;
    let mut longest_overall_streak = 0;
    for habit in habits {
        current_overall_streak =
            current_overall_streak.max(calculate_current_streak(habit, logs, today));
        longest_overall_streak = longest_overall_streak.max(calculate_longest_streak(habit, logs));
    }

    let success_rate = completion_ratio(habits, logs, today - Duration::days(29), today);

    OverallStats {
        total_habits: habits.len(),
        total_completions: logs.len(),
        total_points,
        current_overall_streak,
        longest_overall_streak,
        success_rate,
        user_level: level.level,
        points_to_next_level: level.points_to_next_level,
        current_level_progress: level.current_level_progress,
    }
}

/// Classifies every (daily habit, day) pair of the trailing window as
/// completed or missed.
///
/// `window_days` defaults to 7 and is inclusive of `today`. A habit only
/// counts on days on or after its creation. Zero-count buckets are omitted;
/// with no daily habits at all a single [`PIE_NO_DAILY_HABITS`] bucket is
/// returned, and with daily habits but no countable (habit, day) pair a
/// single [`PIE_NO_ACTIVITY`] bucket.
#[must_use]
pub fn get_pie_chart_data(
    habits: &[habit::Model],
    logs: &[habit_log::Model],
    window_days: Option<u32>,
    today: NaiveDate,
) -> Vec<PieSlice> {
    let window_days = window_days.unwrap_or(7).max(1);
    let start = today - Duration::days(i64::from(window_days) - 1);

    let daily: Vec<&habit::Model> = habits
        .iter()
        .filter(|h| h.frequency == Frequency::Daily)
        .collect();
    if daily.is_empty() {
        return vec![PieSlice {
            name: PIE_NO_DAILY_HABITS.to_string(),
            value: 1,
        }];
    }

    let completed_set = completion_set(logs);
    let mut completed = 0;
    let mut missed = 0;
    for habit in &daily {
        let mut day = created_on(habit).max(start);
        while day <= today {
            if completed_set.contains(&(habit.id.as_str(), day)) {
                completed += 1;
            } else {
                missed += 1;
            }
            day += Duration::days(1);
        }
    }

    if completed == 0 && missed == 0 {
        return vec![PieSlice {
            name: PIE_NO_ACTIVITY.to_string(),
            value: 1,
        }];
    }

    [(PIE_COMPLETED, completed), (PIE_MISSED, missed)]
        .into_iter()
        .filter(|&(_, value)| value > 0)
        .map(|(name, value)| PieSlice {
            name: name.to_string(),
            value,
        })
        .collect()
}

/// Success rate per period for the last `num_periods` weeks or months,
/// returned oldest first.
///
/// Weekly buckets are Monday-start calendar weeks and monthly buckets are
/// calendar months; the current period is clamped to `today`. The two most
/// recent periods get the special "This ..."/"Last ..." labels, older weeks
/// are labeled by ISO week number and older months by month and year.
#[must_use]
pub fn get_success_rate_trend(
    habits: &[habit::Model],
    logs: &[habit_log::Model],
    num_periods: u32,
    period: TrendPeriod,
    today: NaiveDate,
) -> Vec<TrendPoint> {
    let mut trend = Vec::with_capacity(num_periods as usize);

    for offset in 0..num_periods {
        let (start, end, name) = match period {
            TrendPeriod::Weekly => {
                let start = week_start(today) - Duration::days(7 * i64::from(offset));
                let end = (start + Duration::days(6)).min(today);
                let name = match offset {
                    0 => "This week".to_string(),
                    1 => "Last week".to_string(),
                    _ => format!("Week {}", start.iso_week().week()),
                };
                (start, end, name)
            }
            TrendPeriod::Monthly => {
                let start = months_back(today, offset);
                let end = month_last_day(start).min(today);
                let name = match offset {
                    0 => "This month".to_string(),
                    1 => "Last month".to_string(),
                    _ => start.format("%b %Y").to_string(),
                };
                (start, end, name)
            }
        };
        trend.push(TrendPoint {
            name,
            rate: completion_ratio(habits, logs, start, end),
        });
    }

    trend.reverse();
    trend
}

/// Ratio of actual to possible daily completions over an inclusive date
/// range, in percent rounded to one decimal; 0 when nothing was possible.
///
/// "Possible" counts one per daily habit per day from
/// `max(range start, habit creation)` through the range end. Weekly habits
/// are excluded.
#[must_use]
pub fn completion_ratio(
    habits: &[habit::Model],
    logs: &[habit_log::Model],
    start: NaiveDate,
    end: NaiveDate,
) -> f64 {
    let completed_set = completion_set(logs);
    let mut possible = 0u32;
    let mut actual = 0u32;

    for habit in habits.iter().filter(|h| h.frequency == Frequency::Daily) {
        let mut day = created_on(habit).max(start);
        while day <= end {
            possible += 1;
            if completed_set.contains(&(habit.id.as_str(), day)) {
                actual += 1;
            }
            day += Duration::days(1);
        }
    }

    if possible == 0 {
        0.0
    } else {
        round_one(f64::from(actual) / f64::from(possible) * 100.0)
    }
}

/// Parses a log's `YYYY-MM-DD` date; `None` for anything malformed.
pub(crate) fn parse_log_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Calendar day a habit was created on (UTC). An out-of-range timestamp
/// degrades to the distant past, which the window clamps render harmless.
pub(crate) fn created_on(habit: &habit::Model) -> NaiveDate {
    DateTime::from_timestamp_millis(habit.created_at)
        .map_or(NaiveDate::MIN, |created| created.date_naive())
}

/// Monday of the week containing `date`.
pub(crate) fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sorted, deduplicated completion dates for one habit.
fn habit_dates(habit_id: &str, logs: &[habit_log::Model]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = logs
        .iter()
        .filter(|log| log.habit_id == habit_id)
        .filter_map(|log| parse_log_date(&log.date))
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// `(habit_id, date)` pairs with a completion log.
fn completion_set(logs: &[habit_log::Model]) -> HashSet<(&str, NaiveDate)> {
    logs.iter()
        .filter_map(|log| parse_log_date(&log.date).map(|d| (log.habit_id.as_str(), d)))
        .collect()
}

/// Longest run of entries exactly `step_days` apart in a sorted slice.
fn longest_run(dates: &[NaiveDate], step_days: i64) -> u32 {
    if dates.is_empty() {
        return 0;
    }
    let mut longest = 1;
    let mut run = 1;
    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() == step_days {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }
    longest
}

/// First day of the month `months` before the month containing `date`.
fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 - months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// Last day of the month starting at `first`.
fn month_last_day(first: NaiveDate) -> NaiveDate {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.map_or(first, |day| day - Duration::days(1))
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
