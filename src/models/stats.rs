//! View-level aggregates derived from fetched collections.
//!
//! Everything here is a pure function of the records plus an explicit
//! "now", so pages and tests compute identical figures.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{User, Workout};
use crate::time_utils::{parse_date, parse_timestamp, week_start};

/// Number of weekly buckets shown on the progress page.
pub const WEEKLY_BUCKET_LIMIT: usize = 8;

/// Number of entries in "recent" lists.
pub const RECENT_LIMIT: usize = 5;

// ─── Health Metrics ──────────────────────────────────────────

/// BMI classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body mass index rounded to one decimal place.
///
/// Returns `None` when weight or height is missing or not positive.
pub fn bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
    let weight = weight_kg.filter(|w| *w > 0.0)?;
    let height_m = height_cm.filter(|h| *h > 0.0)? / 100.0;
    let raw = weight / (height_m * height_m);
    Some((raw * 10.0).round() / 10.0)
}

/// Basal metabolic rate (kcal/day), revised Harris-Benedict for men.
pub fn bmr(weight_kg: Option<f64>, height_cm: Option<f64>, age: Option<u32>) -> Option<i64> {
    let weight = weight_kg.filter(|w| *w > 0.0)?;
    let height = height_cm.filter(|h| *h > 0.0)?;
    let age = f64::from(age.filter(|a| *a > 0)?);
    Some((88.362 + 13.397 * weight + 4.799 * height - 5.677 * age).round() as i64)
}

/// Weight range (kg) that keeps BMI within 18.5..=24.9 for the given height.
pub fn ideal_weight_range(height_cm: Option<f64>) -> Option<(i64, i64)> {
    let height_m = height_cm.filter(|h| *h > 0.0)? / 100.0;
    let squared = height_m * height_m;
    Some((
        (18.5 * squared).round() as i64,
        (24.9 * squared).round() as i64,
    ))
}

/// Health figures shown on the profile page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub bmi: Option<f64>,
    #[serde(skip)]
    pub bmi_category: Option<BmiCategory>,
    pub bmr: Option<i64>,
    pub ideal_weight: Option<(i64, i64)>,
}

impl HealthMetrics {
    pub fn for_user(user: &User) -> Self {
        let bmi = bmi(user.weight, user.height);
        Self {
            bmi,
            bmi_category: bmi.map(BmiCategory::from_bmi),
            bmr: bmr(user.weight, user.height, user.age),
            ideal_weight: ideal_weight_range(user.height),
        }
    }
}

// ─── Progress ────────────────────────────────────────────────

/// Look-back window for the progress page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    Week,
    #[default]
    Month,
    Year,
}

impl Timeframe {
    /// Earliest date included in the window ending at `now`.
    pub fn cutoff(self, now: DateTime<Utc>) -> NaiveDate {
        let today = now.date_naive();
        match self {
            Timeframe::Week => today - Duration::days(7),
            Timeframe::Month => today.checked_sub_months(Months::new(1)).unwrap_or(today),
            Timeframe::Year => today.checked_sub_months(Months::new(12)).unwrap_or(today),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Year => "year",
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "year" => Ok(Timeframe::Year),
            other => Err(format!("unknown timeframe: {}", other)),
        }
    }
}

/// Workouts dated on or after the timeframe's cutoff.
///
/// Workouts whose date cannot be parsed are excluded.
pub fn filter_by_timeframe(
    workouts: &[Workout],
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> Vec<&Workout> {
    let cutoff = timeframe.cutoff(now);
    workouts
        .iter()
        .filter(|w| parse_date(&w.date).is_some_and(|d| d >= cutoff))
        .collect()
}

/// Summary figures for the progress page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressStats {
    pub total_workouts: usize,
    pub completed_count: usize,
    /// Percentage, rounded
    pub completion_rate: u32,
    /// Minutes, rounded, over completed workouts
    pub avg_duration: u32,
    /// Exercises across completed workouts
    pub total_exercises: usize,
    /// Minutes across completed workouts
    pub total_duration: u32,
}

impl ProgressStats {
    pub fn from_workouts<'a>(workouts: impl IntoIterator<Item = &'a Workout>) -> Self {
        let mut stats = ProgressStats::default();
        for workout in workouts {
            stats.total_workouts += 1;
            if workout.completed {
                stats.completed_count += 1;
                stats.total_duration += workout.duration.unwrap_or(0);
                stats.total_exercises += workout.exercises.len();
            }
        }
        stats.completion_rate = rounded_percent(stats.completed_count, stats.total_workouts);
        if stats.completed_count > 0 {
            stats.avg_duration =
                (f64::from(stats.total_duration) / stats.completed_count as f64).round() as u32;
        }
        stats
    }
}

/// Workouts in one Sunday-aligned week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyBucket {
    /// Sunday starting the week
    pub week_start: NaiveDate,
    pub completed: usize,
    pub total: usize,
}

impl WeeklyBucket {
    pub fn completion_rate(&self) -> u32 {
        rounded_percent(self.completed, self.total)
    }
}

/// Group workouts by the Sunday-aligned week of their date.
///
/// Returns at most [`WEEKLY_BUCKET_LIMIT`] buckets, the most recent ones,
/// in ascending week order.
pub fn weekly_buckets<'a>(workouts: impl IntoIterator<Item = &'a Workout>) -> Vec<WeeklyBucket> {
    let mut weeks: BTreeMap<NaiveDate, WeeklyBucket> = BTreeMap::new();
    for workout in workouts {
        let Some(date) = parse_date(&workout.date) else {
            continue;
        };
        let start = week_start(date);
        let bucket = weeks.entry(start).or_insert_with(|| WeeklyBucket {
            week_start: start,
            ..WeeklyBucket::default()
        });
        bucket.total += 1;
        if workout.completed {
            bucket.completed += 1;
        }
    }
    let skip = weeks.len().saturating_sub(WEEKLY_BUCKET_LIMIT);
    weeks.into_values().skip(skip).collect()
}

/// Most recently completed workouts, newest first.
pub fn recent_completed(workouts: &[Workout], limit: usize) -> Vec<&Workout> {
    let mut completed: Vec<&Workout> = workouts.iter().filter(|w| w.completed).collect();
    completed.sort_by_key(|w| std::cmp::Reverse(parse_timestamp(w.effective_completion_date())));
    completed.truncate(limit);
    completed
}

// ─── Dashboard ───────────────────────────────────────────────

/// Stat tiles shown on the home dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardStats {
    pub total_workouts: usize,
    pub completed_workouts: usize,
    /// Workouts dated within the last seven days
    pub this_week_workouts: usize,
    /// Exercise entries across all workouts
    pub total_exercises: usize,
    /// Sets across all workouts
    pub total_sets: u32,
    /// Sets × reps × weight across all workouts (kg)
    pub total_volume: f64,
}

impl DashboardStats {
    pub fn from_workouts(workouts: &[Workout], now: DateTime<Utc>) -> Self {
        let week_ago = now - Duration::days(7);
        Self {
            total_workouts: workouts.len(),
            completed_workouts: workouts.iter().filter(|w| w.completed).count(),
            this_week_workouts: workouts
                .iter()
                .filter(|w| parse_timestamp(&w.date).is_some_and(|d| d >= week_ago))
                .count(),
            total_exercises: workouts.iter().map(|w| w.exercises.len()).sum(),
            total_sets: workouts.iter().map(Workout::total_sets).sum(),
            total_volume: workouts.iter().map(Workout::volume).sum(),
        }
    }
}

/// Newest workouts by scheduled date.
pub fn recent_workouts(workouts: &[Workout], limit: usize) -> Vec<&Workout> {
    let mut sorted: Vec<&Workout> = workouts.iter().collect();
    sorted.sort_by_key(|w| std::cmp::Reverse(parse_timestamp(&w.date)));
    sorted.truncate(limit);
    sorted
}

/// Workouts scheduled on the same calendar day as `now`.
pub fn todays_workouts(workouts: &[Workout], now: DateTime<Utc>) -> Vec<&Workout> {
    let today = now.date_naive();
    workouts
        .iter()
        .filter(|w| parse_date(&w.date) == Some(today))
        .collect()
}

fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}
