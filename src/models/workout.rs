//! Workout model with embedded per-exercise entries.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Default rest between sets, in seconds.
pub const DEFAULT_REST_SECS: u32 = 60;

/// Duration recorded when a workout is completed without a timer (minutes).
pub const DEFAULT_COMPLETION_MINUTES: u32 = 60;

/// Workout record as returned by `GET /workouts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Workout {
    pub id: i64,
    /// Owner (absent in some older responses)
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Workout name (`title` in older responses)
    #[serde(alias = "title")]
    pub name: String,
    /// Scheduled date, `YYYY-MM-DD` or RFC 3339
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// SQLite reports booleans as 0/1, so both forms are accepted
    #[serde(default, deserialize_with = "deserialize_flexible_bool")]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<String>,
    /// Duration in minutes
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Workout {
    /// Date used to order completed workouts: completion date, else scheduled date.
    pub fn effective_completion_date(&self) -> &str {
        self.completed_date.as_deref().unwrap_or(self.date.as_str())
    }

    /// Sum of sets across all entries.
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }

    /// Training volume (sets × reps × weight).
    pub fn volume(&self) -> f64 {
        self.exercises.iter().map(WorkoutExercise::volume).sum()
    }
}

/// One exercise inside a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutExercise {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub workout_id: Option<i64>,
    #[serde(default)]
    pub exercise_id: Option<i64>,
    /// Catalog name, or the inline name for ad hoc entries
    #[serde(default)]
    pub name: Option<String>,
    pub sets: u32,
    pub reps: u32,
    /// Kilograms
    #[serde(default)]
    pub weight: Option<f64>,
    /// Seconds
    #[serde(default)]
    pub rest_time: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WorkoutExercise {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed exercise")
    }

    pub fn rest_secs(&self) -> u32 {
        self.rest_time.unwrap_or(DEFAULT_REST_SECS)
    }

    pub fn volume(&self) -> f64 {
        f64::from(self.sets) * f64::from(self.reps) * self.weight.unwrap_or(0.0)
    }
}

/// Body of `POST /workouts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
    pub user_id: i64,
    pub name: String,
    pub date: String,
    pub notes: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub exercises: Vec<NewWorkoutEntry>,
}

/// One entry of [`NewWorkout::exercises`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkoutEntry {
    pub exercise_id: i64,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub rest_time: u32,
    pub notes: String,
}

/// Partial body of `PUT /workouts/:id`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl WorkoutUpdate {
    /// Update marking a workout completed at `completed_date`.
    pub fn completion(completed_date: String, duration: u32) -> Self {
        Self {
            completed: Some(true),
            completed_date: Some(completed_date),
            duration: Some(duration),
            ..Self::default()
        }
    }
}

/// Body of `POST /workout-exercises`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkoutExercise {
    pub workout_id: i64,
    pub exercise_id: i64,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub rest_time: u32,
    pub notes: String,
}

/// Accept `true`/`false`, `0`/`1` and `null` (as false).
fn deserialize_flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Value::Null => Ok(false),
        Value::String(s) => Ok(matches!(s.as_str(), "1" | "true" | "TRUE" | "True")),
        other => Err(serde::de::Error::custom(format!(
            "expected boolean, got {}",
            other
        ))),
    }
}
