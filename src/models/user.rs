//! User profile model as exchanged with the backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Backend identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address (unique on the backend)
    pub email: String,
    /// Age in years
    #[serde(default)]
    pub age: Option<u32>,
    /// Body weight in kilograms
    #[serde(default)]
    pub weight: Option<f64>,
    /// Height in centimeters
    #[serde(default)]
    pub height: Option<f64>,
    /// Fitness goal label (see [`Goal`])
    #[serde(default)]
    pub goal: Option<String>,
    /// When the backend created the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    /// The user's goal, if it is one of the known labels.
    pub fn goal(&self) -> Option<Goal> {
        self.goal.as_deref().and_then(|g| g.parse().ok())
    }
}

/// Fields accepted by `POST /users` and `PUT /users/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<String>,
}

/// The fixed set of fitness goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goal {
    BuildMuscle,
    LoseWeight,
    IncreaseStrength,
    ImproveEndurance,
    GeneralFitness,
    AthleticPerformance,
}

impl Goal {
    pub const ALL: [Goal; 6] = [
        Goal::BuildMuscle,
        Goal::LoseWeight,
        Goal::IncreaseStrength,
        Goal::ImproveEndurance,
        Goal::GeneralFitness,
        Goal::AthleticPerformance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::BuildMuscle => "Build Muscle",
            Goal::LoseWeight => "Lose Weight",
            Goal::IncreaseStrength => "Increase Strength",
            Goal::ImproveEndurance => "Improve Endurance",
            Goal::GeneralFitness => "General Fitness",
            Goal::AthleticPerformance => "Athletic Performance",
        }
    }

    /// Recommended training frequency for this goal.
    pub fn workout_frequency(self) -> &'static str {
        match self {
            Goal::BuildMuscle => "4-5 times per week with focus on progressive overload",
            Goal::LoseWeight => "5-6 times per week combining cardio and strength training",
            Goal::IncreaseStrength => "3-4 times per week with heavy compound movements",
            Goal::ImproveEndurance => "4-6 times per week with cardio emphasis",
            Goal::GeneralFitness | Goal::AthleticPerformance => {
                "3-4 times per week with balanced training"
            }
        }
    }

    /// Areas to focus on for this goal.
    pub fn focus_areas(self) -> &'static str {
        match self {
            Goal::BuildMuscle => "Progressive overload, compound movements, adequate rest",
            Goal::LoseWeight => "Caloric deficit, high-intensity training, consistency",
            Goal::IncreaseStrength => "Heavy lifting, low reps, proper form",
            Goal::ImproveEndurance => "Cardio training, circuit workouts, stamina building",
            Goal::GeneralFitness | Goal::AthleticPerformance => {
                "Balanced approach to strength and cardiovascular fitness"
            }
        }
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Goal::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown goal: {}", s))
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
