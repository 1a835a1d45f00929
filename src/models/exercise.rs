//! Exercise catalog model.
//!
//! The backend stores `muscle_groups` as a JSON-encoded string column. Decoding
//! is explicit: a value that does not parse is kept as [`MuscleGroups::Malformed`]
//! and logged, instead of silently becoming an empty list.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Muscle groups offered by the exercise form.
pub const MUSCLE_GROUP_OPTIONS: [&str; 16] = [
    "Chest",
    "Back",
    "Shoulders",
    "Biceps",
    "Triceps",
    "Forearms",
    "Quadriceps",
    "Hamstrings",
    "Glutes",
    "Calves",
    "Abs",
    "Obliques",
    "Lats",
    "Traps",
    "Rhomboids",
    "Deltoids",
];

/// Exercise catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    /// Category label (see [`Category`])
    pub category: String,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub muscle_groups: MuscleGroups,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Exercise {
    /// The exercise's category, if it is one of the known labels.
    pub fn category(&self) -> Option<Category> {
        self.category.parse().ok()
    }
}

/// Fields accepted by `POST /exercises` and `PUT /exercises/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseInput {
    pub name: String,
    pub category: String,
    pub muscle_groups: MuscleGroups,
    pub equipment: String,
    pub instructions: String,
}

/// The fixed set of exercise categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Cardio,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Chest,
        Category::Back,
        Category::Legs,
        Category::Shoulders,
        Category::Arms,
        Category::Core,
        Category::Cardio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Chest => "Chest",
            Category::Back => "Back",
            Category::Legs => "Legs",
            Category::Shoulders => "Shoulders",
            Category::Arms => "Arms",
            Category::Core => "Core",
            Category::Cardio => "Cardio",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded `muscle_groups` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuscleGroups {
    Decoded(Vec<String>),
    /// The raw value did not decode as a list of strings.
    Malformed(String),
}

impl Default for MuscleGroups {
    fn default() -> Self {
        MuscleGroups::Decoded(Vec::new())
    }
}

impl MuscleGroups {
    pub fn new(groups: Vec<String>) -> Self {
        MuscleGroups::Decoded(groups)
    }

    /// Decode a JSON value as sent by the backend: either a JSON-encoded
    /// string or (from local storage / newer backends) a plain array.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => MuscleGroups::default(),
            Value::String(raw) => Self::parse_encoded(&raw),
            Value::Array(items) => {
                let groups: Option<Vec<String>> = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect();
                match groups {
                    Some(groups) => MuscleGroups::Decoded(groups),
                    None => Self::malformed(Value::Array(items).to_string()),
                }
            }
            other => Self::malformed(other.to_string()),
        }
    }

    /// Decode a JSON-encoded string such as `["Chest", "Triceps"]`.
    pub fn parse_encoded(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return MuscleGroups::default();
        }
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(groups) => MuscleGroups::Decoded(groups),
            Err(_) => Self::malformed(raw.to_string()),
        }
    }

    fn malformed(raw: String) -> Self {
        tracing::warn!(raw = %raw, "Malformed muscle_groups value");
        MuscleGroups::Malformed(raw)
    }

    /// Groups to display; a malformed value shows as no groups.
    pub fn as_slice(&self) -> &[String] {
        match self {
            MuscleGroups::Decoded(groups) => groups,
            MuscleGroups::Malformed(_) => &[],
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, MuscleGroups::Malformed(_))
    }

    /// The value as stored by the backend (JSON-encoded string).
    pub fn encode(&self) -> String {
        match self {
            MuscleGroups::Decoded(groups) => {
                serde_json::to_string(groups).unwrap_or_else(|_| "[]".to_string())
            }
            MuscleGroups::Malformed(raw) => raw.clone(),
        }
    }

    /// Human-readable list, as shown on exercise cards.
    pub fn display(&self) -> String {
        let groups = self.as_slice();
        if groups.is_empty() {
            "Not specified".to_string()
        } else {
            groups.join(", ")
        }
    }
}

impl Serialize for MuscleGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for MuscleGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(MuscleGroups::from_value(value))
    }
}
