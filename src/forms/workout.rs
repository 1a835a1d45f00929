//! Workout creation form and the inline add-exercise form.

use validator::{Validate, ValidationError};

use crate::forms::{
    finite_between, number_between, text_between, to_u32, Form, FormErrors, FormModel,
};
use crate::models::workout::DEFAULT_REST_SECS;
use crate::models::{NewWorkoutEntry, NewWorkoutExercise, Workout};

// ─── Workout form ────────────────────────────────────────────

/// One exercise row of the workout form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct WorkoutEntryValues {
    #[validate(required(message = "Exercise is required"))]
    pub exercise_id: Option<i64>,
    #[validate(
        required(message = "Sets are required"),
        custom(function = "validate_sets")
    )]
    pub sets: Option<i64>,
    #[validate(
        required(message = "Reps are required"),
        custom(function = "validate_reps")
    )]
    pub reps: Option<i64>,
    /// Kilograms
    #[validate(custom(function = "validate_weight"))]
    pub weight: Option<f64>,
    /// Seconds
    #[validate(custom(function = "validate_rest_time"))]
    pub rest_time: Option<i64>,
    pub notes: String,
}

impl Default for WorkoutEntryValues {
    fn default() -> Self {
        Self {
            exercise_id: None,
            sets: Some(3),
            reps: Some(10),
            weight: Some(0.0),
            rest_time: Some(i64::from(DEFAULT_REST_SECS)),
            notes: String::new(),
        }
    }
}

impl WorkoutEntryValues {
    fn to_entry(&self) -> NewWorkoutEntry {
        NewWorkoutEntry {
            exercise_id: self.exercise_id.unwrap_or_default(),
            sets: to_u32(self.sets),
            reps: to_u32(self.reps),
            weight: self.weight.unwrap_or(0.0),
            rest_time: match self.rest_time {
                Some(_) => to_u32(self.rest_time),
                None => DEFAULT_REST_SECS,
            },
            notes: self.notes.trim().to_string(),
        }
    }
}

/// Values of the workout form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct WorkoutFormValues {
    #[validate(custom(function = "validate_workout_name"))]
    pub name: String,
    #[validate(length(max = 200, message = "Notes must be less than 200 characters"))]
    pub notes: String,
    pub exercises: Vec<WorkoutEntryValues>,
}

impl Default for WorkoutFormValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            notes: String::new(),
            exercises: vec![WorkoutEntryValues::default()],
        }
    }
}

impl WorkoutFormValues {
    /// Values prefilled from an existing workout.
    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            name: workout.name.clone(),
            notes: workout.notes.clone().unwrap_or_default(),
            exercises: workout
                .exercises
                .iter()
                .map(|e| WorkoutEntryValues {
                    exercise_id: e.exercise_id,
                    sets: Some(i64::from(e.sets)),
                    reps: Some(i64::from(e.reps)),
                    weight: Some(e.weight.unwrap_or(0.0)),
                    rest_time: Some(i64::from(e.rest_secs())),
                    notes: e.notes.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }

    /// Append a row with default values.
    pub fn add_entry(&mut self) {
        self.exercises.push(WorkoutEntryValues::default());
    }

    /// Remove the row at `index`; out-of-range indices are ignored.
    pub fn remove_entry(&mut self, index: usize) {
        if index < self.exercises.len() {
            self.exercises.remove(index);
        }
    }
}

/// Validated workout form output; the page adds owner and date.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub name: String,
    pub notes: String,
    pub exercises: Vec<NewWorkoutEntry>,
}

impl FormModel for WorkoutFormValues {
    type Output = WorkoutDraft;

    fn check_extra(&self, errors: &mut FormErrors) {
        if self.exercises.is_empty() {
            errors.add("exercises", "At least one exercise is required");
        }
        for (index, entry) in self.exercises.iter().enumerate() {
            if let Err(e) = entry.validate() {
                errors.extend_from(Some(&format!("exercises.{}", index)), &e);
            }
        }
    }

    fn to_output(&self) -> WorkoutDraft {
        WorkoutDraft {
            name: self.name.trim().to_string(),
            notes: self.notes.trim().to_string(),
            exercises: self.exercises.iter().map(WorkoutEntryValues::to_entry).collect(),
        }
    }
}

pub type WorkoutForm = Form<WorkoutFormValues>;

impl WorkoutForm {
    pub fn new_workout() -> Self {
        Form::create(WorkoutFormValues::default())
    }

    pub fn for_workout(workout: &Workout) -> Self {
        Form::edit(WorkoutFormValues::from_workout(workout))
    }
}

fn validate_workout_name(name: &str) -> Result<(), ValidationError> {
    text_between(
        name,
        2,
        50,
        [
            "Workout name is required",
            "Name must be at least 2 characters",
            "Name must be less than 50 characters",
        ],
    )
}

fn validate_sets(sets: i64) -> Result<(), ValidationError> {
    number_between(sets, 1, 20, "Must have at least 1 set", "Cannot exceed 20 sets")
}

fn validate_reps(reps: i64) -> Result<(), ValidationError> {
    number_between(reps, 1, 100, "Must have at least 1 rep", "Cannot exceed 100 reps")
}

fn validate_weight(weight: f64) -> Result<(), ValidationError> {
    finite_between(
        weight,
        0.0,
        1000.0,
        "Weight cannot be negative",
        "Weight cannot exceed 1000kg",
    )
}

fn validate_rest_time(rest: i64) -> Result<(), ValidationError> {
    number_between(
        rest,
        0,
        600,
        "Rest time cannot be negative",
        "Rest time cannot exceed 10 minutes",
    )
}

// ─── Add-exercise form ───────────────────────────────────────

/// Inline form appending one exercise to an existing workout.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct AddExerciseValues {
    pub workout_id: i64,
    #[validate(required(message = "Exercise is required"))]
    pub exercise_id: Option<i64>,
    #[validate(
        required(message = "Sets are required"),
        range(min = 1, message = "Must have at least 1 set")
    )]
    pub sets: Option<i64>,
    #[validate(
        required(message = "Reps are required"),
        range(min = 1, message = "Must have at least 1 rep")
    )]
    pub reps: Option<i64>,
    #[validate(custom(function = "validate_added_weight"))]
    pub weight: Option<f64>,
}

impl AddExerciseValues {
    pub fn new(workout_id: i64) -> Self {
        Self {
            workout_id,
            exercise_id: None,
            sets: None,
            reps: None,
            weight: None,
        }
    }
}

impl FormModel for AddExerciseValues {
    type Output = NewWorkoutExercise;

    fn to_output(&self) -> NewWorkoutExercise {
        NewWorkoutExercise {
            workout_id: self.workout_id,
            exercise_id: self.exercise_id.unwrap_or_default(),
            sets: to_u32(self.sets),
            reps: to_u32(self.reps),
            weight: self.weight.unwrap_or(0.0),
            rest_time: DEFAULT_REST_SECS,
            notes: String::new(),
        }
    }
}

pub type AddExerciseForm = Form<AddExerciseValues>;

fn validate_added_weight(weight: f64) -> Result<(), ValidationError> {
    finite_between(weight, 0.0, f64::MAX, "Weight cannot be negative", "Weight is too large")
}

impl AddExerciseForm {
    pub fn for_workout_id(workout_id: i64) -> Self {
        Form::create(AddExerciseValues::new(workout_id))
    }
}
