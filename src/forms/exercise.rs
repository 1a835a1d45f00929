//! Exercise catalog form.

use validator::{Validate, ValidationError};

use crate::forms::{rule_error, text_between, Form, FormModel};
use crate::models::exercise::MUSCLE_GROUP_OPTIONS;
use crate::models::{Category, Exercise, ExerciseInput, MuscleGroups};

/// Values of the exercise form.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ExerciseFormValues {
    #[validate(custom(function = "validate_exercise_name"))]
    pub name: String,
    #[validate(custom(function = "validate_category"))]
    pub category: String,
    #[validate(length(min = 1, message = "At least one muscle group is required"))]
    pub muscle_groups: Vec<String>,
    #[validate(length(max = 50, message = "Equipment must be less than 50 characters"))]
    pub equipment: String,
    #[validate(length(max = 500, message = "Instructions must be less than 500 characters"))]
    pub instructions: String,
}

impl ExerciseFormValues {
    /// Values prefilled from an existing exercise.
    ///
    /// A malformed muscle-group value starts as an empty selection.
    pub fn from_exercise(exercise: &Exercise) -> Self {
        Self {
            name: exercise.name.clone(),
            category: exercise.category.clone(),
            muscle_groups: exercise.muscle_groups.as_slice().to_vec(),
            equipment: exercise.equipment.clone().unwrap_or_default(),
            instructions: exercise.instructions.clone().unwrap_or_default(),
        }
    }

    /// Select `group` if unselected, otherwise deselect it.
    ///
    /// Only the known muscle-group options can be selected.
    pub fn toggle_muscle_group(&mut self, group: &str) {
        if let Some(pos) = self.muscle_groups.iter().position(|g| g == group) {
            self.muscle_groups.remove(pos);
        } else if MUSCLE_GROUP_OPTIONS.contains(&group) {
            self.muscle_groups.push(group.to_string());
        } else {
            tracing::debug!(group, "Ignoring unknown muscle group");
        }
    }

    pub fn is_selected(&self, group: &str) -> bool {
        self.muscle_groups.iter().any(|g| g == group)
    }
}

impl FormModel for ExerciseFormValues {
    type Output = ExerciseInput;

    fn to_output(&self) -> ExerciseInput {
        ExerciseInput {
            name: self.name.trim().to_string(),
            category: self.category.clone(),
            muscle_groups: MuscleGroups::new(self.muscle_groups.clone()),
            equipment: self.equipment.trim().to_string(),
            instructions: self.instructions.trim().to_string(),
        }
    }
}

pub type ExerciseForm = Form<ExerciseFormValues>;

impl ExerciseForm {
    pub fn new_exercise() -> Self {
        Form::create(ExerciseFormValues::default())
    }

    pub fn for_exercise(exercise: &Exercise) -> Self {
        Form::edit(ExerciseFormValues::from_exercise(exercise))
    }
}

fn validate_exercise_name(name: &str) -> Result<(), ValidationError> {
    text_between(
        name,
        2,
        100,
        [
            "Exercise name is required",
            "Name must be at least 2 characters",
            "Name must be less than 100 characters",
        ],
    )
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        return Err(rule_error("required", "Category is required"));
    }
    category
        .parse::<Category>()
        .map(|_| ())
        .map_err(|_| rule_error("one_of", "Please select a valid category"))
}
