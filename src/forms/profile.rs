//! Profile edit form.

use validator::{Validate, ValidateEmail, ValidationError};

use crate::forms::{
    finite_between, number_between, rule_error, text_between, to_u32, Form, FormModel,
};
use crate::models::{Goal, User, UserInput};

/// Values of the profile form.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProfileFormValues {
    #[validate(custom(function = "validate_profile_name"))]
    pub name: String,
    #[validate(custom(function = "validate_profile_email"))]
    pub email: String,
    #[validate(
        required(message = "Age is required"),
        custom(function = "validate_age")
    )]
    pub age: Option<i64>,
    /// Kilograms
    #[validate(
        required(message = "Weight is required"),
        custom(function = "validate_body_weight")
    )]
    pub weight: Option<f64>,
    /// Centimeters
    #[validate(
        required(message = "Height is required"),
        custom(function = "validate_height")
    )]
    pub height: Option<f64>,
    #[validate(custom(function = "validate_goal"))]
    pub goal: String,
}

impl ProfileFormValues {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age.map(i64::from),
            weight: user.weight,
            height: user.height,
            goal: user.goal.clone().unwrap_or_default(),
        }
    }
}

impl FormModel for ProfileFormValues {
    type Output = UserInput;

    fn to_output(&self) -> UserInput {
        UserInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            age: self.age.map(|a| to_u32(Some(a))),
            weight: self.weight,
            height: self.height,
            goal: Some(self.goal.clone()),
        }
    }
}

pub type ProfileForm = Form<ProfileFormValues>;

impl ProfileForm {
    pub fn for_user(user: &User) -> Self {
        Form::edit(ProfileFormValues::from_user(user))
    }
}

fn validate_profile_name(name: &str) -> Result<(), ValidationError> {
    text_between(
        name,
        2,
        50,
        [
            "Name is required",
            "Name must be at least 2 characters",
            "Name must be less than 50 characters",
        ],
    )
}

fn validate_profile_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        Err(rule_error("required", "Email is required"))
    } else if !email.validate_email() {
        Err(rule_error("email", "Invalid email format"))
    } else {
        Ok(())
    }
}

fn validate_age(age: i64) -> Result<(), ValidationError> {
    number_between(age, 13, 120, "Must be at least 13 years old", "Age must be realistic")
}

fn validate_body_weight(weight: f64) -> Result<(), ValidationError> {
    finite_between(
        weight,
        20.0,
        300.0,
        "Weight must be at least 20kg",
        "Weight must be less than 300kg",
    )
}

fn validate_height(height: f64) -> Result<(), ValidationError> {
    finite_between(
        height,
        100.0,
        250.0,
        "Height must be at least 100cm",
        "Height must be less than 250cm",
    )
}

fn validate_goal(goal: &str) -> Result<(), ValidationError> {
    if goal.trim().is_empty() {
        return Err(rule_error("required", "Goal is required"));
    }
    goal.parse::<Goal>()
        .map(|_| ())
        .map_err(|_| rule_error("one_of", "Please select a valid goal"))
}
