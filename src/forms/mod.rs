// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Form state and validation.
//!
//! Each form holds editable values (a `validator::Validate` model), the
//! errors from the last submit, and turns valid values into the request
//! body its page sends. Rules run on submit only.

pub mod exercise;
pub mod profile;
pub mod signup;
pub mod workout;

pub use exercise::{ExerciseForm, ExerciseFormValues};
pub use profile::{ProfileForm, ProfileFormValues};
pub use signup::{LoginForm, LoginFormValues, SignupForm, SignupFormValues};
pub use workout::{
    AddExerciseForm, AddExerciseValues, WorkoutDraft, WorkoutEntryValues, WorkoutForm,
    WorkoutFormValues,
};

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// First error message per field, keyed by dotted path (`exercises.0.sets`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `validator` errors, nested structs and lists included.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut out = Self::new();
        out.extend_from(None, errors);
        out
    }

    /// Record `message` for `field` unless it already has one.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Merge `errors` with every path prefixed by `prefix.`.
    pub fn extend_from(&mut self, prefix: Option<&str>, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, field),
                None => field.to_string(),
            };
            match kind {
                ValidationErrorsKind::Field(list) => {
                    if let Some(first) = list.first() {
                        self.add(path, message_of(first));
                    }
                }
                ValidationErrorsKind::Struct(inner) => self.extend_from(Some(&path), inner),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        self.extend_from(Some(&format!("{}.{}", path, index)), inner);
                    }
                }
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.code.to_string())
}

/// Form values that can be checked and converted into a request body.
pub trait FormModel: Validate {
    type Output;

    /// Rules the derive cannot express (list minimums, per-entry checks).
    fn check_extra(&self, _errors: &mut FormErrors) {}

    /// Convert values that passed validation.
    fn to_output(&self) -> Self::Output;
}

/// Run every rule on `values`.
pub fn check<M: FormModel>(values: &M) -> Result<M::Output, FormErrors> {
    let mut errors = match values.validate() {
        Ok(()) => FormErrors::new(),
        Err(e) => FormErrors::from_validation(&e),
    };
    values.check_extra(&mut errors);
    if errors.is_empty() {
        Ok(values.to_output())
    } else {
        Err(errors)
    }
}

/// Editable form: values plus the errors from the last submit.
#[derive(Debug, Clone)]
pub struct Form<M> {
    pub values: M,
    errors: FormErrors,
    editing: bool,
}

impl<M: FormModel> Form<M> {
    pub fn create(values: M) -> Self {
        Self {
            values,
            errors: FormErrors::new(),
            editing: false,
        }
    }

    pub fn edit(values: M) -> Self {
        Self {
            values,
            errors: FormErrors::new(),
            editing: true,
        }
    }

    /// True when the form was opened on an existing record.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Validate and, when valid, hand the output to `on_submit`.
    ///
    /// Returns `None` (and keeps the errors for display) when invalid;
    /// `on_submit` is not called in that case.
    pub fn submit<R>(&mut self, on_submit: impl FnOnce(M::Output) -> R) -> Option<R> {
        match check(&self.values) {
            Ok(output) => {
                self.errors = FormErrors::new();
                Some(on_submit(output))
            }
            Err(errors) => {
                tracing::debug!(errors = %errors, "Form rejected");
                self.errors = errors;
                None
            }
        }
    }

    /// Abandon the form.
    pub fn cancel<R>(self, on_cancel: impl FnOnce() -> R) -> R {
        on_cancel()
    }
}

// ─── Shared rules ────────────────────────────────────────────

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Required text with a character-count window, each failure with its own message.
fn text_between(
    value: &str,
    min: usize,
    max: usize,
    messages: [&'static str; 3],
) -> Result<(), ValidationError> {
    let [required, too_short, too_long] = messages;
    let count = value.trim().chars().count();
    if count == 0 {
        Err(rule_error("required", required))
    } else if count < min {
        Err(rule_error("length", too_short))
    } else if count > max {
        Err(rule_error("length", too_long))
    } else {
        Ok(())
    }
}

/// Numeric window with separate low/high messages.
fn number_between<T: PartialOrd>(
    value: T,
    min: T,
    max: T,
    too_low: &'static str,
    too_high: &'static str,
) -> Result<(), ValidationError> {
    if value < min {
        Err(rule_error("range", too_low))
    } else if value > max {
        Err(rule_error("range", too_high))
    } else {
        Ok(())
    }
}

/// Like [`number_between`], but NaN and infinities are rejected first.
fn finite_between(
    value: f64,
    min: f64,
    max: f64,
    too_low: &'static str,
    too_high: &'static str,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(rule_error("number", "Must be a number"));
    }
    number_between(value, min, max, too_low, too_high)
}

/// Non-negative integer form value as the wire type.
fn to_u32(value: Option<i64>) -> u32 {
    value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
}
