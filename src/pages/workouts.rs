// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workouts page.
//!
//! Lists the user's workouts next to the exercise catalog (needed by the
//! workout form), and drives the workout lifecycle:
//! 1. Create from a validated [`WorkoutDraft`]
//! 2. Start / stop the active workout (local state only)
//! 3. Complete, which persists completion and then clears the active workout
//! 4. Append or remove embedded exercise entries
//! 5. Delete, after confirmation

use chrono::{DateTime, NaiveDate, Utc};

use crate::api::ApiClient;
use crate::error::Result;
use crate::forms::WorkoutDraft;
use crate::models::workout::DEFAULT_COMPLETION_MINUTES;
use crate::models::{Exercise, NewWorkout, NewWorkoutExercise, Workout, WorkoutUpdate};
use crate::pages::{created_id, merge_by_id, remove_by_id, ActionError, Confirm, Loader, PageState};
use crate::time_utils::{format_date, format_utc_rfc3339};

const DELETE_WORKOUT_PROMPT: &str = "Are you sure you want to delete this workout?";
const REMOVE_ENTRY_PROMPT: &str = "Remove this exercise from the workout?";

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutsData {
    pub workouts: Vec<Workout>,
    pub exercises: Vec<Exercise>,
}

impl WorkoutsData {
    pub fn workout(&self, id: i64) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }
}

/// Workout currently being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWorkout {
    pub workout_id: i64,
    pub started_at: DateTime<Utc>,
}

pub struct WorkoutsPage {
    api: ApiClient,
    user_id: i64,
    loader: Loader<WorkoutsData>,
    active: Option<ActiveWorkout>,
    action_error: ActionError,
}

impl WorkoutsPage {
    pub fn new(api: ApiClient, user_id: i64) -> Self {
        Self {
            api,
            user_id,
            loader: Loader::new(),
            active: None,
            action_error: ActionError::default(),
        }
    }

    pub async fn load(&mut self) {
        let ticket = self.loader.begin();
        let result = fetch(&self.api, self.user_id).await;
        self.loader.finish(ticket, result);
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    pub fn state(&self) -> &PageState<WorkoutsData> {
        self.loader.state()
    }

    pub fn active(&self) -> Option<&ActiveWorkout> {
        self.active.as_ref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.get()
    }

    /// Create a workout scheduled on `date`; returns the new id.
    pub async fn create(&mut self, draft: WorkoutDraft, date: NaiveDate) -> Option<i64> {
        let workout = NewWorkout {
            user_id: self.user_id,
            name: draft.name,
            date: format_date(date),
            notes: draft.notes,
            completed: false,
            duration: None,
            exercises: draft.exercises,
        };
        let result = self.create_and_fetch(&workout).await;
        let created = self.action_error.settle("create_workout", result)?;
        let id = created.id;
        tracing::info!(workout_id = id, "Workout created");
        self.merge(created);
        Some(id)
    }

    async fn create_and_fetch(&self, workout: &NewWorkout) -> Result<Workout> {
        let ack = self.api.create_workout(workout).await?;
        let id = created_id(ack.id, "workout")?;
        self.api.get_workout(id).await
    }

    /// Delete `id` after confirmation; true if it was deleted.
    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(DELETE_WORKOUT_PROMPT) {
            tracing::debug!(workout_id = id, "Workout deletion declined");
            return false;
        }
        let result = self.api.delete_workout(id).await;
        if self.action_error.settle("delete_workout", result).is_none() {
            return false;
        }
        if let Some(data) = self.loader.data_mut() {
            remove_by_id(&mut data.workouts, id);
        }
        if self.active.is_some_and(|a| a.workout_id == id) {
            self.active = None;
        }
        true
    }

    /// Make `id` the active workout.
    pub fn start(&mut self, id: i64, now: DateTime<Utc>) -> bool {
        let known = self
            .loader
            .data()
            .is_some_and(|data| data.workout(id).is_some());
        if known {
            self.active = Some(ActiveWorkout {
                workout_id: id,
                started_at: now,
            });
        }
        known
    }

    pub fn stop(&mut self) {
        self.active = None;
    }

    /// Mark `id` completed at `now`.
    ///
    /// The active workout is cleared once the server accepts the
    /// completion; a failed request leaves it running.
    pub async fn complete(&mut self, id: i64, now: DateTime<Utc>) -> bool {
        let update = WorkoutUpdate::completion(format_utc_rfc3339(now), DEFAULT_COMPLETION_MINUTES);
        let result = self.update_and_fetch(id, &update).await;
        match self.action_error.settle("complete_workout", result) {
            Some(workout) => {
                tracing::info!(workout_id = id, "Workout completed");
                if self.active.is_some_and(|a| a.workout_id == id) {
                    self.active = None;
                }
                self.merge(workout);
                true
            }
            None => false,
        }
    }

    async fn update_and_fetch(&self, id: i64, update: &WorkoutUpdate) -> Result<Workout> {
        self.api.update_workout(id, update).await?;
        self.api.get_workout(id).await
    }

    /// Append an exercise entry to an existing workout.
    pub async fn add_exercise(&mut self, entry: NewWorkoutExercise) -> bool {
        let workout_id = entry.workout_id;
        let result = self.add_and_fetch(&entry).await;
        match self.action_error.settle("add_workout_exercise", result) {
            Some(workout) => {
                self.merge(workout);
                true
            }
            None => {
                tracing::debug!(workout_id, "Exercise entry not added");
                false
            }
        }
    }

    async fn add_and_fetch(&self, entry: &NewWorkoutExercise) -> Result<Workout> {
        self.api.create_workout_exercise(entry).await?;
        self.api.get_workout(entry.workout_id).await
    }

    /// Remove entry `entry_id` from workout `workout_id` after confirmation.
    pub async fn remove_exercise(
        &mut self,
        workout_id: i64,
        entry_id: i64,
        confirm: &dyn Confirm,
    ) -> bool {
        if !confirm.confirm(REMOVE_ENTRY_PROMPT) {
            return false;
        }
        let result = self.api.delete_workout_exercise(entry_id).await;
        if self
            .action_error
            .settle("remove_workout_exercise", result)
            .is_none()
        {
            return false;
        }
        if let Some(workout) = self
            .loader
            .data_mut()
            .and_then(|data| data.workouts.iter_mut().find(|w| w.id == workout_id))
        {
            workout.exercises.retain(|e| e.id != Some(entry_id));
        }
        true
    }

    fn merge(&mut self, workout: Workout) {
        if let Some(data) = self.loader.data_mut() {
            merge_by_id(&mut data.workouts, workout);
        }
    }
}

async fn fetch(api: &ApiClient, user_id: i64) -> Result<WorkoutsData> {
    let (workouts, exercises) =
        tokio::try_join!(api.get_workouts(Some(user_id)), api.get_exercises())?;
    Ok(WorkoutsData {
        workouts,
        exercises,
    })
}
