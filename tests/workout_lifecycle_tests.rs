// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout mutations through the workouts page against the mock backend.

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use common::MockBackend;
use fitness_tracker::forms::{AddExerciseForm, WorkoutForm};
use fitness_tracker::pages::{AlwaysConfirm, NeverConfirm, WorkoutsPage};

async fn loaded_page(backend: &MockBackend) -> WorkoutsPage {
    let mut page = WorkoutsPage::new(backend.client(), 1);
    page.load().await;
    assert!(page.state().data().is_some());
    page
}

#[tokio::test]
async fn test_delete_removes_exactly_the_matching_workout() {
    let backend = MockBackend::start().await;
    let mut page = loaded_page(&backend).await;

    assert!(page.delete(2, &AlwaysConfirm).await);

    let ids: Vec<i64> = page
        .state()
        .data()
        .unwrap()
        .workouts
        .iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(backend.workout_ids(), vec![1, 3]);
}

#[tokio::test]
async fn test_declined_confirmation_makes_no_request() {
    let backend = MockBackend::start().await;
    let mut page = loaded_page(&backend).await;

    assert!(!page.delete(2, &NeverConfirm).await);
    assert_eq!(backend.hits("DELETE /workouts/:id"), 0);
    assert_eq!(page.state().data().unwrap().workouts.len(), 2);
    assert!(page.action_error().is_none());
}

#[tokio::test]
async fn test_failed_delete_is_reported_without_reloading() {
    let backend = MockBackend::start().await;
    let mut page = loaded_page(&backend).await;

    backend.set_failing(true);
    assert!(!page.delete(1, &AlwaysConfirm).await);
    assert_eq!(page.action_error(), Some("Internal server error"));
    // Loaded data is untouched
    assert_eq!(page.state().data().unwrap().workouts.len(), 2);
}

#[tokio::test]
async fn test_complete_persists_completion_and_clears_active() {
    let backend = MockBackend::start().await;
    let mut page = loaded_page(&backend).await;
    let now = Utc.with_ymd_and_hms(2024, 3, 12, 19, 15, 0).unwrap();

    assert!(page.start(2, now));
    assert_eq!(page.active().map(|a| a.workout_id), Some(2));

    // A failed request leaves the workout running
    backend.set_failing(true);
    assert!(!page.complete(2, now).await);
    assert_eq!(page.active().map(|a| a.workout_id), Some(2));
    assert_eq!(page.action_error(), Some("Internal server error"));

    backend.set_failing(false);
    assert!(page.complete(2, now).await);
    assert!(page.active().is_none());

    let workout = page.state().data().unwrap().workout(2).unwrap().clone();
    assert!(workout.completed);
    assert_eq!(workout.completed_date.as_deref(), Some("2024-03-12T19:15:00Z"));
    assert_eq!(workout.duration, Some(60));
    // Reconciled from the server by id, not refetched wholesale
    assert_eq!(backend.hits("GET /workouts/:id"), 1);
    assert_eq!(backend.hits("GET /workouts"), 1);
}

#[tokio::test]
async fn test_create_from_form_and_manage_entries() {
    let backend = MockBackend::start().await;
    let mut page = loaded_page(&backend).await;

    let mut form = WorkoutForm::new_workout();
    form.values.name = "Full Body".to_string();
    form.values.exercises[0].exercise_id = Some(2);
    form.values.add_entry();
    form.values.exercises[1].exercise_id = Some(1);
    form.values.exercises[1].weight = Some(10.0);
    let draft = form.submit(|draft| draft).expect("valid form");

    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let id = page.create(draft, date).await.expect("created");
    assert_eq!(id, 4);

    let created = page.state().data().unwrap().workout(id).unwrap().clone();
    assert_eq!(created.date, "2024-03-15");
    let names: Vec<&str> = created.exercises.iter().map(|e| e.display_name()).collect();
    assert_eq!(names, vec!["Squats", "Push-ups"]);
    assert_eq!(created.volume(), 300.0);

    let mut add = AddExerciseForm::for_workout_id(id);
    add.values.exercise_id = Some(1);
    add.values.sets = Some(5);
    add.values.reps = Some(5);
    let entry = add.submit(|entry| entry).expect("valid entry");
    assert!(page.add_exercise(entry).await);
    let workout = page.state().data().unwrap().workout(id).unwrap().clone();
    assert_eq!(workout.exercises.len(), 3);

    let entry_id = workout.exercises[0].id.unwrap();
    assert!(page.remove_exercise(id, entry_id, &AlwaysConfirm).await);
    let workout = page.state().data().unwrap().workout(id).unwrap();
    assert_eq!(workout.exercises.len(), 2);
    assert!(workout.exercises.iter().all(|e| e.id != Some(entry_id)));
}
