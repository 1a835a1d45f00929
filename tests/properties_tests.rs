//! Derived figures and form rules through the public API.

use chrono::NaiveDate;
use fitness_tracker::forms::ExerciseForm;
use fitness_tracker::models::stats::{bmi, weekly_buckets, BmiCategory};
use fitness_tracker::models::{HealthMetrics, ProgressStats, User, Workout};
use serde_json::json;

fn user(weight: f64, height: f64) -> User {
    serde_json::from_value(json!({
        "id": 1, "name": "Test", "email": "t@example.com",
        "age": 30, "weight": weight, "height": height
    }))
    .unwrap()
}

fn workout(id: i64, date: &str, completed: bool) -> Workout {
    serde_json::from_value(json!({
        "id": id, "user_id": 1, "name": format!("W{}", id), "date": date,
        "completed": completed, "duration": 45
    }))
    .unwrap()
}

#[test]
fn test_bmi_categories() {
    let normal = HealthMetrics::for_user(&user(70.0, 175.0));
    assert_eq!(normal.bmi, Some(22.9));
    assert_eq!(normal.bmi_category.map(|c| c.to_string()), Some("Normal".to_string()));

    let under = HealthMetrics::for_user(&user(50.0, 180.0));
    assert_eq!(under.bmi_category, Some(BmiCategory::Underweight));

    assert_eq!(bmi(Some(70.0), None), None);
    assert_eq!(bmi(Some(0.0), Some(175.0)), None);
}

#[test]
fn test_empty_muscle_groups_never_submit() {
    let mut form = ExerciseForm::new_exercise();
    form.values.name = "Burpees".to_string();
    form.values.category = "Cardio".to_string();

    let mut called = false;
    assert!(form.submit(|_| called = true).is_none());
    assert!(!called);
    assert_eq!(
        form.errors().get("muscle_groups"),
        Some("At least one muscle group is required")
    );

    form.values.toggle_muscle_group("Abs");
    let input = form.submit(|input| input).expect("valid after selecting a group");
    assert_eq!(input.muscle_groups.as_slice(), ["Abs".to_string()]);
}

#[test]
fn test_same_week_workouts_share_a_bucket() {
    // Sunday 2024-03-10 through Saturday 2024-03-16, then the next Sunday
    let workouts = vec![
        workout(1, "2024-03-10", true),
        workout(2, "2024-03-13", false),
        workout(3, "2024-03-16T20:00:00Z", true),
        workout(4, "2024-03-17", true),
        workout(5, "not a date", true),
    ];
    let buckets = weekly_buckets(&workouts);
    assert_eq!(buckets.len(), 2);

    assert_eq!(buckets[0].week_start, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    assert_eq!(buckets[0].total, 3);
    assert_eq!(buckets[0].completed, 2);
    assert_eq!(buckets[0].completion_rate(), 67);

    assert_eq!(buckets[1].week_start, NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
    assert_eq!((buckets[1].completed, buckets[1].total), (1, 1));
}

#[test]
fn test_progress_stats_over_completed_workouts() {
    let workouts = vec![
        workout(1, "2024-03-10", true),
        workout(2, "2024-03-11", false),
        workout(3, "2024-03-12", true),
    ];
    let stats = ProgressStats::from_workouts(&workouts);
    assert_eq!(stats.total_workouts, 3);
    assert_eq!(stats.completed_count, 2);
    assert_eq!(stats.completion_rate, 67);
    assert_eq!(stats.avg_duration, 45);
    assert_eq!(stats.total_duration, 90);

    let none: Vec<Workout> = Vec::new();
    assert_eq!(ProgressStats::from_workouts(&none), ProgressStats::default());
}
