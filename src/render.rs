//! Plain-text rendering of page elements.

use crate::models::{Exercise, Workout};
use crate::session::Session;
use crate::time_utils::parse_date;

const PROGRESS_BAR_WIDTH: usize = 20;

/// Page links in navbar order.
pub const NAV_LINKS: [&str; 5] = ["Dashboard", "Workouts", "Exercises", "Progress", "Profile"];

/// Navigation line; highlights `active` and reflects the session.
pub fn navbar(active: &str, session: Option<&Session>) -> String {
    let links: Vec<String> = NAV_LINKS
        .iter()
        .map(|link| {
            if link.eq_ignore_ascii_case(active) {
                format!("[{}]", link)
            } else {
                link.to_string()
            }
        })
        .collect();
    let account = match session {
        Some(session) => format!("user #{} | Logout", session.user_id),
        None => "Login | Sign up".to_string(),
    };
    format!("{} | {}", links.join("  "), account)
}

pub fn stat_tile(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<18} {}", format!("{}:", label), value)
}

/// Fixed-width bar for a percentage, clamped to 0..=100.
pub fn progress_bar(percent: i64) -> String {
    let percent = percent.clamp(0, 100) as usize;
    let filled = percent * PROGRESS_BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        percent
    )
}

pub fn workout_card(workout: &Workout) -> String {
    let status = if workout.completed { "done" } else { "planned" };
    let date = parse_date(&workout.date)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| workout.date.clone());
    let mut lines = vec![format!("#{} {} ({}) {}", workout.id, workout.name, status, date)];
    if let Some(duration) = workout.duration {
        lines.push(format!("  {} min", duration));
    }
    for entry in &workout.exercises {
        lines.push(format!(
            "  - {}: {}x{} @ {}kg, rest {}s",
            entry.display_name(),
            entry.sets,
            entry.reps,
            entry.weight.unwrap_or(0.0),
            entry.rest_secs()
        ));
    }
    if let Some(notes) = workout.notes.as_deref().filter(|n| !n.is_empty()) {
        lines.push(format!("  Notes: {}", notes));
    }
    lines.join("\n")
}

pub fn exercise_card(exercise: &Exercise) -> String {
    let mut lines = vec![
        format!("#{} {} [{}]", exercise.id, exercise.name, exercise.category),
        format!("  Muscles: {}", exercise.muscle_groups.display()),
    ];
    if let Some(equipment) = exercise.equipment.as_deref().filter(|e| !e.is_empty()) {
        lines.push(format!("  Equipment: {}", equipment));
    }
    if let Some(instructions) = exercise.instructions.as_deref().filter(|i| !i.is_empty()) {
        lines.push(format!("  {}", instructions));
    }
    lines.join("\n")
}
