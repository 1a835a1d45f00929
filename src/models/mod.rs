// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod auth;
pub mod exercise;
pub mod stats;
pub mod user;
pub mod workout;

pub use auth::{AuthResponse, ErrorBody, HealthStatus, LoginRequest, MutationAck, SignupRequest};
pub use exercise::{Category, Exercise, ExerciseInput, MuscleGroups};
pub use stats::{DashboardStats, HealthMetrics, ProgressStats, Timeframe, WeeklyBucket};
pub use user::{Goal, User, UserInput};
pub use workout::{
    NewWorkout, NewWorkoutEntry, NewWorkoutExercise, Workout, WorkoutExercise, WorkoutUpdate,
};
