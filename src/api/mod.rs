// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API client with a selectable storage strategy.
//!
//! Every call is expressed as an [`ApiRequest`] (method, path, optional JSON
//! body) and handed to a [`Backend`]:
//! - `Remote`: the REST backend over HTTP
//! - `Local`: [`LocalApi`] over the key-value store
//! - `RemoteWithFallback`: HTTP first; if the request never reaches the
//!   server, the same request is answered locally

pub mod http;
pub mod local;

pub use http::HttpClient;
pub use local::LocalApi;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, StorageMode};
use crate::error::Result;
use crate::models::{
    AuthResponse, Exercise, ExerciseInput, HealthStatus, LoginRequest, MutationAck, NewWorkout,
    NewWorkoutExercise, SignupRequest, User, UserInput, Workout, WorkoutExercise, WorkoutUpdate,
};
use crate::session::Session;
use crate::storage::KeyValueStore;

/// HTTP verbs used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// One logical API call, independent of where it is answered.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, including any query string
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// Where requests are answered.
pub enum Backend {
    Remote(HttpClient),
    Local(LocalApi),
    RemoteWithFallback { remote: HttpClient, local: LocalApi },
}

impl Backend {
    pub fn mode(&self) -> StorageMode {
        match self {
            Backend::Remote(_) => StorageMode::Remote,
            Backend::Local(_) => StorageMode::Local,
            Backend::RemoteWithFallback { .. } => StorageMode::RemoteWithFallback,
        }
    }

    async fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<Value> {
        match self {
            Backend::Remote(remote) => remote.execute(request, token).await,
            Backend::Local(local) => local.execute(request),
            Backend::RemoteWithFallback { remote, local } => {
                match remote.execute(request, token).await {
                    Err(e) if e.is_network() => {
                        tracing::warn!(
                            method = %request.method,
                            path = %request.path,
                            error = %e,
                            "Backend unreachable, using local storage"
                        );
                        local.execute(request)
                    }
                    other => other,
                }
            }
        }
    }
}

/// Typed API client.
///
/// Cheap to clone; clones share the backend. The session, when attached,
/// supplies the bearer token and the default user id.
#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<Backend>,
    session: Option<Session>,
}

impl ApiClient {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend: Arc::new(backend),
            session: None,
        }
    }

    /// Build the client selected by `config.storage_mode`.
    pub fn from_config(config: &Config, store: Arc<dyn KeyValueStore>) -> Self {
        let backend = match config.storage_mode {
            StorageMode::Remote => Backend::Remote(HttpClient::new(&config.api_base_url)),
            StorageMode::Local => Backend::Local(LocalApi::new(store)),
            StorageMode::RemoteWithFallback => Backend::RemoteWithFallback {
                remote: HttpClient::new(&config.api_base_url),
                local: LocalApi::new(store),
            },
        };
        tracing::debug!(mode = %config.storage_mode, "API client configured");
        Self::new(backend)
    }

    /// A client sharing this backend with `session` attached.
    pub fn with_session(&self, session: Option<Session>) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            session,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> StorageMode {
        self.backend.mode()
    }

    /// Execute a raw request.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        let token = self.session.as_ref().map(|s| s.token.as_str());
        self.backend.execute(request, token).await
    }

    /// Execute a request and decode the response body.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let value = self.execute(&request).await?;
        Ok(serde_json::from_value(value)?)
    }

    // ─── Users ───────────────────────────────────────────────

    pub async fn get_users(&self) -> Result<Vec<User>> {
        self.request(ApiRequest::get("/users")).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.request(ApiRequest::get(format!("/users/{}", id))).await
    }

    pub async fn update_user(&self, id: i64, input: &UserInput) -> Result<MutationAck> {
        self.request(ApiRequest::put(format!("/users/{}", id), to_body(input)?))
            .await
    }

    // ─── Exercises ───────────────────────────────────────────

    pub async fn get_exercises(&self) -> Result<Vec<Exercise>> {
        self.request(ApiRequest::get("/exercises")).await
    }

    pub async fn get_exercise(&self, id: i64) -> Result<Exercise> {
        self.request(ApiRequest::get(format!("/exercises/{}", id)))
            .await
    }

    pub async fn create_exercise(&self, input: &ExerciseInput) -> Result<MutationAck> {
        self.request(ApiRequest::post("/exercises", to_body(input)?))
            .await
    }

    pub async fn update_exercise(&self, id: i64, input: &ExerciseInput) -> Result<MutationAck> {
        self.request(ApiRequest::put(
            format!("/exercises/{}", id),
            to_body(input)?,
        ))
        .await
    }

    pub async fn delete_exercise(&self, id: i64) -> Result<MutationAck> {
        self.request(ApiRequest::delete(format!("/exercises/{}", id)))
            .await
    }

    // ─── Workouts ────────────────────────────────────────────

    /// All workouts, or only `user_id`'s when given.
    pub async fn get_workouts(&self, user_id: Option<i64>) -> Result<Vec<Workout>> {
        let path = match user_id {
            Some(user_id) => format!("/workouts?user_id={}", user_id),
            None => "/workouts".to_string(),
        };
        self.request(ApiRequest::get(path)).await
    }

    pub async fn get_workout(&self, id: i64) -> Result<Workout> {
        self.request(ApiRequest::get(format!("/workouts/{}", id)))
            .await
    }

    pub async fn create_workout(&self, workout: &NewWorkout) -> Result<MutationAck> {
        self.request(ApiRequest::post("/workouts", to_body(workout)?))
            .await
    }

    pub async fn update_workout(&self, id: i64, update: &WorkoutUpdate) -> Result<MutationAck> {
        self.request(ApiRequest::put(
            format!("/workouts/{}", id),
            to_body(update)?,
        ))
        .await
    }

    pub async fn delete_workout(&self, id: i64) -> Result<MutationAck> {
        self.request(ApiRequest::delete(format!("/workouts/{}", id)))
            .await
    }

    // ─── Workout exercises ───────────────────────────────────

    pub async fn get_workout_exercises(&self, workout_id: i64) -> Result<Vec<WorkoutExercise>> {
        self.request(ApiRequest::get(format!(
            "/workout-exercises/{}",
            workout_id
        )))
        .await
    }

    pub async fn create_workout_exercise(
        &self,
        entry: &NewWorkoutExercise,
    ) -> Result<MutationAck> {
        self.request(ApiRequest::post("/workout-exercises", to_body(entry)?))
            .await
    }

    pub async fn delete_workout_exercise(&self, id: i64) -> Result<MutationAck> {
        self.request(ApiRequest::delete(format!("/workout-exercises/{}", id)))
            .await
    }

    // ─── Auth & health ───────────────────────────────────────

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        self.request(ApiRequest::post("/auth/signup", to_body(request)?))
            .await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        self.request(ApiRequest::post("/auth/login", to_body(request)?))
            .await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.request(ApiRequest::get("/health")).await
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
