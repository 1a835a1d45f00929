// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: an in-process mock of the REST backend and token minting.

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use dashmap::DashMap;
use fitness_tracker::api::{ApiClient, Backend, HttpClient};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    exp: usize,
}

/// Mint an HS256 token carrying `user_id`, as the backend's auth routes do.
#[allow(dead_code)]
pub fn mint_token(user_id: i64) -> String {
    let claims = Claims {
        user_id,
        exp: (chrono::Utc::now().timestamp() + 86400) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .expect("Failed to create JWT")
}

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Backend state shared with the tests.
#[derive(Default)]
pub struct MockState {
    pub users: Mutex<Vec<Value>>,
    pub exercises: Mutex<Vec<Value>>,
    pub workouts: Mutex<Vec<Value>>,
    /// Requests served, keyed by `"METHOD /route"`
    pub hits: DashMap<String, usize>,
    /// When set, every route answers 500
    pub failing: AtomicBool,
    pub last_authorization: Mutex<Option<String>>,
    /// Password per email, for `/auth/login`
    pub passwords: DashMap<String, String>,
}

impl MockState {
    fn seeded() -> Self {
        let state = MockState::default();
        *state.users.lock().unwrap() = vec![json!({
            "id": 1, "name": "John Doe", "email": "john@example.com",
            "age": 28, "weight": 75.5, "height": 180, "goal": "Build Muscle",
            "created_at": "2024-01-01 10:00:00"
        })];
        state
            .passwords
            .insert("john@example.com".to_string(), "password123".to_string());
        *state.exercises.lock().unwrap() = vec![
            json!({"id": 1, "name": "Push-ups", "category": "Chest",
                   "muscle_groups": "[\"Chest\", \"Triceps\"]",
                   "equipment": "Bodyweight", "instructions": "Push."}),
            json!({"id": 2, "name": "Squats", "category": "Legs",
                   "muscle_groups": "[\"Quadriceps\", \"Glutes\"]",
                   "equipment": "Bodyweight", "instructions": "Squat."}),
        ];
        *state.workouts.lock().unwrap() = vec![
            json!({"id": 1, "user_id": 1, "name": "Upper Body", "date": "2024-03-10",
                   "notes": "", "completed": 1, "completed_date": "2024-03-10T18:00:00Z",
                   "duration": 50, "exercises": [
                       {"id": 1, "workout_id": 1, "exercise_id": 1, "name": "Push-ups",
                        "sets": 3, "reps": 12, "weight": 0, "rest_time": 60, "notes": ""}
                   ]}),
            json!({"id": 2, "user_id": 1, "name": "Leg Day", "date": "2024-03-12",
                   "notes": "", "completed": 0, "completed_date": null,
                   "duration": null, "exercises": []}),
            json!({"id": 3, "user_id": 2, "name": "Someone Else", "date": "2024-03-11",
                   "notes": "", "completed": 0, "exercises": []}),
        ];
        state
    }

    fn enter(&self, route: &str) -> Result<(), (StatusCode, Json<Value>)> {
        *self.hits.entry(route.to_string()).or_insert(0) += 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"));
        }
        Ok(())
    }
}

/// A running mock backend bound to an ephemeral local port.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::seeded());
        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/users/{id}", get(get_user).put(update_user))
            .route("/api/exercises", get(list_exercises).post(create_exercise))
            .route(
                "/api/exercises/{id}",
                get(get_exercise).delete(delete_exercise),
            )
            .route("/api/workouts", get(list_workouts).post(create_workout))
            .route(
                "/api/workouts/{id}",
                get(get_workout).put(update_workout).delete(delete_workout),
            )
            .route("/api/workout-exercises", post(create_workout_exercise))
            .route(
                "/api/workout-exercises/{id}",
                delete(delete_workout_exercise),
            )
            .route("/api/auth/signup", post(signup))
            .route("/api/auth/login", post(login))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend failed");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Client talking only to this backend.
    #[allow(dead_code)]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(Backend::Remote(HttpClient::new(&self.base_url)))
    }

    #[allow(dead_code)]
    pub fn hits(&self, route: &str) -> usize {
        self.state.hits.get(route).map(|n| *n).unwrap_or(0)
    }

    #[allow(dead_code)]
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn workout_ids(&self) -> Vec<i64> {
        ids(&self.state.workouts.lock().unwrap())
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

fn not_found(what: &str) -> (StatusCode, Json<Value>) {
    error(StatusCode::NOT_FOUND, &format!("{} not found", what))
}

fn ids(records: &[Value]) -> Vec<i64> {
    records.iter().filter_map(|r| r["id"].as_i64()).collect()
}

fn next_id(records: &[Value]) -> i64 {
    ids(records).into_iter().max().unwrap_or(0) + 1
}

fn find(records: &[Value], id: i64) -> Option<&Value> {
    records.iter().find(|r| r["id"].as_i64() == Some(id))
}

fn merge(record: &mut Value, body: &Value, fields: &[&str]) {
    let (Some(record), Some(body)) = (record.as_object_mut(), body.as_object()) else {
        return;
    };
    for field in fields {
        if let Some(value) = body.get(*field) {
            record.insert(field.to_string(), value.clone());
        }
    }
}

async fn health(State(state): State<Arc<MockState>>) -> Reply {
    state.enter("GET /health")?;
    Ok(Json(json!({"status": "healthy", "message": "Fitness Tracker API is running"})))
}

async fn get_user(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Reply {
    state.enter("GET /users/:id")?;
    let users = state.users.lock().unwrap();
    find(&users, id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("User"))
}

async fn update_user(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    state.enter("PUT /users/:id")?;
    let mut users = state.users.lock().unwrap();
    let user = users
        .iter_mut()
        .find(|u| u["id"].as_i64() == Some(id))
        .ok_or_else(|| not_found("User"))?;
    merge(user, &body, &["name", "email", "age", "weight", "height", "goal"]);
    Ok(Json(json!({"message": "User updated successfully"})))
}

async fn list_exercises(State(state): State<Arc<MockState>>) -> Reply {
    state.enter("GET /exercises")?;
    Ok(Json(Value::Array(state.exercises.lock().unwrap().clone())))
}

async fn get_exercise(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Reply {
    state.enter("GET /exercises/:id")?;
    let exercises = state.exercises.lock().unwrap();
    find(&exercises, id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Exercise"))
}

async fn create_exercise(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Reply {
    state.enter("POST /exercises")?;
    let mut exercises = state.exercises.lock().unwrap();
    let id = next_id(&exercises);
    let mut exercise = json!({"id": id});
    merge(
        &mut exercise,
        &body,
        &["name", "category", "muscle_groups", "equipment", "instructions"],
    );
    exercises.push(exercise);
    Ok(Json(json!({"id": id, "message": "Exercise created successfully"})))
}

async fn delete_exercise(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Reply {
    state.enter("DELETE /exercises/:id")?;
    let mut exercises = state.exercises.lock().unwrap();
    let before = exercises.len();
    exercises.retain(|e| e["id"].as_i64() != Some(id));
    if exercises.len() == before {
        return Err(not_found("Exercise"));
    }
    Ok(Json(json!({"message": "Exercise deleted successfully"})))
}

async fn list_workouts(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    state.enter("GET /workouts")?;
    *state.last_authorization.lock().unwrap() = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let workouts = state.workouts.lock().unwrap();
    let user_id = query.get("user_id").and_then(|v| v.parse::<i64>().ok());
    let mut listed: Vec<Value> = workouts
        .iter()
        .filter(|w| user_id.is_none() || w["user_id"].as_i64() == user_id)
        .cloned()
        .collect();
    listed.sort_by(|a, b| b["date"].as_str().cmp(&a["date"].as_str()));
    Ok(Json(Value::Array(listed)))
}

async fn get_workout(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Reply {
    state.enter("GET /workouts/:id")?;
    let workouts = state.workouts.lock().unwrap();
    find(&workouts, id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Workout"))
}

fn exercise_name(state: &MockState, exercise_id: Option<i64>) -> Value {
    let exercises = state.exercises.lock().unwrap();
    exercise_id
        .and_then(|id| find(&exercises, id))
        .map(|e| e["name"].clone())
        .unwrap_or(Value::Null)
}

fn next_entry_id(workouts: &[Value]) -> i64 {
    workouts
        .iter()
        .filter_map(|w| w["exercises"].as_array())
        .flatten()
        .filter_map(|e| e["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1
}

fn entry(state: &MockState, id: i64, workout_id: i64, body: &Value) -> Value {
    let mut row = Map::new();
    row.insert("id".into(), json!(id));
    row.insert("workout_id".into(), json!(workout_id));
    row.insert("exercise_id".into(), body["exercise_id"].clone());
    row.insert(
        "name".into(),
        exercise_name(state, body["exercise_id"].as_i64()),
    );
    for field in ["sets", "reps", "weight", "rest_time", "notes"] {
        row.insert(field.into(), body[field].clone());
    }
    Value::Object(row)
}

async fn create_workout(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Reply {
    state.enter("POST /workouts")?;
    let mut workouts = state.workouts.lock().unwrap();
    let id = next_id(&workouts);
    let mut entry_id = next_entry_id(&workouts);
    let mut rows = Vec::new();
    for item in body["exercises"].as_array().into_iter().flatten() {
        rows.push(entry(&state, entry_id, id, item));
        entry_id += 1;
    }
    let mut workout = json!({
        "id": id, "completed": 0, "completed_date": null, "exercises": rows
    });
    merge(&mut workout, &body, &["user_id", "name", "date", "notes", "duration"]);
    workouts.push(workout);
    Ok(Json(json!({"id": id, "message": "Workout created successfully"})))
}

async fn update_workout(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    state.enter("PUT /workouts/:id")?;
    let mut workouts = state.workouts.lock().unwrap();
    let workout = workouts
        .iter_mut()
        .find(|w| w["id"].as_i64() == Some(id))
        .ok_or_else(|| not_found("Workout"))?;
    merge(
        workout,
        &body,
        &["name", "date", "notes", "completed", "completed_date", "duration"],
    );
    Ok(Json(json!({"message": "Workout updated successfully"})))
}

async fn delete_workout(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Reply {
    state.enter("DELETE /workouts/:id")?;
    let mut workouts = state.workouts.lock().unwrap();
    let before = workouts.len();
    workouts.retain(|w| w["id"].as_i64() != Some(id));
    if workouts.len() == before {
        return Err(not_found("Workout"));
    }
    Ok(Json(json!({"message": "Workout deleted successfully"})))
}

async fn create_workout_exercise(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Reply {
    state.enter("POST /workout-exercises")?;
    let workout_id = body["workout_id"]
        .as_i64()
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Missing required fields"))?;
    let mut workouts = state.workouts.lock().unwrap();
    let id = next_entry_id(&workouts);
    let row = entry(&state, id, workout_id, &body);
    let workout = workouts
        .iter_mut()
        .find(|w| w["id"].as_i64() == Some(workout_id))
        .ok_or_else(|| not_found("Workout"))?;
    if !workout["exercises"].is_array() {
        workout["exercises"] = json!([]);
    }
    if let Some(rows) = workout["exercises"].as_array_mut() {
        rows.push(row);
    }
    Ok(Json(json!({"id": id, "message": "Workout exercise created successfully"})))
}

async fn delete_workout_exercise(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
) -> Reply {
    state.enter("DELETE /workout-exercises/:id")?;
    let mut workouts = state.workouts.lock().unwrap();
    let mut removed = false;
    for workout in workouts.iter_mut() {
        if let Some(rows) = workout["exercises"].as_array_mut() {
            let before = rows.len();
            rows.retain(|r| r["id"].as_i64() != Some(id));
            removed |= rows.len() != before;
        }
    }
    if !removed {
        return Err(not_found("Workout exercise"));
    }
    Ok(Json(json!({"message": "Workout exercise deleted successfully"})))
}

async fn signup(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Reply {
    state.enter("POST /auth/signup")?;
    let mut users = state.users.lock().unwrap();
    if users.iter().any(|u| u["email"] == body["email"]) {
        return Err(error(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let id = next_id(&users);
    users.push(json!({
        "id": id, "name": body["username"].clone(), "email": body["email"].clone()
    }));
    if let (Some(email), Some(password)) = (body["email"].as_str(), body["password"].as_str()) {
        state.passwords.insert(email.to_string(), password.to_string());
    }
    Ok(Json(json!({
        "token": mint_token(id),
        "user": {"id": id, "username": body["username"].clone()}
    })))
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Reply {
    state.enter("POST /auth/login")?;
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let valid = state
        .passwords
        .get(email)
        .is_some_and(|stored| stored.as_str() == password);
    if !valid {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }
    let users = state.users.lock().unwrap();
    let user = users
        .iter()
        .find(|u| u["email"].as_str() == Some(email))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let id = user["id"].as_i64().unwrap_or_default();
    Ok(Json(json!({
        "token": mint_token(id),
        "user": {"id": id, "username": user["name"].clone()}
    })))
}
