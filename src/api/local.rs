// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Offline rendition of the REST API over a key-value store.
//!
//! Each collection is one JSON array under a fixed key. Requests are routed
//! by method and path onto those snapshots and answered with the same shapes
//! the backend uses: records, `{id, message}` acknowledgements, and
//! [`ClientError::Api`] with the backend's error texts.
//!
//! Workout-exercise rows live inside their workout's `exercises` array.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::api::{ApiRequest, Method};
use crate::error::{ClientError, Result};
use crate::models::MutationAck;
use crate::storage::{keys, KeyValueStore};

type Record = Map<String, Value>;

const USER_FIELDS: [&str; 6] = ["name", "email", "age", "weight", "height", "goal"];
const EXERCISE_FIELDS: [&str; 5] = ["name", "category", "muscle_groups", "equipment", "instructions"];
const WORKOUT_FIELDS: [&str; 6] = ["name", "date", "notes", "completed", "completed_date", "duration"];
const WORKOUT_EXERCISE_FIELDS: [&str; 5] = ["sets", "reps", "weight", "rest_time", "notes"];

/// Local API handler.
pub struct LocalApi {
    store: Arc<dyn KeyValueStore>,
    // Serializes read-modify-write cycles on the snapshots
    lock: Mutex<()>,
}

impl LocalApi {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Answer `request` from local storage.
    pub fn execute(&self, request: &ApiRequest) -> Result<Value> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ClientError::Storage("local api lock poisoned".to_string()))?;

        let (path, query) = match request.path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (request.path.as_str(), None),
        };
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let body = request.body.as_ref();

        tracing::debug!(method = %request.method, path = %request.path, "Local API request");

        match (request.method, segments.as_slice()) {
            (Method::Get, ["health"]) => Ok(json!({
                "status": "healthy",
                "message": "Fitness Tracker local storage is available"
            })),

            // ─── Users ───
            (Method::Get, ["users"]) => Ok(Value::Array(into_values(self.load(keys::USERS)?))),
            (Method::Get, ["users", id]) => self.get(keys::USERS, parse_id(id)?, "User"),
            (Method::Post, ["users"]) => self.create_user(body),
            (Method::Put, ["users", id]) => self.update_user(parse_id(id)?, body),

            // ─── Exercises ───
            (Method::Get, ["exercises"]) => {
                let mut exercises = self.load(keys::EXERCISES)?;
                exercises.sort_by(|a, b| str_field(a, "name").cmp(str_field(b, "name")));
                Ok(Value::Array(into_values(exercises)))
            }
            (Method::Get, ["exercises", id]) => self.get(keys::EXERCISES, parse_id(id)?, "Exercise"),
            (Method::Post, ["exercises"]) => self.create_exercise(body),
            (Method::Put, ["exercises", id]) => self.update(
                keys::EXERCISES,
                parse_id(id)?,
                body,
                &EXERCISE_FIELDS,
                "Exercise",
            ),
            (Method::Delete, ["exercises", id]) => {
                self.delete(keys::EXERCISES, parse_id(id)?, "Exercise")
            }

            // ─── Workouts ───
            (Method::Get, ["workouts"]) => self.list_workouts(query),
            (Method::Get, ["workouts", id]) => self.get(keys::WORKOUTS, parse_id(id)?, "Workout"),
            (Method::Post, ["workouts"]) => self.create_workout(body),
            (Method::Put, ["workouts", id]) => self.update(
                keys::WORKOUTS,
                parse_id(id)?,
                body,
                &WORKOUT_FIELDS,
                "Workout",
            ),
            (Method::Delete, ["workouts", id]) => self.delete(keys::WORKOUTS, parse_id(id)?, "Workout"),

            // ─── Workout exercises ───
            (Method::Get, ["workout-exercises", workout_id]) => {
                self.list_workout_exercises(parse_id(workout_id)?)
            }
            (Method::Post, ["workout-exercises"]) => self.create_workout_exercise(body),
            (Method::Put, ["workout-exercises", id]) => {
                self.update_workout_exercise(parse_id(id)?, body)
            }
            (Method::Delete, ["workout-exercises", id]) => {
                self.delete_workout_exercise(parse_id(id)?)
            }

            (_, ["auth", ..]) => Err(ClientError::from_status(
                501,
                Some("Authentication is not available in local mode".to_string()),
            )),

            _ => Err(not_found("Resource")),
        }
    }

    // ─── Snapshots ───────────────────────────────────────────

    /// Load a collection, seeding it on first access.
    fn load(&self, key: &str) -> Result<Vec<Record>> {
        let Some(raw) = self.store.get_item(key)? else {
            let seeded = seed(key);
            if !seeded.is_empty() {
                tracing::info!(key, count = seeded.len(), "Seeding local collection");
                self.save(key, &seeded)?;
            }
            return Ok(seeded);
        };
        let values: Vec<Value> = serde_json::from_str(&raw)
            .map_err(|e| ClientError::Decode(format!("Corrupt local collection {}: {}", key, e)))?;
        Ok(values
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(record) => Some(record),
                other => {
                    tracing::warn!(key, value = %other, "Skipping non-object entry");
                    None
                }
            })
            .collect())
    }

    fn save(&self, key: &str, records: &[Record]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.store.set_item(key, &raw)
    }

    // ─── Generic operations ──────────────────────────────────

    fn get(&self, key: &str, id: i64, what: &str) -> Result<Value> {
        self.load(key)?
            .into_iter()
            .find(|r| record_id(r) == Some(id))
            .map(Value::Object)
            .ok_or_else(|| not_found(what))
    }

    fn update(
        &self,
        key: &str,
        id: i64,
        body: Option<&Value>,
        fields: &[&str],
        what: &str,
    ) -> Result<Value> {
        let data = body_object(body)?;
        let mut records = self.load(key)?;
        let record = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| not_found(what))?;
        merge_fields(record, data, fields);
        self.save(key, &records)?;
        ack(format!("{} updated successfully", what))
    }

    fn delete(&self, key: &str, id: i64, what: &str) -> Result<Value> {
        let mut records = self.load(key)?;
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            return Err(not_found(what));
        }
        self.save(key, &records)?;
        ack(format!("{} deleted successfully", what))
    }

    // ─── Collection-specific operations ──────────────────────

    fn create_user(&self, body: Option<&Value>) -> Result<Value> {
        let data = require_fields(body, &["name", "email"])?;
        let mut users = self.load(keys::USERS)?;
        let email = data.get("email");
        if users.iter().any(|u| u.get("email") == email) {
            return Err(ClientError::from_status(
                400,
                Some("Email already exists".to_string()),
            ));
        }

        let id = next_id(users.iter());
        let mut user = Record::new();
        user.insert("id".into(), json!(id));
        for name in USER_FIELDS {
            user.insert(name.into(), field(data, name));
        }
        user.insert("created_at".into(), json!(timestamp_now()));
        users.push(user);
        self.save(keys::USERS, &users)?;
        created(id, "User created successfully")
    }

    fn update_user(&self, id: i64, body: Option<&Value>) -> Result<Value> {
        let data = body_object(body)?;
        let mut users = self.load(keys::USERS)?;
        if let Some(email) = data.get("email") {
            if users
                .iter()
                .any(|u| record_id(u) != Some(id) && u.get("email") == Some(email))
            {
                return Err(ClientError::from_status(
                    400,
                    Some("Email already exists".to_string()),
                ));
            }
        }
        let user = users
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| not_found("User"))?;
        merge_fields(user, data, &USER_FIELDS);
        self.save(keys::USERS, &users)?;
        ack("User updated successfully".to_string())
    }

    fn create_exercise(&self, body: Option<&Value>) -> Result<Value> {
        let data = require_fields(body, &["name", "category"])?;
        let mut exercises = self.load(keys::EXERCISES)?;
        let id = next_id(exercises.iter());

        let mut exercise = Record::new();
        exercise.insert("id".into(), json!(id));
        exercise.insert("name".into(), field(data, "name"));
        exercise.insert("category".into(), field(data, "category"));
        exercise.insert(
            "muscle_groups".into(),
            data.get("muscle_groups").cloned().unwrap_or_else(|| json!("[]")),
        );
        for field in ["equipment", "instructions"] {
            exercise.insert(field.into(), data.get(field).cloned().unwrap_or_else(|| json!("")));
        }
        exercise.insert("created_at".into(), json!(timestamp_now()));
        exercises.push(exercise);
        self.save(keys::EXERCISES, &exercises)?;
        created(id, "Exercise created successfully")
    }

    fn list_workouts(&self, query: Option<&str>) -> Result<Value> {
        let user_id = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == "user_id")
            .map(|(_, v)| v.to_string())
            .filter(|v| !v.is_empty());

        let mut workouts = self.load(keys::WORKOUTS)?;
        if let Some(user_id) = user_id {
            workouts.retain(|w| match w.get("user_id") {
                Some(Value::Number(n)) => n.to_string() == user_id,
                Some(Value::String(s)) => *s == user_id,
                _ => false,
            });
        }
        // Newest date first
        workouts.sort_by(|a, b| str_field(b, "date").cmp(str_field(a, "date")));
        Ok(Value::Array(into_values(workouts)))
    }

    fn create_workout(&self, body: Option<&Value>) -> Result<Value> {
        let data = require_fields(body, &["user_id", "name", "date"])?;
        let catalog = self.load(keys::EXERCISES)?;
        let mut workouts = self.load(keys::WORKOUTS)?;

        let id = next_id(workouts.iter());
        let mut next_row_id = next_id(workouts.iter().flat_map(|w| embedded_rows(w)));

        let mut rows = Vec::new();
        if let Some(Value::Array(entries)) = data.get("exercises") {
            for entry in entries {
                let Value::Object(entry) = entry else {
                    return Err(missing_fields());
                };
                if !["exercise_id", "sets", "reps"].iter().all(|f| entry.contains_key(*f)) {
                    return Err(missing_fields());
                }
                rows.push(Value::Object(new_row(next_row_id, id, entry, &catalog)));
                next_row_id += 1;
            }
        }

        let mut workout = Record::new();
        workout.insert("id".into(), json!(id));
        workout.insert("user_id".into(), field(data, "user_id"));
        workout.insert("name".into(), field(data, "name"));
        workout.insert("date".into(), field(data, "date"));
        workout.insert("notes".into(), data.get("notes").cloned().unwrap_or_else(|| json!("")));
        workout.insert(
            "completed".into(),
            data.get("completed").cloned().unwrap_or(Value::Bool(false)),
        );
        workout.insert("completed_date".into(), Value::Null);
        workout.insert("duration".into(), field(data, "duration"));
        workout.insert("created_at".into(), json!(timestamp_now()));
        workout.insert("exercises".into(), Value::Array(rows));
        workouts.push(workout);

        self.save(keys::WORKOUTS, &workouts)?;
        created(id, "Workout created successfully")
    }

    fn list_workout_exercises(&self, workout_id: i64) -> Result<Value> {
        let workouts = self.load(keys::WORKOUTS)?;
        let rows: Vec<Value> = workouts
            .iter()
            .find(|w| record_id(w) == Some(workout_id))
            .map(|w| embedded_rows(w).cloned().map(Value::Object).collect())
            .unwrap_or_default();
        Ok(Value::Array(rows))
    }

    fn create_workout_exercise(&self, body: Option<&Value>) -> Result<Value> {
        let data = require_fields(body, &["workout_id", "exercise_id", "sets", "reps"])?;
        let workout_id = data
            .get("workout_id")
            .and_then(as_id)
            .ok_or_else(|| not_found("Workout"))?;
        let catalog = self.load(keys::EXERCISES)?;
        let mut workouts = self.load(keys::WORKOUTS)?;

        let id = next_id(workouts.iter().flat_map(|w| embedded_rows(w)));
        let workout = workouts
            .iter_mut()
            .find(|w| record_id(w) == Some(workout_id))
            .ok_or_else(|| not_found("Workout"))?;
        let row = new_row(id, workout_id, data, &catalog);
        match workout.get_mut("exercises") {
            Some(Value::Array(rows)) => rows.push(Value::Object(row)),
            _ => {
                workout.insert("exercises".into(), Value::Array(vec![Value::Object(row)]));
            }
        }

        self.save(keys::WORKOUTS, &workouts)?;
        created(id, "Workout exercise created successfully")
    }

    fn update_workout_exercise(&self, id: i64, body: Option<&Value>) -> Result<Value> {
        let data = body_object(body)?;
        let mut workouts = self.load(keys::WORKOUTS)?;
        let row = workouts
            .iter_mut()
            .flat_map(|w| embedded_rows_mut(w))
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| not_found("Workout exercise"))?;
        merge_fields(row, data, &WORKOUT_EXERCISE_FIELDS);
        self.save(keys::WORKOUTS, &workouts)?;
        ack("Workout exercise updated successfully".to_string())
    }

    fn delete_workout_exercise(&self, id: i64) -> Result<Value> {
        let mut workouts = self.load(keys::WORKOUTS)?;
        let mut removed = false;
        for workout in workouts.iter_mut() {
            if let Some(Value::Array(rows)) = workout.get_mut("exercises") {
                let before = rows.len();
                rows.retain(|r| r.as_object().and_then(record_id) != Some(id));
                removed |= rows.len() != before;
            }
        }
        if !removed {
            return Err(not_found("Workout exercise"));
        }
        self.save(keys::WORKOUTS, &workouts)?;
        ack("Workout exercise deleted successfully".to_string())
    }
}

// ─── Helpers ─────────────────────────────────────────────────

fn parse_id(segment: &str) -> Result<i64> {
    segment.parse().map_err(|_| not_found("Resource"))
}

fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(as_id)
}

/// Next identifier: one more than the largest existing id, starting at 1.
fn next_id<'a>(records: impl Iterator<Item = &'a Record>) -> i64 {
    records.filter_map(record_id).max().unwrap_or(0) + 1
}

/// Value of `name` in `record`, or null when absent.
fn field(record: &Record, name: &str) -> Value {
    record.get(name).cloned().unwrap_or(Value::Null)
}

fn str_field<'a>(record: &'a Record, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or("")
}

fn embedded_rows(workout: &Record) -> impl Iterator<Item = &Record> {
    workout
        .get("exercises")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn embedded_rows_mut(workout: &mut Record) -> impl Iterator<Item = &mut Record> {
    workout
        .get_mut("exercises")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn new_row(id: i64, workout_id: i64, entry: &Record, catalog: &[Record]) -> Record {
    let exercise_id = entry.get("exercise_id").cloned().unwrap_or(Value::Null);
    let name = as_id(&exercise_id)
        .and_then(|eid| catalog.iter().find(|e| record_id(e) == Some(eid)))
        .and_then(|e| e.get("name").cloned())
        .unwrap_or(Value::Null);

    let mut row = Record::new();
    row.insert("id".into(), json!(id));
    row.insert("workout_id".into(), json!(workout_id));
    row.insert("exercise_id".into(), exercise_id);
    row.insert("name".into(), name);
    row.insert("sets".into(), field(entry, "sets"));
    row.insert("reps".into(), field(entry, "reps"));
    row.insert("weight".into(), entry.get("weight").cloned().unwrap_or_else(|| json!(0)));
    row.insert(
        "rest_time".into(),
        entry.get("rest_time").cloned().unwrap_or_else(|| json!(60)),
    );
    row.insert("notes".into(), entry.get("notes").cloned().unwrap_or_else(|| json!("")));
    row
}

/// Copy the listed fields present in `data` onto `record`; others keep their values.
fn merge_fields(record: &mut Record, data: &Record, fields: &[&str]) {
    for field in fields {
        if let Some(value) = data.get(*field) {
            record.insert((*field).to_string(), value.clone());
        }
    }
}

fn body_object(body: Option<&Value>) -> Result<&Record> {
    body.and_then(Value::as_object).ok_or_else(missing_fields)
}

fn require_fields<'a>(body: Option<&'a Value>, fields: &[&str]) -> Result<&'a Record> {
    let data = body_object(body)?;
    if fields.iter().all(|f| data.contains_key(*f)) {
        Ok(data)
    } else {
        Err(missing_fields())
    }
}

fn missing_fields() -> ClientError {
    ClientError::from_status(400, Some("Missing required fields".to_string()))
}

fn not_found(what: &str) -> ClientError {
    ClientError::from_status(404, Some(format!("{} not found", what)))
}

fn into_values(records: Vec<Record>) -> Vec<Value> {
    records.into_iter().map(Value::Object).collect()
}

fn ack(message: String) -> Result<Value> {
    Ok(serde_json::to_value(MutationAck::message(message))?)
}

fn created(id: i64, message: &str) -> Result<Value> {
    Ok(serde_json::to_value(MutationAck::created(id, message))?)
}

fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Sample data written the first time a collection is read.
fn seed(key: &str) -> Vec<Record> {
    let values = match key {
        keys::USERS => vec![json!({
            "id": 1,
            "name": "John Doe",
            "email": "john@example.com",
            "age": 28,
            "weight": 75.5,
            "height": 180,
            "goal": "Build Muscle"
        })],
        keys::EXERCISES => SEED_EXERCISES
            .iter()
            .enumerate()
            .map(|(i, (name, category, groups, equipment, instructions))| {
                json!({
                    "id": i + 1,
                    "name": name,
                    "category": category,
                    "muscle_groups": groups,
                    "equipment": equipment,
                    "instructions": instructions
                })
            })
            .collect(),
        _ => Vec::new(),
    };
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect()
}

const SEED_EXERCISES: [(&str, &str, &str, &str, &str); 8] = [
    (
        "Push-ups",
        "Chest",
        r#"["Chest", "Triceps", "Shoulders"]"#,
        "Bodyweight",
        "Start in plank position, lower body to ground, push back up",
    ),
    (
        "Squats",
        "Legs",
        r#"["Quadriceps", "Glutes", "Hamstrings"]"#,
        "Bodyweight",
        "Stand with feet shoulder-width apart, lower hips back and down, return to standing",
    ),
    (
        "Pull-ups",
        "Back",
        r#"["Back", "Biceps"]"#,
        "Pull-up bar",
        "Hang from bar, pull body up until chin clears bar, lower with control",
    ),
    (
        "Bench Press",
        "Chest",
        r#"["Chest", "Triceps", "Shoulders"]"#,
        "Barbell",
        "Lie on bench, lower bar to chest, press up to full extension",
    ),
    (
        "Deadlift",
        "Back",
        r#"["Back", "Glutes", "Hamstrings"]"#,
        "Barbell",
        "Stand with bar over feet, hinge at hips, lift bar by extending hips and knees",
    ),
    (
        "Shoulder Press",
        "Shoulders",
        r#"["Shoulders", "Triceps"]"#,
        "Dumbbells",
        "Press weights overhead from shoulder height, lower with control",
    ),
    (
        "Plank",
        "Core",
        r#"["Abs", "Obliques"]"#,
        "Bodyweight",
        "Hold body in straight line from head to heels, engage core muscles",
    ),
    (
        "Lunges",
        "Legs",
        r#"["Quadriceps", "Glutes", "Hamstrings"]"#,
        "Bodyweight",
        "Step forward into lunge position, return to standing, alternate legs",
    ),
];
