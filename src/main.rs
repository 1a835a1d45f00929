// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness Tracker CLI
//!
//! Terminal front end for the Fitness Tracker pages: dashboard, workouts,
//! exercise library, profile and progress.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use fitness_tracker::{
    config::Config,
    forms::{
        AddExerciseForm, ExerciseForm, LoginFormValues, ProfileForm, SignupFormValues,
        WorkoutEntryValues, WorkoutForm,
    },
    models::{HealthMetrics, Timeframe},
    pages::{
        CategoryFilter, Confirm, DashboardPage, ExercisesPage, LoginPage, PageState,
        ProfilePage, ProgressPage, SignupPage, WorkoutsPage,
    },
    render,
    storage::FileStore,
    time_utils::parse_date,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "fitness-tracker", version, about = "Fitness Tracker CLI")]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, global = true, default_value_t = false)]
    yes: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with email and password, or store an existing bearer token
    Login {
        #[arg(conflicts_with_all = ["email", "password"], required_unless_present = "email")]
        token: Option<String>,
        #[arg(long, requires = "password")]
        email: Option<String>,
        #[arg(long, requires = "email")]
        password: Option<String>,
    },

    /// Forget the current session
    Logout,

    /// Create an account on the backend and log in
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Check that the backend is reachable
    Health,

    /// Show the home dashboard
    Dashboard,

    /// Workout management
    Workouts {
        #[command(subcommand)]
        cmd: WorkoutsCommand,
    },

    /// Exercise library
    Exercises {
        #[command(subcommand)]
        cmd: ExercisesCommand,
    },

    /// Profile and health metrics
    Profile {
        #[command(subcommand)]
        cmd: ProfileCommand,
    },

    /// Progress statistics
    Progress {
        /// week, month or year
        #[arg(long, default_value = "month")]
        timeframe: Timeframe,
    },
}

#[derive(Subcommand, Debug)]
enum WorkoutsCommand {
    List,

    /// Create a workout
    Create {
        #[arg(long)]
        name: String,
        /// Scheduled date (YYYY-MM-DD), today if omitted
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        notes: String,
        /// Exercise entry as ID:SETS:REPS[:WEIGHT[:REST]]; repeatable
        #[arg(long = "exercise", value_parser = parse_entry)]
        exercises: Vec<WorkoutEntryValues>,
    },

    Delete { id: i64 },

    /// Mark a workout completed now
    Complete { id: i64 },

    /// Append an exercise entry to a workout
    AddExercise {
        workout_id: i64,
        #[arg(long)]
        exercise_id: i64,
        #[arg(long)]
        sets: i64,
        #[arg(long)]
        reps: i64,
        #[arg(long)]
        weight: Option<f64>,
    },

    /// Remove an exercise entry from a workout
    RemoveExercise { workout_id: i64, entry_id: i64 },
}

#[derive(Subcommand, Debug)]
enum ExercisesCommand {
    List {
        /// Match name or category
        #[arg(long, default_value = "")]
        search: String,
        /// All, or one category
        #[arg(long, default_value = "All")]
        category: CategoryFilter,
    },

    /// Add an exercise to the library
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        /// Muscle group; repeatable
        #[arg(long = "muscle")]
        muscles: Vec<String>,
        #[arg(long, default_value = "")]
        equipment: String,
        #[arg(long, default_value = "")]
        instructions: String,
    },

    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,

    /// Update profile fields; omitted fields keep their current value
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        goal: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(
        mode = %config.storage_mode,
        api = %config.api_base_url,
        "Starting Fitness Tracker"
    );

    let store = Arc::new(FileStore::new(config.store_path()));
    let state = AppState::new(config, store);
    let confirm = StdinConfirm {
        assume_yes: cli.yes,
    };

    match cli.cmd {
        Command::Login {
            token,
            email,
            password,
        } => run_login(&state, token, email, password).await?,
        Command::Logout => {
            state.sessions.logout()?;
            println!("Logged out");
        }
        Command::Signup {
            username,
            email,
            password,
        } => run_signup(&state, username, email, password).await?,
        Command::Health => {
            let health = state.client().health().await?;
            println!("{}: {}", health.status, health.message);
        }
        Command::Dashboard => run_dashboard(&state).await?,
        Command::Workouts { cmd } => run_workouts(&state, cmd, &confirm).await?,
        Command::Exercises { cmd } => run_exercises(&state, cmd, &confirm).await?,
        Command::Profile { cmd } => run_profile(&state, cmd).await?,
        Command::Progress { timeframe } => run_progress(&state, timeframe).await?,
    }
    Ok(())
}

/// Initialize logging: JSON when `LOG_FORMAT=json`, compact text otherwise.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fitness_tracker=debug,info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(io::stderr),
            )
            .init();
    }
}

/// Confirmation read from stdin, skipped with `--yes`.
struct StdinConfirm {
    assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{} [y/N] ", prompt);
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }
}

/// Data of a page that finished loading, or its failure message.
fn loaded<T>(state: &PageState<T>) -> anyhow::Result<&T> {
    match state {
        PageState::Ready(data) => Ok(data),
        PageState::Failed { message } => Err(anyhow!("{}", message)),
        PageState::Idle | PageState::Loading => Err(anyhow!("Page did not finish loading")),
    }
}

fn action_failed(message: Option<&str>) -> anyhow::Error {
    anyhow!("{}", message.unwrap_or(fitness_tracker::error::GENERIC_FAILURE))
}

async fn run_login(
    state: &AppState,
    token: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let session = match token {
        Some(token) => state.sessions.login(&token).context("Login failed")?,
        None => {
            let mut page = LoginPage::new(state.client());
            page.form.values = LoginFormValues {
                email: email.unwrap_or_default(),
                password: password.unwrap_or_default(),
            };
            match page.submit(&state.sessions).await {
                Some(session) => session,
                None if !page.form.errors().is_empty() => bail!("{}", page.form.errors()),
                None => return Err(action_failed(page.error())),
            }
        }
    };
    println!("Logged in as user #{}", session.user_id);
    Ok(())
}

async fn run_signup(
    state: &AppState,
    username: String,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let mut page = SignupPage::new(state.client());
    page.form.values = SignupFormValues {
        username,
        email,
        password,
    };
    match page.submit(&state.sessions).await {
        Some(session) => {
            println!("Account created; logged in as user #{}", session.user_id);
            Ok(())
        }
        None if !page.form.errors().is_empty() => bail!("{}", page.form.errors()),
        None => Err(action_failed(page.error())),
    }
}

async fn run_dashboard(state: &AppState) -> anyhow::Result<()> {
    let mut page = DashboardPage::new(state.client(), state.user_id());
    page.load().await;
    let data = loaded(page.state())?;
    let now = Utc::now();
    let stats = data.stats(now);

    println!("{}", render::navbar("dashboard", state.session().as_ref()));
    println!("{}\n", data.welcome());
    println!("{}", render::stat_tile("Total workouts", stats.total_workouts));
    println!("{}", render::stat_tile("Completed", stats.completed_workouts));
    println!("{}", render::stat_tile("This week", stats.this_week_workouts));
    println!("{}", render::stat_tile("Total exercises", stats.total_exercises));

    println!("\nToday's workouts:");
    let today = data.today(now);
    if today.is_empty() {
        println!("  No workouts scheduled for today");
    }
    for workout in today {
        println!("{}", render::workout_card(workout));
    }

    println!("\nRecent workouts:");
    for workout in data.recent() {
        println!("{}", render::workout_card(workout));
    }
    Ok(())
}

async fn run_workouts(
    state: &AppState,
    cmd: WorkoutsCommand,
    confirm: &dyn Confirm,
) -> anyhow::Result<()> {
    let mut page = WorkoutsPage::new(state.client(), state.user_id());
    page.load().await;
    loaded(page.state())?;

    match cmd {
        WorkoutsCommand::List => {
            let data = loaded(page.state())?;
            println!("{}", render::navbar("workouts", state.session().as_ref()));
            if data.workouts.is_empty() {
                println!("No workouts yet");
            }
            for workout in &data.workouts {
                println!("{}", render::workout_card(workout));
            }
        }
        WorkoutsCommand::Create {
            name,
            date,
            notes,
            exercises,
        } => {
            let mut form = WorkoutForm::new_workout();
            form.values.name = name;
            form.values.notes = notes;
            form.values.exercises = exercises;
            let Some(draft) = form.submit(|draft| draft) else {
                bail!("{}", form.errors());
            };
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            match page.create(draft, date).await {
                Some(id) => println!("Created workout #{}", id),
                None => return Err(action_failed(page.action_error())),
            }
        }
        WorkoutsCommand::Delete { id } => {
            if page.delete(id, confirm).await {
                println!("Deleted workout #{}", id);
            } else if let Some(message) = page.action_error() {
                bail!("{}", message);
            }
        }
        WorkoutsCommand::Complete { id } => {
            if !page.complete(id, Utc::now()).await {
                return Err(action_failed(page.action_error()));
            }
            println!("Completed workout #{}", id);
        }
        WorkoutsCommand::AddExercise {
            workout_id,
            exercise_id,
            sets,
            reps,
            weight,
        } => {
            let mut form = AddExerciseForm::for_workout_id(workout_id);
            form.values.exercise_id = Some(exercise_id);
            form.values.sets = Some(sets);
            form.values.reps = Some(reps);
            form.values.weight = weight;
            let Some(entry) = form.submit(|entry| entry) else {
                bail!("{}", form.errors());
            };
            if !page.add_exercise(entry).await {
                return Err(action_failed(page.action_error()));
            }
            println!("Added exercise to workout #{}", workout_id);
        }
        WorkoutsCommand::RemoveExercise {
            workout_id,
            entry_id,
        } => {
            if page.remove_exercise(workout_id, entry_id, confirm).await {
                println!("Removed entry #{} from workout #{}", entry_id, workout_id);
            } else if let Some(message) = page.action_error() {
                bail!("{}", message);
            }
        }
    }
    Ok(())
}

async fn run_exercises(
    state: &AppState,
    cmd: ExercisesCommand,
    confirm: &dyn Confirm,
) -> anyhow::Result<()> {
    let mut page = ExercisesPage::new(state.client());
    page.load().await;
    loaded(page.state())?;

    match cmd {
        ExercisesCommand::List { search, category } => {
            page.set_search(search);
            page.set_filter(category);
            let visible = page.visible();
            if visible.is_empty() {
                println!("No exercises match");
            }
            for exercise in visible {
                println!("{}", render::exercise_card(exercise));
            }
        }
        ExercisesCommand::Add {
            name,
            category,
            muscles,
            equipment,
            instructions,
        } => {
            let mut form = ExerciseForm::new_exercise();
            form.values.name = name;
            form.values.category = category;
            for muscle in &muscles {
                form.values.toggle_muscle_group(muscle);
            }
            form.values.equipment = equipment;
            form.values.instructions = instructions;
            let Some(input) = form.submit(|input| input) else {
                bail!("{}", form.errors());
            };
            match page.create(input).await {
                Some(id) => println!("Added exercise #{}", id),
                None => return Err(action_failed(page.action_error())),
            }
        }
        ExercisesCommand::Delete { id } => {
            if page.delete(id, confirm).await {
                println!("Deleted exercise #{}", id);
            } else if let Some(message) = page.action_error() {
                bail!("{}", message);
            }
        }
    }
    Ok(())
}

async fn run_profile(state: &AppState, cmd: ProfileCommand) -> anyhow::Result<()> {
    let mut page = ProfilePage::new(state.client(), state.user_id());
    page.load().await;
    let user = loaded(page.state())?.clone();

    if let ProfileCommand::Update {
        name,
        email,
        age,
        weight,
        height,
        goal,
    } = cmd
    {
        let mut form = ProfileForm::for_user(&user);
        let values = &mut form.values;
        values.name = name.unwrap_or(user.name.clone());
        values.email = email.unwrap_or(user.email.clone());
        values.age = age.or(values.age);
        values.weight = weight.or(values.weight);
        values.height = height.or(values.height);
        if let Some(goal) = goal {
            values.goal = goal;
        }
        let Some(input) = form.submit(|input| input) else {
            bail!("{}", form.errors());
        };
        if !page.save(input).await {
            return Err(action_failed(page.action_error()));
        }
        println!("Profile updated");
    }

    let user = loaded(page.state())?;
    println!("{} <{}>", user.name, user.email);
    println!("{}", render::stat_tile("Age", opt(user.age)));
    println!("{}", render::stat_tile("Weight (kg)", opt(user.weight)));
    println!("{}", render::stat_tile("Height (cm)", opt(user.height)));
    println!("{}", render::stat_tile("Goal", user.goal.as_deref().unwrap_or("-")));

    if let Some(metrics) = page.metrics() {
        print_metrics(&metrics);
    }
    if let Some(rec) = page.recommendations() {
        println!("\nRecommended frequency: {}", rec.frequency);
        println!("Focus areas: {}", rec.focus);
    }
    Ok(())
}

fn print_metrics(metrics: &HealthMetrics) {
    let bmi = match (metrics.bmi, metrics.bmi_category) {
        (Some(bmi), Some(category)) => format!("{:.1} ({})", bmi, category),
        _ => "-".to_string(),
    };
    println!("{}", render::stat_tile("BMI", bmi));
    println!("{}", render::stat_tile("BMR (kcal/day)", opt(metrics.bmr)));
    let ideal = metrics
        .ideal_weight
        .map_or_else(|| "-".to_string(), |(lo, hi)| format!("{}-{} kg", lo, hi));
    println!("{}", render::stat_tile("Ideal weight", ideal));
}

async fn run_progress(state: &AppState, timeframe: Timeframe) -> anyhow::Result<()> {
    let mut page = ProgressPage::new(state.client(), state.user_id());
    page.set_timeframe(timeframe);
    page.load().await;
    loaded(page.state())?;
    let report = page
        .report(Utc::now())
        .ok_or_else(|| anyhow!("Progress data unavailable"))?;

    println!("Progress ({})", report.timeframe.as_str());
    let stats = &report.stats;
    println!("{}", render::stat_tile("Workouts", stats.total_workouts));
    println!("{}", render::stat_tile("Completed", stats.completed_count));
    println!(
        "{}",
        render::stat_tile(
            "Completion",
            render::progress_bar(i64::from(stats.completion_rate))
        )
    );
    println!("{}", render::stat_tile("Avg duration", format!("{} min", stats.avg_duration)));
    println!("{}", render::stat_tile("Total exercises", stats.total_exercises));
    println!("{}", render::stat_tile("Total time", format!("{} min", stats.total_duration)));

    println!("\nWeekly:");
    for week in &report.weekly {
        println!(
            "  {}  {}/{} {}",
            week.week_start,
            week.completed,
            week.total,
            render::progress_bar(i64::from(week.completion_rate()))
        );
    }

    println!("\nRecently completed:");
    for workout in &report.recent {
        println!("{}", render::workout_card(workout));
    }
    Ok(())
}

fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("invalid date: {}", value))
}

/// Parse `ID:SETS:REPS[:WEIGHT[:REST]]`.
fn parse_entry(value: &str) -> Result<WorkoutEntryValues, String> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();
    if !(3..=5).contains(&parts.len()) {
        return Err(format!("expected ID:SETS:REPS[:WEIGHT[:REST]], got {}", value));
    }
    let int = |s: &str| {
        s.parse::<i64>()
            .map_err(|_| format!("not a whole number: {}", s))
    };
    let mut entry = WorkoutEntryValues {
        exercise_id: Some(int(parts[0])?),
        sets: Some(int(parts[1])?),
        reps: Some(int(parts[2])?),
        ..WorkoutEntryValues::default()
    };
    if let Some(weight) = parts.get(3) {
        entry.weight = Some(
            weight
                .parse()
                .map_err(|_| format!("not a number: {}", weight))?,
        );
    }
    if let Some(rest) = parts.get(4) {
        entry.rest_time = Some(int(rest)?);
    }
    Ok(entry)
}
