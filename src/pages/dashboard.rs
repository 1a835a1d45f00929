//! Home dashboard: greeting, stat tiles, recent and today's workouts.

use chrono::{DateTime, Utc};

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::stats::{self, DashboardStats, RECENT_LIMIT};
use crate::models::{User, Workout};
use crate::pages::{Loader, PageState};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub user: User,
    pub workouts: Vec<Workout>,
}

impl DashboardData {
    pub fn welcome(&self) -> String {
        format!("Welcome back, {}!", self.user.name)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> DashboardStats {
        DashboardStats::from_workouts(&self.workouts, now)
    }

    pub fn recent(&self) -> Vec<&Workout> {
        stats::recent_workouts(&self.workouts, RECENT_LIMIT)
    }

    pub fn today(&self, now: DateTime<Utc>) -> Vec<&Workout> {
        stats::todays_workouts(&self.workouts, now)
    }
}

pub struct DashboardPage {
    api: ApiClient,
    user_id: i64,
    loader: Loader<DashboardData>,
}

impl DashboardPage {
    pub fn new(api: ApiClient, user_id: i64) -> Self {
        Self {
            api,
            user_id,
            loader: Loader::new(),
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

    pub fn state(&self) -> &PageState<DashboardData> {
        self.loader.state()
    }
}

async fn fetch(api: &ApiClient, user_id: i64) -> Result<DashboardData> {
    let (user, workouts) = tokio::try_join!(api.get_user(user_id), api.get_workouts(Some(user_id)))?;
    tracing::debug!(user_id, workouts = workouts.len(), "Dashboard loaded");
    Ok(DashboardData { user, workouts })
}
