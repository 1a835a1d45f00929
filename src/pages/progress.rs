//! Progress page.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::stats::{self, ProgressStats, Timeframe, WeeklyBucket, RECENT_LIMIT};
use crate::models::{User, Workout};
use crate::pages::{Loader, PageState};

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressData {
    pub user: User,
    pub workouts: Vec<Workout>,
}

/// Everything the progress page shows for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    #[serde(serialize_with = "serialize_timeframe")]
    pub timeframe: Timeframe,
    pub stats: ProgressStats,
    pub weekly: Vec<WeeklyBucket>,
    /// Recently completed workouts, from the whole history
    pub recent: Vec<Workout>,
}

impl ProgressData {
    pub fn report(&self, timeframe: Timeframe, now: DateTime<Utc>) -> ProgressReport {
        let in_window = stats::filter_by_timeframe(&self.workouts, timeframe, now);
        ProgressReport {
            timeframe,
            stats: ProgressStats::from_workouts(in_window.iter().copied()),
            weekly: stats::weekly_buckets(in_window.iter().copied()),
            recent: stats::recent_completed(&self.workouts, RECENT_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

pub struct ProgressPage {
    api: ApiClient,
    user_id: i64,
    loader: Loader<ProgressData>,
    timeframe: Timeframe,
}

impl ProgressPage {
    pub fn new(api: ApiClient, user_id: i64) -> Self {
        Self {
            api,
            user_id,
            loader: Loader::new(),
            timeframe: Timeframe::default(),
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

    pub fn state(&self) -> &PageState<ProgressData> {
        self.loader.state()
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Switching timeframe re-filters the loaded data; nothing is fetched.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.timeframe = timeframe;
    }

    pub fn report(&self, now: DateTime<Utc>) -> Option<ProgressReport> {
        self.loader
            .data()
            .map(|data| data.report(self.timeframe, now))
    }
}

async fn fetch(api: &ApiClient, user_id: i64) -> Result<ProgressData> {
    let (user, workouts) = tokio::try_join!(api.get_user(user_id), api.get_workouts(Some(user_id)))?;
    Ok(ProgressData { user, workouts })
}

fn serialize_timeframe<S: serde::Serializer>(
    timeframe: &Timeframe,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(timeframe.as_str())
}
