//! Profile page: user record, health metrics and goal recommendations.

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Goal, HealthMetrics, User, UserInput};
use crate::pages::{ActionError, Loader, PageState};

/// Training advice derived from the user's goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendations {
    pub goal: Goal,
    pub frequency: &'static str,
    pub focus: &'static str,
}

impl Recommendations {
    pub fn for_goal(goal: Goal) -> Self {
        Self {
            goal,
            frequency: goal.workout_frequency(),
            focus: goal.focus_areas(),
        }
    }
}

pub struct ProfilePage {
    api: ApiClient,
    user_id: i64,
    loader: Loader<User>,
    action_error: ActionError,
}

impl ProfilePage {
    pub fn new(api: ApiClient, user_id: i64) -> Self {
        Self {
            api,
            user_id,
            loader: Loader::new(),
            action_error: ActionError::default(),
        }
    }

    pub async fn load(&mut self) {
        let ticket = self.loader.begin();
        let result = self.api.get_user(self.user_id).await;
        self.loader.finish(ticket, result);
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    pub fn state(&self) -> &PageState<User> {
        self.loader.state()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.get()
    }

    /// Replace the whole profile with `input`.
    pub async fn save(&mut self, input: UserInput) -> bool {
        let result = self.save_and_fetch(&input).await;
        match self.action_error.settle("update_profile", result) {
            Some(user) => {
                tracing::info!(user_id = user.id, "Profile updated");
                if let Some(current) = self.loader.data_mut() {
                    *current = user;
                }
                true
            }
            None => false,
        }
    }

    async fn save_and_fetch(&self, input: &UserInput) -> Result<User> {
        self.api.update_user(self.user_id, input).await?;
        self.api.get_user(self.user_id).await
    }

    pub fn metrics(&self) -> Option<HealthMetrics> {
        self.loader.data().map(HealthMetrics::for_user)
    }

    /// Recommendations, when the user has a recognized goal.
    pub fn recommendations(&self) -> Option<Recommendations> {
        self.loader
            .data()
            .and_then(User::goal)
            .map(Recommendations::for_goal)
    }
}
