// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page controllers.
//!
//! A page owns the data it displays in a [`Loader`], which tracks the load
//! state and discards results from superseded loads. Mutations never touch
//! the load state: they call the API, then reconcile the affected record
//! into the loaded collection, and report failures through the page's
//! action-error slot.

pub mod dashboard;
pub mod exercises;
pub mod profile;
pub mod progress;
pub mod signup;
pub mod workouts;

pub use dashboard::{DashboardData, DashboardPage};
pub use exercises::{CategoryFilter, ExercisesPage};
pub use profile::{ProfilePage, Recommendations};
pub use progress::{ProgressData, ProgressPage, ProgressReport};
pub use signup::{LoginPage, SignupPage};
pub use workouts::{ActiveWorkout, WorkoutsData, WorkoutsPage};

use crate::error::{ClientError, Result};
use crate::models::{Exercise, User, Workout};

/// Load state of a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed { message: String },
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            PageState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Identifies one load; only the newest ticket may settle the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Page state plus the generation counter used to reject stale loads.
#[derive(Debug)]
pub struct Loader<T> {
    state: PageState<T>,
    generation: u64,
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self {
            state: PageState::Idle,
            generation: 0,
        }
    }
}

impl<T> Loader<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading` and hand out the ticket for this load.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = PageState::Loading;
        LoadTicket(self.generation)
    }

    /// Settle the load identified by `ticket`.
    ///
    /// Returns false, leaving the state untouched, when a newer load has
    /// started since `ticket` was issued.
    pub fn finish(&mut self, ticket: LoadTicket, result: Result<T>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "Discarding stale load result"
            );
            return false;
        }
        self.state = match result {
            Ok(data) => PageState::Ready(data),
            Err(e) => {
                tracing::warn!(error = %e, "Page load failed");
                PageState::Failed {
                    message: e.user_message(),
                }
            }
        };
        true
    }

    pub fn state(&self) -> &PageState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data()
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            PageState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Asks the user before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Accepts every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Records carrying a backend identifier.
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for Workout {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Exercise {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for User {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Replace the record with the same id, or append it.
pub fn merge_by_id<T: Identified>(items: &mut Vec<T>, record: T) {
    match items.iter_mut().find(|item| item.id() == record.id()) {
        Some(existing) => *existing = record,
        None => items.push(record),
    }
}

/// Drop the record with `id`; returns whether one was removed.
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: i64) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Outcome slot for the most recent mutation on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionError(Option<String>);

impl ActionError {
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Pass a mutation result through, recording its error for display.
    pub fn settle<T>(&mut self, action: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.0 = None;
                Some(value)
            }
            Err(e) => {
                tracing::warn!(action, error = %e, "Page action failed");
                self.0 = Some(e.user_message());
                None
            }
        }
    }
}

/// Id from a create acknowledgement, which every backend is expected to send.
fn created_id(ack_id: Option<i64>, what: &str) -> Result<i64> {
    ack_id.ok_or_else(|| ClientError::Decode(format!("{} create response has no id", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut loader: Loader<u32> = Loader::new();
        let first = loader.begin();
        let second = loader.begin();

        assert!(!loader.finish(first, Ok(1)));
        assert!(loader.state().is_loading());

        assert!(loader.finish(second, Ok(2)));
        assert_eq!(loader.data(), Some(&2));
    }

    #[test]
    fn test_failed_load_keeps_user_message() {
        let mut loader: Loader<u32> = Loader::new();
        let ticket = loader.begin();
        loader.finish(ticket, Err(ClientError::from_status(500, None)));
        assert_eq!(loader.state().error(), Some("HTTP error! status: 500"));
        assert!(loader.data().is_none());
    }

    #[test]
    fn test_action_error_slot() {
        let mut slot = ActionError::default();
        assert_eq!(slot.settle("delete", Ok::<_, ClientError>(3)), Some(3));
        assert!(slot.get().is_none());

        let failed: Option<()> = slot.settle(
            "delete",
            Err(ClientError::from_status(404, Some("Workout not found".into()))),
        );
        assert!(failed.is_none());
        assert_eq!(slot.get(), Some("Workout not found"));
        slot.clear();
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_confirm_closures() {
        let asked = std::cell::Cell::new(0);
        let confirm = |_: &str| {
            asked.set(asked.get() + 1);
            false
        };
        assert!(!confirm.confirm("Delete?"));
        assert_eq!(asked.get(), 1);
        assert!(AlwaysConfirm.confirm("Delete?"));
        assert!(!NeverConfirm.confirm("Delete?"));
    }
}
