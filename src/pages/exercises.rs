//! Exercise library page.

use std::fmt;
use std::str::FromStr;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Category, Exercise, ExerciseInput};
use crate::pages::{created_id, merge_by_id, remove_by_id, ActionError, Confirm, Loader, PageState};

const DELETE_EXERCISE_PROMPT: &str = "Are you sure you want to delete this exercise?";

/// Category selector of the library page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, exercise: &Exercise) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => exercise.category == category.as_str(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

pub struct ExercisesPage {
    api: ApiClient,
    loader: Loader<Vec<Exercise>>,
    search: String,
    filter: CategoryFilter,
    action_error: ActionError,
}

impl ExercisesPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            loader: Loader::new(),
            search: String::new(),
            filter: CategoryFilter::All,
            action_error: ActionError::default(),
        }
    }

    pub async fn load(&mut self) {
        let ticket = self.loader.begin();
        let result = self.api.get_exercises().await;
        self.loader.finish(ticket, result);
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    pub fn state(&self) -> &PageState<Vec<Exercise>> {
        self.loader.state()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.get()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Exercises matching the search term (name or category,
    /// case-insensitive) and the category filter.
    pub fn visible(&self) -> Vec<&Exercise> {
        let term = self.search.trim().to_lowercase();
        self.loader
            .data()
            .map(|exercises| {
                exercises
                    .iter()
                    .filter(|e| {
                        term.is_empty()
                            || e.name.to_lowercase().contains(&term)
                            || e.category.to_lowercase().contains(&term)
                    })
                    .filter(|e| self.filter.matches(e))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn create(&mut self, input: ExerciseInput) -> Option<i64> {
        let result = self.create_and_fetch(&input).await;
        let exercise = self.action_error.settle("create_exercise", result)?;
        let id = exercise.id;
        self.merge(exercise);
        Some(id)
    }

    async fn create_and_fetch(&self, input: &ExerciseInput) -> Result<Exercise> {
        let ack = self.api.create_exercise(input).await?;
        self.api.get_exercise(created_id(ack.id, "exercise")?).await
    }

    pub async fn update(&mut self, id: i64, input: ExerciseInput) -> bool {
        let result = self.update_and_fetch(id, &input).await;
        match self.action_error.settle("update_exercise", result) {
            Some(exercise) => {
                self.merge(exercise);
                true
            }
            None => false,
        }
    }

    async fn update_and_fetch(&self, id: i64, input: &ExerciseInput) -> Result<Exercise> {
        self.api.update_exercise(id, input).await?;
        self.api.get_exercise(id).await
    }

    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(DELETE_EXERCISE_PROMPT) {
            return false;
        }
        let result = self.api.delete_exercise(id).await;
        if self.action_error.settle("delete_exercise", result).is_none() {
            return false;
        }
        if let Some(exercises) = self.loader.data_mut() {
            remove_by_id(exercises, id);
        }
        true
    }

    fn merge(&mut self, exercise: Exercise) {
        if let Some(exercises) = self.loader.data_mut() {
            merge_by_id(exercises, exercise);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Backend, LocalApi};
    use crate::models::MuscleGroups;
    use crate::pages::AlwaysConfirm;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    async fn loaded_page() -> ExercisesPage {
        let api = ApiClient::new(Backend::Local(LocalApi::new(Arc::new(MemoryStore::new()))));
        let mut page = ExercisesPage::new(api);
        page.load().await;
        page
    }

    #[tokio::test]
    async fn test_search_and_category_filter() {
        let mut page = loaded_page().await;
        assert_eq!(page.visible().len(), 8);

        page.set_search("PRESS");
        let names: Vec<&str> = page.visible().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bench Press", "Shoulder Press"]);

        page.set_filter("Chest".parse().unwrap());
        assert_eq!(page.visible().len(), 1);

        // Search also matches the category label
        page.set_search("back");
        page.set_filter(CategoryFilter::All);
        let names: Vec<&str> = page.visible().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Deadlift", "Pull-ups"]);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let mut page = loaded_page().await;
        let input = ExerciseInput {
            name: "Dips".to_string(),
            category: "Arms".to_string(),
            muscle_groups: MuscleGroups::new(vec!["Triceps".to_string()]),
            equipment: "Parallel bars".to_string(),
            instructions: String::new(),
        };
        let id = page.create(input.clone()).await.unwrap();
        assert_eq!(id, 9);

        let renamed = ExerciseInput {
            name: "Bench Dips".to_string(),
            ..input
        };
        assert!(page.update(id, renamed).await);
        let exercises = page.state().data().unwrap();
        assert_eq!(exercises.len(), 9);
        assert!(exercises.iter().any(|e| e.name == "Bench Dips"));

        assert!(page.delete(id, &AlwaysConfirm).await);
        assert_eq!(page.state().data().unwrap().len(), 8);
    }

    #[test]
    fn test_category_filter_parsing() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Core".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Core)
        );
        assert!("Yoga".parse::<CategoryFilter>().is_err());
        assert_eq!(CategoryFilter::Only(Category::Legs).to_string(), "Legs");
    }
}
