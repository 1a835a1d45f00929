// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness Tracker: workout, exercise and progress tracking client
//!
//! This crate talks to the Fitness Tracker REST backend, or to a local
//! key-value store standing in for it, and provides the page controllers,
//! forms and rendering used by the `fitness-tracker` CLI.

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod pages;
pub mod render;
pub mod session;
pub mod storage;
pub mod time_utils;

use std::sync::Arc;

use api::ApiClient;
use config::Config;
use session::{Session, SessionStore};
use storage::KeyValueStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    api: ApiClient,
}

impl AppState {
    /// Wire the API client and session store over `store`, restoring any
    /// persisted session.
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let api = ApiClient::from_config(&config, Arc::clone(&store));
        let sessions = SessionStore::new(store);
        sessions.init();
        Self {
            config,
            sessions,
            api,
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.sessions.current()
    }

    /// API client carrying the current session's token.
    pub fn client(&self) -> ApiClient {
        self.api.with_session(self.session())
    }

    /// The session user, or the configured default user without a session.
    pub fn user_id(&self) -> i64 {
        self.session()
            .map_or(self.config.default_user_id, |s| s.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageMode;
    use crate::storage::{keys, MemoryStore};

    fn local_config() -> Config {
        Config {
            storage_mode: StorageMode::Local,
            default_user_id: 3,
            ..Config::default()
        }
    }

    #[test]
    fn test_user_id_falls_back_to_default() {
        let state = AppState::new(local_config(), Arc::new(MemoryStore::new()));
        assert!(state.session().is_none());
        assert_eq!(state.user_id(), 3);
        assert!(state.client().session().is_none());
    }

    #[test]
    fn test_restores_persisted_session() {
        let store = Arc::new(MemoryStore::new());
        // {"user_id":12}
        store
            .set_item(keys::TOKEN, "h.eyJ1c2VyX2lkIjoxMn0.s")
            .unwrap();
        let state = AppState::new(local_config(), store);
        assert_eq!(state.user_id(), 12);
        assert_eq!(state.client().session().map(|s| s.user_id), Some(12));
    }
}
