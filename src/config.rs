//! Application configuration loaded from environment variables.
//!
//! The storage strategy is chosen here, once, and injected into the API
//! client. Nothing else in the crate inspects the environment.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default REST backend location.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Where API requests are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Remote REST backend only; transport failures surface as errors.
    Remote,
    /// Local key-value storage only; no network traffic at all.
    Local,
    /// Remote backend, rerouting to local storage when the transport fails.
    RemoteWithFallback,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(StorageMode::Remote),
            "local" | "offline" => Ok(StorageMode::Local),
            "fallback" | "remote-with-fallback" => Ok(StorageMode::RemoteWithFallback),
            other => Err(ConfigError::Invalid {
                name: "STORAGE_MODE",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageMode::Remote => "remote",
            StorageMode::Local => "local",
            StorageMode::RemoteWithFallback => "fallback",
        };
        f.write_str(s)
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend (including the `/api` prefix)
    pub api_base_url: String,
    /// Storage strategy for API requests
    pub storage_mode: StorageMode,
    /// Directory holding the local store document (token + fallback data)
    pub data_dir: PathBuf,
    /// User whose data is shown when no session is present
    pub default_user_id: i64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_mode: StorageMode::RemoteWithFallback,
            data_dir: PathBuf::from(".fitness-tracker"),
            default_user_id: 1,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_mode = match env::var("STORAGE_MODE") {
            Ok(v) => v.parse()?,
            Err(_) => StorageMode::RemoteWithFallback,
        };

        let default_user_id = match env::var("DEFAULT_USER_ID") {
            Ok(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "DEFAULT_USER_ID",
                value: v,
            })?,
            Err(_) => 1,
        };

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            storage_mode,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".fitness-tracker")),
            default_user_id,
        })
    }

    /// Path of the JSON document backing the local store.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
