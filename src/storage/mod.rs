//! Key-value persistence (stand-in for browser local storage).

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Storage keys as constants.
pub mod keys {
    pub const USERS: &str = "fittrack_users";
    pub const EXERCISES: &str = "fittrack_exercises";
    pub const WORKOUTS: &str = "fittrack_workouts";
    pub const TOKEN: &str = "fittrack_token";
}

/// String-valued key-value store.
///
/// Values are opaque strings; callers decide on the encoding (collections
/// are stored as JSON arrays, the token as-is).
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}
