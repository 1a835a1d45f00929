// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Store backed by a single JSON document on disk.
//!
//! The document is an object of string values. Every write re-reads the
//! file, applies the change and rewrites it through a temporary file, all
//! under one mutex.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ClientError, Result};
use crate::storage::KeyValueStore;

type Document = BTreeMap<String, String>;

/// Persistent key-value store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// Parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if raw.trim().is_empty() {
            return Ok(Document::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            ClientError::Storage(format!("Corrupt store {}: {}", self.path.display(), e))
        })
    }

    fn write_document(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let body = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|e| {
            ClientError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            ClientError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })
    }

    fn modify(&self, f: impl FnOnce(&mut Document)) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ClientError::Storage("store lock poisoned".to_string()))?;
        let mut doc = self.read_document()?;
        f(&mut doc);
        self.write_document(&doc)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ClientError::Storage("store lock poisoned".to_string()))?;
        Ok(self.read_document()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|doc| {
            doc.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.modify(|doc| {
            doc.remove(key);
        })
    }
}
