//! Key/value persistence for client state
//!
//! Mirrors browser local storage: string keys mapping to JSON-encoded string
//! values, all kept in a single `storage.json` file. Every write is flushed to
//! disk immediately so a restart always hydrates the last state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Config;

/// Storage keys used by the application
pub mod keys {
    pub const PROFILE: &str = "haq_user";
    pub const COMPLETED: &str = "haq_completed";
    pub const ATTEMPTED: &str = "haq_attempted";
    pub const MISSED: &str = "haq_missed";
    pub const SIGNUP_DATE: &str = "haq_signup_date";
    pub const SESSION: &str = "haq_session";
}

/// File-backed string store
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store in the default data directory
    pub fn open_default() -> Result<Self> {
        Self::open(Config::data_dir()?.join("storage.json"))
    }

    /// Open (or lazily create) a store at the given path
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let items = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read storage from {:?}", path))?;
            match serde_json::from_str(&contents) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Discarding unreadable storage file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, items })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.update(|items| {
            items.insert(key.to_string(), value);
        })
    }

    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if !self.items.contains_key(key) {
            return Ok(());
        }
        self.update(|items| {
            items.remove(key);
        })
    }

    /// Remove every key
    pub fn clear(&mut self) -> Result<()> {
        self.update(BTreeMap::clear)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Decode a JSON value stored under `key`.
    ///
    /// A value that no longer parses is treated as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring malformed value for {}: {}", key, e);
                None
            }
        }
    }

    /// Encode `value` as JSON under `key`
    pub fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize value for {}", key))?;
        self.set_item(key, encoded)
    }

    /// Encode several values and write them in one flush
    pub fn set_json_all<T: Serialize>(&mut self, entries: &[(&str, &T)]) -> Result<()> {
        let encoded = entries
            .iter()
            .map(|(key, value)| {
                serde_json::to_string(value)
                    .map(|json| (key.to_string(), json))
                    .with_context(|| format!("Failed to serialize value for {}", key))
            })
            .collect::<Result<Vec<_>>>()?;
        self.update(|items| items.extend(encoded))
    }

    /// Apply a change and flush it; memory is rolled back if the write fails
    fn update(&mut self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let previous = self.items.clone();
        change(&mut self.items);
        if let Err(e) = self.flush() {
            self.items = previous;
            return Err(e);
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(&self.items)
            .with_context(|| "Failed to serialize storage")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write storage to {:?}", self.path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("storage.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_opens_empty() {
        let (_dir, store) = temp_store();
        assert!(store.is_empty());
        assert!(store.get_item(keys::PROFILE).is_none());
    }

    #[test]
    fn writes_survive_reopen() {
        let (_dir, mut store) = temp_store();
        store.set_json(keys::COMPLETED, &vec!["2025-01-02"]).unwrap();

        let reopened = LocalStore::open(store.path()).unwrap();
        let completed: Vec<String> = reopened.get_json(keys::COMPLETED).unwrap();
        assert_eq!(completed, vec!["2025-01-02"]);
    }

    #[test]
    fn values_are_json_strings() {
        let (_dir, mut store) = temp_store();
        store.set_json(keys::ATTEMPTED, &vec!["2025-01-02"]).unwrap();
        assert_eq!(store.get_item(keys::ATTEMPTED), Some(r#"["2025-01-02"]"#));
    }

    #[test]
    fn clear_wipes_everything() {
        let (_dir, mut store) = temp_store();
        store.set_item(keys::SESSION, "{}").unwrap();
        store.set_item(keys::PROFILE, "{}").unwrap();
        store.clear().unwrap();

        let reopened = LocalStore::open(store.path()).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn malformed_value_reads_as_none() {
        let (_dir, mut store) = temp_store();
        store.set_item(keys::COMPLETED, "not json").unwrap();
        assert!(store.get_json::<Vec<String>>(keys::COMPLETED).is_none());
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut store = LocalStore::open(blocker.join("storage.json")).unwrap();

        assert!(store.set_item(keys::SESSION, "{}").is_err());
        assert!(store.get_item(keys::SESSION).is_none());
        assert!(store.set_json_all(&[(keys::COMPLETED, &vec!["2025-01-02"])]).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn set_json_all_writes_every_key() {
        let (_dir, mut store) = temp_store();
        let empty: Vec<String> = Vec::new();
        let dates = vec!["2025-01-02".to_string()];
        store
            .set_json_all(&[(keys::COMPLETED, &dates), (keys::MISSED, &empty)])
            .unwrap();

        let reopened = LocalStore::open(store.path()).unwrap();
        assert_eq!(reopened.get_json::<Vec<String>>(keys::COMPLETED), Some(dates));
        assert_eq!(reopened.get_json::<Vec<String>>(keys::MISSED), Some(empty));
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{{{").unwrap();
        let store = LocalStore::open(&path).unwrap();
        assert!(store.is_empty());
    }
}
