//! Focus state storage
//!
//! A key/value sink for the two persisted records. Each key holds one JSON
//! document; writes replace the whole document (last write wins).
//! - Session clock: <data>/focus/productivity-app-pomodoro.json
//! - Statistics: <data>/focus/productivity-app-pomodoro-stats.json

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Key of the session clock record
pub const SESSION_KEY: &str = "productivity-app-pomodoro";

/// Key of the statistics record
pub const STATS_KEY: &str = "productivity-app-pomodoro-stats";

/// Durable key/value storage for JSON documents
pub trait KeyValueStore {
    /// Read a document. A key that was never written is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Replace a document
    fn save(&self, key: &str, value: &Value) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        (**self).save(key, value)
    }
}

/// One JSON file per key in a data directory
pub struct FileStore {
    /// Base directory for focus data
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a new store with the given data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create focus data directory: {}", data_dir.display())
        })?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// Get the path of the file backing a key
    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}: {}", key, path.display()))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} JSON", key))?;

        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {}", key))?;

        // Readers never see a half-written document
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}: {}", key, tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}: {}", key, path.display()))
    }
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current document under a key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    /// Seed a document
    pub fn insert(&self, key: &str, value: Value) {
        self.entries.borrow_mut().insert(key.to_string(), value);
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        self.insert(key, value.clone());
        Ok(())
    }
}

/// Read and decode a record. Missing, unreadable and malformed records all
/// come back as `None`; the latter two are logged.
pub fn load_record<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let value = match store.load(key) {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %format!("{:#}", e), "unreadable record, using defaults");
            return None;
        }
    };

    // Derived struct deserializers also take sequences; records are objects
    if !value.is_object() {
        warn!(key, "record is not a JSON object, using defaults");
        return None;
    }

    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(key, error = %e, "malformed record, using defaults");
            None
        }
    }
}

/// Encode and write a record
pub fn save_record<T, S>(store: &S, key: &str, record: &T) -> Result<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(record)
        .with_context(|| format!("Failed to serialize {}", key))?;
    store.save(key, &value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Mode, SessionRecord};
    use crate::stats::StatsRecord;
    use serde_json::json;
    use tempfile::TempDir;

    fn temp_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(&dir.path().join("focus")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_missing_key() {
        let (store, _dir) = temp_store();
        assert!(store.load(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let (store, _dir) = temp_store();
        let doc = json!({ "remainingSeconds": 90, "mode": "Break" });
        store.save(SESSION_KEY, &doc).unwrap();

        assert_eq!(store.load(SESSION_KEY).unwrap(), Some(doc));
        assert!(store.key_path(SESSION_KEY).exists());
        assert!(!store.key_path(SESSION_KEY).with_extension("json.tmp").exists());
    }

    #[test]
    fn test_last_write_wins() {
        let (store, _dir) = temp_store();
        store.save(STATS_KEY, &json!({ "totalSessions": 1 })).unwrap();
        store.save(STATS_KEY, &json!({ "totalSessions": 2 })).unwrap();

        assert_eq!(
            store.load(STATS_KEY).unwrap(),
            Some(json!({ "totalSessions": 2 }))
        );
    }

    #[test]
    fn test_empty_file_is_absent() {
        let (store, _dir) = temp_store();
        fs::write(store.key_path(SESSION_KEY), "  \n").unwrap();
        assert!(store.load(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_error_but_record_defaults() {
        let (store, _dir) = temp_store();
        fs::write(store.key_path(SESSION_KEY), "{not json").unwrap();

        assert!(store.load(SESSION_KEY).is_err());
        assert!(load_record::<SessionRecord, _>(&store, SESSION_KEY).is_none());
    }

    #[test]
    fn test_record_helpers() {
        let store = MemoryStore::new();
        let record = SessionRecord {
            remaining_seconds: 12,
            mode: Mode::Break,
            ..Default::default()
        };
        save_record(&store, SESSION_KEY, &record).unwrap();

        assert_eq!(load_record::<SessionRecord, _>(&store, SESSION_KEY), Some(record));
        assert_eq!(load_record::<SessionRecord, _>(&store, STATS_KEY), None);
    }

    #[test]
    fn test_wrong_shape_is_none() {
        let store = MemoryStore::new();
        store.insert(SESSION_KEY, json!({ "remainingSeconds": -5 }));
        assert!(load_record::<SessionRecord, _>(&store, SESSION_KEY).is_none());

        store.insert(SESSION_KEY, json!({ "mode": "Nap" }));
        assert!(load_record::<SessionRecord, _>(&store, SESSION_KEY).is_none());
    }

    #[test]
    fn test_array_records_are_none() {
        let store = MemoryStore::new();
        store.insert(SESSION_KEY, json!([60, "Break"]));
        store.insert(STATS_KEY, json!([7, 7, 7]));

        assert!(load_record::<SessionRecord, _>(&store, SESSION_KEY).is_none());
        assert!(load_record::<StatsRecord, _>(&store, STATS_KEY).is_none());
    }
}
