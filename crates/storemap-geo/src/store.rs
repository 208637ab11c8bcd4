//! String-keyed backends for the geocode cache.
//!
//! A [`KeyValueStore`] is deliberately dumb: no transactions, no eviction,
//! and writes are allowed to fail. [`crate::GeoCache`] layers key derivation
//! and coordinate serialization on top.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::CacheWriteError;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheWriteError`] when the value could not be persisted. The
    /// store is left as it was before the call.
    fn set(&self, key: &str, value: &str) -> Result<(), CacheWriteError>;

    /// Stores every pair as one write. Later pairs win on repeated keys.
    ///
    /// # Errors
    ///
    /// Returns [`CacheWriteError`] when the write could not be persisted.
    /// Backends that override this leave the store as it was before the call.
    fn set_many(&self, pairs: &[(String, String)]) -> Result<(), CacheWriteError> {
        for (key, value) in pairs {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Process-local store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheWriteError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// JSON-file store that survives restarts.
///
/// The whole map is held in memory and rewritten to disk on every `set` or
/// `set_many` through a temp file and rename, so a crash mid-write leaves the previous
/// file intact. An optional byte quota caps the serialized size.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    quota_bytes: Option<usize>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file opens empty. An unreadable or corrupt file also opens
    /// empty (with a warning) and is overwritten by the next successful write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self {
            path,
            quota_bytes: None,
            entries: Mutex::new(entries),
        }
    }

    #[must_use]
    pub fn with_quota_bytes(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(path: &Path) -> BTreeMap<String, String> {
        let raw = match std::fs::read_to_string(path) {
            Ok(value) => value,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return BTreeMap::new();
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to read geocode cache; starting empty"
                );
                return BTreeMap::new();
            }
        };

        match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
            Ok(entries) => {
                tracing::debug!(
                    path = %path.display(),
                    count = entries.len(),
                    "loaded geocode cache"
                );
                entries
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to parse geocode cache; starting empty"
                );
                BTreeMap::new()
            }
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheWriteError> {
        let payload = serde_json::to_vec(entries)?;
        if let Some(quota_bytes) = self.quota_bytes {
            if payload.len() > quota_bytes {
                return Err(CacheWriteError::QuotaExceeded { quota_bytes });
            }
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, payload)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheWriteError> {
        self.set_many(&[(key.to_owned(), value.to_owned())])
    }

    fn set_many(&self, pairs: &[(String, String)]) -> Result<(), CacheWriteError> {
        if pairs.is_empty() {
            return Ok(());
        }

        let mut entries = self.lock();
        let previous: Vec<(&str, Option<String>)> = pairs
            .iter()
            .map(|(key, value)| (key.as_str(), entries.insert(key.clone(), value.clone())))
            .collect();

        if let Err(err) = self.persist(&entries) {
            // Undo newest first so a repeated key ends on its original value.
            for (key, old) in previous.into_iter().rev() {
                match old {
                    Some(old) => {
                        entries.insert(key.to_owned(), old);
                    }
                    None => {
                        entries.remove(key);
                    }
                }
            }
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v2"));
    }

    #[test]
    fn file_store_missing_file_opens_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path().join("nope.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("cache.json");

        let store = FileStore::open(&path);
        store.set("geo_a", r#"{"lat":1.0,"lng":2.0}"#).unwrap();
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.len(), 1);
        assert_eq!(
            reopened.get("geo_a").as_deref(),
            Some(r#"{"lat":1.0,"lng":2.0}"#)
        );
    }

    #[test]
    fn file_store_corrupt_file_opens_empty_and_recovers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.is_empty());
        store.set("k", "v").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn file_store_quota_rejects_write_and_keeps_previous_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        let store = FileStore::open(&path).with_quota_bytes(16);

        store.set("a", "1").unwrap();
        let err = store.set("b", "a value that is far too long").unwrap_err();
        assert!(
            matches!(err, CacheWriteError::QuotaExceeded { quota_bytes: 16 }),
            "expected QuotaExceeded, got: {err:?}"
        );
        assert_eq!(store.get("b"), None, "rejected write must not be visible");
        assert_eq!(store.get("a").as_deref(), Some("1"));

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("b"), None);
    }

    #[test]
    fn file_store_set_many_persists_all_pairs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        let store = FileStore::open(&path);

        store
            .set_many(&[
                ("geo_a".to_owned(), "1".to_owned()),
                ("geo_b".to_owned(), "2".to_owned()),
            ])
            .unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get("geo_b").as_deref(), Some("2"));
    }

    #[test]
    fn file_store_set_many_rolls_back_every_pair_on_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        let store = FileStore::open(&path).with_quota_bytes(24);
        store.set("a", "1").unwrap();

        let err = store
            .set_many(&[
                ("a".to_owned(), "changed".to_owned()),
                ("b".to_owned(), "a value that is far too long".to_owned()),
                ("a".to_owned(), "changed again".to_owned()),
            ])
            .unwrap_err();

        assert!(matches!(err, CacheWriteError::QuotaExceeded { .. }));
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("b"), None);
        assert_eq!(store.len(), 1);
    }
}
