//! Persisted preference stores.
//!
//! The browser key-value storage is modelled by [`PreferenceStore`]: string keys,
//! string values, and every access may fail. Callers in the theme system treat
//! failures as "no value" and never surface them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key holding the chosen theme id
pub const THEME_KEY: &str = "cc_theme";

/// Boolean flag written by pre-catalog versions of the site
pub const LEGACY_ARC_KEY: &str = "cc_style_arc";

pub const REDUCE_MOTION_KEY: &str = "cc_reduce_motion";

/// Storage access errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("preference storage is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to access preference file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("preference file '{path}' is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// String key-value store for user preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store. Can be switched to "unavailable" to model disabled storage.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            available: true,
        }
    }

    /// A store whose every read and write fails
    pub fn unavailable() -> Self {
        Self {
            values: BTreeMap::new(),
            available: false,
        }
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Raw view of stored values, bypassing availability
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable(
                "storage disabled for this session".to_string(),
            ))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file backed store.
///
/// The file is re-read on every access so several processes observe each
/// other's writes, as tabs sharing one origin would.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/sitetheme/preferences.json`
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sitetheme").join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_error = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = serde_json::to_string_pretty(values).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        fs::write(&self.path, content).map_err(io_error)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every later write
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(StorageError::Corrupt { reason, .. }) => {
                log::warn!(
                    "Replacing corrupt preference file '{}': {reason}",
                    self.path.display()
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_none!(assert_ok!(store.get(THEME_KEY)));

        assert_ok!(store.set(THEME_KEY, "arc"));
        assert_eq!(assert_ok!(store.get(THEME_KEY)).as_deref(), Some("arc"));
    }

    #[test]
    fn test_unavailable_memory_store_fails() {
        let mut store = MemoryStore::unavailable();
        assert_err!(store.get(THEME_KEY));
        assert_err!(store.set(THEME_KEY, "arc"));
        assert_none!(store.peek(THEME_KEY));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut store = FileStore::new(&path);
        assert_none!(assert_ok!(store.get(THEME_KEY)));
        assert_ok!(store.set(THEME_KEY, "arc"));
        assert_ok!(store.set(LEGACY_ARC_KEY, "true"));

        let reopened = FileStore::new(&path);
        assert_eq!(assert_ok!(reopened.get(THEME_KEY)).as_deref(), Some("arc"));
        assert_eq!(
            assert_ok!(reopened.get(LEGACY_ARC_KEY)).as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_file_store_recovers_from_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = FileStore::new(&path);
        assert_matches!(store.get(THEME_KEY), Err(StorageError::Corrupt { .. }));

        assert_ok!(store.set(THEME_KEY, "default"));
        assert_eq!(
            assert_ok!(store.get(THEME_KEY)).as_deref(),
            Some("default")
        );
    }
}
