//! Cart Storage
//!
//! Durable key-value backends the cart mirrors itself into.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors raised by a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be used by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Reading or writing the backing medium failed.
    #[error("storage io error")]
    Io(#[from] io::Error),
}

/// A string key-value store that survives process restarts.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);

        Ok(())
    }
}

/// Directory-backed storage holding one `<key>.json` document per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();

        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    /// Directory the documents live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");

        // Readers never observe a partially written document.
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn memory_storage_round_trips_values() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.set("cart", "{}")?;

        assert_eq!(storage.get("cart")?.as_deref(), Some("{}"));

        storage.remove("cart")?;

        assert_eq!(storage.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn file_storage_missing_key_is_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::open(dir.path())?;

        assert_eq!(storage.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn file_storage_survives_reopen() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut storage = FileStorage::open(dir.path())?;
        storage.set("cart", r#"{"items":[]}"#)?;

        let reopened = FileStorage::open(dir.path())?;

        assert_eq!(reopened.get("cart")?.as_deref(), Some(r#"{"items":[]}"#));

        Ok(())
    }

    #[test]
    fn file_storage_rejects_path_like_keys() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::open(dir.path())?;

        let result = storage.set("../cart", "{}");

        assert!(
            matches!(result, Err(StorageError::InvalidKey(_))),
            "expected InvalidKey, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn file_storage_remove_missing_key_is_ok() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::open(dir.path())?;

        storage.remove("cart")?;

        Ok(())
    }
}
