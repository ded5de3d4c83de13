//! Local key-value persistence of the document.
//!
//! Used only outside a shared room: the whole element list is written under
//! [`ELEMENTS_KEY`] after each mutation and read back on startup.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::consts::ELEMENTS_KEY;
use crate::doc::Shape;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String slots addressed by key, in the manner of browser local storage.
pub trait KeyValueStore: Send {
    /// Read a slot. `Ok(None)` when the key was never written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backing medium fails.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a slot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backing medium fails.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Process-local store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.slots.insert(key.to_owned(), value);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io { path: dir.clone(), source })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }
}

/// Write the full element list to its slot.
///
/// # Errors
///
/// Returns [`StorageError`] if encoding or the write fails.
pub fn save_elements(store: &mut dyn KeyValueStore, shapes: &[Shape]) -> Result<(), StorageError> {
    let json = serde_json::to_string(shapes)?;
    store.set(ELEMENTS_KEY, json)
}

/// Read the element list back. `Ok(None)` when nothing was saved.
///
/// # Errors
///
/// Returns [`StorageError`] if the read fails or the slot does not hold a
/// shape array.
pub fn load_elements(store: &dyn KeyValueStore) -> Result<Option<Vec<Shape>>, StorageError> {
    match store.get(ELEMENTS_KEY)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}
