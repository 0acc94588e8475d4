//! Durable key/value text slots.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::StoreError;

/// A named text cell that survives the session.
pub trait Slot {
    /// Read the text stored under `key`; `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    /// Returns a store error when the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the text stored under `key`.
    ///
    /// # Errors
    /// Returns a store error when the write is rejected or fails.
    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError>;
}

impl<T: Slot + ?Sized> Slot for &T {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        (**self).write(key, contents)
    }
}

impl<T: Slot + ?Sized> Slot for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        (**self).write(key, contents)
    }
}

/// Check that `key` can name a slot (`[A-Za-z0-9_.-]`, not starting with a dot).
///
/// # Errors
/// Returns [`StoreError::InvalidKey`] for empty or unsafe keys.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Slots stored under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidKey`] for keys that cannot be file names.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // Write beside the target and rename so readers never see a torn file.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote slot file");
        Ok(())
    }
}

/// In-process slots, optionally limited in size. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemorySlot {
    /// Unlimited in-memory slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory slots rejecting writes larger than `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Store raw text directly, bypassing the quota.
    ///
    /// # Errors
    /// Returns [`StoreError::LockError`] if the slot map is poisoned.
    pub fn insert(&self, key: &str, contents: impl Into<String>) -> Result<(), StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::LockError)?
            .insert(key.to_owned(), contents.into());
        Ok(())
    }

    /// Raw text stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok().and_then(|entries| entries.get(key).cloned())
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::LockError)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota
            && contents.len() > quota
        {
            return Err(StoreError::QuotaExceeded {
                key: key.to_owned(),
                bytes: contents.len(),
                quota,
            });
        }
        self.entries
            .lock()
            .map_err(|_| StoreError::LockError)?
            .insert(key.to_owned(), contents.to_owned());
        Ok(())
    }
}
