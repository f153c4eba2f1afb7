use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::CoreError;

const TMP_SUFFIX: &str = "tmp";

/// Blocking key-value storage the tracker snapshots into.
///
/// Writes replace the whole value stored under the key.
pub trait KeyValueBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError>;

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), CoreError>;

    /// Returns `true` if a value was removed.
    fn remove(&mut self, key: &str) -> Result<bool, CoreError>;
}

/// In-process backend, optionally with a byte quota to emulate a full
/// browser-style storage area.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    values: HashMap<String, Vec<u8>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects writes once the stored bytes would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Bytes currently stored across all keys.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), CoreError> {
        if let Some(quota) = self.quota {
            let existing = self.values.get(key).map_or(0, Vec::len);
            let available = quota.saturating_sub(self.used_bytes() - existing);
            if value.len() > available {
                return Err(CoreError::StorageFull {
                    needed: value.len(),
                    available,
                });
            }
        }
        debug!(key, bytes = value.len(), "memory backend write");
        self.values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, CoreError> {
        Ok(self.values.remove(key).is_some())
    }
}

/// One file per key inside a directory. Writes go to a temporary file that
/// is then renamed over the target.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates `root` if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        if key.is_empty() || key.contains(['/', '\\', '\0']) || key == "." || key == ".." {
            return Err(CoreError::Storage(format!("Invalid storage key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.snapshot")))
    }
}

impl KeyValueBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(TMP_SUFFIX);
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "file backend write");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, CoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
