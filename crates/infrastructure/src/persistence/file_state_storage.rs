//! File-backed state storage.
//!
//! Each key is stored as `<data_dir>/<key>.json`. Writes go to a temporary
//! file in the same directory which is then renamed over the target, so a
//! crash mid-write leaves the previous document intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use relay_application::ports::{StateStorage, StorageError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Stores state documents as JSON files in a directory.
#[derive(Debug, Clone)]
pub struct FileStateStorage {
    dir: PathBuf,
}

impl FileStateStorage {
    /// Creates a storage rooted at `dir`. The directory is created on the
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file a key is stored in.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or contains a path separator.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::Write {
                key: key.to_string(),
                message: "invalid storage key".to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(contents)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl StateStorage for FileStateStorage {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no state file");
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::Read {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
        };
        from_json_bytes(&bytes)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let write_error = |message: String| StorageError::Write {
            key: key.to_string(),
            message,
        };
        let contents = to_json_stable_bytes(value).map_err(|e| write_error(e.to_string()))?;
        self.write_atomic(&path, &contents)
            .map_err(|e| write_error(e.to_string()))?;
        debug!(path = %path.display(), bytes = contents.len(), "state saved");
        Ok(())
    }
}
