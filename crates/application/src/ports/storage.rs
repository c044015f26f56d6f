//! Key/value state storage port

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from a state storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored value could not be read.
    #[error("failed to read '{key}': {message}")]
    Read {
        /// Storage key
        key: String,
        /// Backend message
        message: String,
    },

    /// The value could not be written.
    #[error("failed to write '{key}': {message}")]
    Write {
        /// Storage key
        key: String,
        /// Backend message
        message: String,
    },

    /// The stored value does not have the expected shape.
    #[error("corrupt state under '{key}': {message}")]
    Corrupt {
        /// Storage key
        key: String,
        /// Decoder message
        message: String,
    },
}

impl StorageError {
    /// Returns the key the failure concerns.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Read { key, .. } | Self::Write { key, .. } | Self::Corrupt { key, .. } => key,
        }
    }
}

/// Port for persisting whole state documents under string keys.
///
/// Each save replaces the previous document atomically; a reader never
/// observes a partial write.
pub trait StateStorage: Send + Sync {
    /// Loads the document stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or decoded.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError>;

    /// Stores `value` under `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError>;
}
