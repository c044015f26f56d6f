//! Domain error types

use thiserror::Error;

use crate::id::Id;

/// Domain-level errors that can occur during lookup or validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No collection with the given id exists.
    #[error("collection not found: {0}")]
    CollectionNotFound(Id),

    /// The collection exists but holds no folder with the given id.
    #[error("folder not found: {0}")]
    FolderNotFound(Id),

    /// The folder exists but holds no request with the given id.
    #[error("request not found: {0}")]
    RequestNotFound(Id),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A `key=value` pair could not be parsed.
    #[error("invalid key/value pair: {0}")]
    InvalidPair(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
