//! Collection tree types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::Id;
use crate::request::SavedRequest;

/// A named grouping of requests within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier
    pub id: Id,
    /// Folder name
    pub name: String,
    /// Requests in this folder, in insertion order
    #[serde(default)]
    pub requests: Vec<SavedRequest>,
}

impl Folder {
    /// Creates a new empty folder.
    #[must_use]
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            requests: Vec::new(),
        }
    }

    /// Finds a request by id.
    #[must_use]
    pub fn request(&self, request_id: &str) -> Option<&SavedRequest> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    /// Finds a request by id for mutation.
    pub fn request_mut(&mut self, request_id: &str) -> Option<&mut SavedRequest> {
        self.requests.iter_mut().find(|r| r.id == request_id)
    }
}

/// A top-level named grouping of folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier
    pub id: Id,
    /// Collection name
    pub name: String,
    /// Folders in this collection, in insertion order
    #[serde(default)]
    pub folders: Vec<Folder>,
}

impl Collection {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            folders: Vec::new(),
        }
    }

    /// Finds a folder by id.
    #[must_use]
    pub fn folder(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == folder_id)
    }

    /// Finds a folder by id for mutation.
    pub fn folder_mut(&mut self, folder_id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == folder_id)
    }
}

/// Resolves a request through the tree, naming the level that failed.
///
/// # Errors
///
/// Returns the not-found error for the first of collection, folder or request
/// that does not resolve.
pub fn find_request<'a>(
    collections: &'a [Collection],
    collection_id: &str,
    folder_id: &str,
    request_id: &str,
) -> DomainResult<&'a SavedRequest> {
    let collection = collections
        .iter()
        .find(|c| c.id == collection_id)
        .ok_or_else(|| DomainError::CollectionNotFound(collection_id.to_string()))?;
    let folder = collection
        .folder(folder_id)
        .ok_or_else(|| DomainError::FolderNotFound(folder_id.to_string()))?;
    folder
        .request(request_id)
        .ok_or_else(|| DomainError::RequestNotFound(request_id.to_string()))
}

/// Resolves a request through the tree for mutation; `None` on any miss.
pub fn find_request_mut<'a>(
    collections: &'a mut [Collection],
    collection_id: &str,
    folder_id: &str,
    request_id: &str,
) -> Option<&'a mut SavedRequest> {
    collections
        .iter_mut()
        .find(|c| c.id == collection_id)?
        .folder_mut(folder_id)?
        .request_mut(request_id)
}
