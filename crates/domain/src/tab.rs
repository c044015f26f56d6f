//! Open editing tabs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::Id;
use crate::request::SavedRequest;

/// Identifier of an open tab.
///
/// Derived deterministically from the `(collection, folder, request)` triple.
/// Separators and escapes inside an id are escaped, so distinct triples never
/// share a tab id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    /// Separator between the three ids.
    pub const SEPARATOR: char = ':';

    /// Escape prefix for a separator or escape inside an id.
    pub const ESCAPE: char = '\\';

    /// Derives the tab id for a request triple.
    #[must_use]
    pub fn derive(collection_id: &str, folder_id: &str, request_id: &str) -> Self {
        let mut id = String::new();
        for (i, part) in [collection_id, folder_id, request_id].into_iter().enumerate() {
            if i > 0 {
                id.push(Self::SEPARATOR);
            }
            for ch in part.chars() {
                if ch == Self::SEPARATOR || ch == Self::ESCAPE {
                    id.push(Self::ESCAPE);
                }
                id.push(ch);
            }
        }
        Self(id)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TabId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A working copy of one request, open for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Derived tab id
    pub tab_id: TabId,
    /// Owning collection
    pub collection_id: Id,
    /// Owning folder
    pub folder_id: Id,
    /// The request this tab edits
    pub request_id: Id,
    /// Working snapshot; a copy, never the canonical object
    #[serde(rename = "originalRequest")]
    pub request: SavedRequest,
}

impl Tab {
    /// Creates a tab for the triple around a request snapshot.
    #[must_use]
    pub fn new(
        collection_id: impl Into<Id>,
        folder_id: impl Into<Id>,
        request_id: impl Into<Id>,
        request: SavedRequest,
    ) -> Self {
        let collection_id = collection_id.into();
        let folder_id = folder_id.into();
        let request_id = request_id.into();
        Self {
            tab_id: TabId::derive(&collection_id, &folder_id, &request_id),
            collection_id,
            folder_id,
            request_id,
            request,
        }
    }

    /// Returns true if this tab edits the given triple.
    #[must_use]
    pub fn matches(&self, collection_id: &str, folder_id: &str, request_id: &str) -> bool {
        self.collection_id == collection_id
            && self.folder_id == folder_id
            && self.request_id == request_id
    }
}
