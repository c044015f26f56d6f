//! Persisted state documents.
//!
//! Each store is saved under its own key as `{ "state": ..., "version": n }`.
//! The version is written and read back but not used for migration.

use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::tab::{Tab, TabId};

/// Storage key of the collection tree.
pub const COLLECTIONS_KEY: &str = "collections-storage";

/// Schema version written with the collection tree.
pub const COLLECTIONS_VERSION: u32 = 0;

/// Storage key of the open tabs.
pub const TABS_KEY: &str = "opentab-storage";

/// Schema version written with the open tabs.
pub const TABS_VERSION: u32 = 1;

/// Envelope around a persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState<T> {
    /// The stored state
    pub state: T,
    /// Schema version tag
    #[serde(default)]
    pub version: u32,
}

impl<T> PersistedState<T> {
    /// Wraps a state with its version tag.
    #[must_use]
    pub const fn new(state: T, version: u32) -> Self {
        Self { state, version }
    }
}

/// The collection tree as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionsState {
    /// All collections, in creation order
    #[serde(default)]
    pub collections: Vec<Collection>,
}

/// The open tabs as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsState {
    /// Open tabs, in open order
    #[serde(default)]
    pub open_tabs: Vec<Tab>,
    /// The active tab, if any
    #[serde(default)]
    pub active_tab: Option<TabId>,
}
