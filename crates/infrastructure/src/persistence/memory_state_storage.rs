//! In-memory state storage.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use relay_application::ports::{StateStorage, StorageError};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::serialization::{from_json, to_json_stable};

/// Keeps state documents in a shared map.
///
/// Clones share the same map, so several stores can be backed by one
/// instance. Documents are kept as serialized JSON to mirror the file
/// backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStorage {
    docs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStateStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw JSON stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.docs.lock().get(key).cloned()
    }

    /// Returns the stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.docs.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl StateStorage for MemoryStateStorage {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(json) = self.raw(key) else {
            return Ok(None);
        };
        from_json(&json).map(Some).map_err(|e| StorageError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = to_json_stable(value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.docs.lock().insert(key.to_string(), json);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relay_domain::persistence::TABS_KEY;
    use relay_domain::{PersistedState, TabId, TabsState};

    #[test]
    fn test_clones_share_documents() {
        let storage = MemoryStateStorage::new();
        let other = storage.clone();
        let doc = PersistedState::new(
            TabsState {
                open_tabs: Vec::new(),
                active_tab: Some(TabId::from("a:b:c")),
            },
            1,
        );
        storage.save(TABS_KEY, &doc).unwrap();

        let loaded: PersistedState<TabsState> = other.load(TABS_KEY).unwrap().unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(other.keys(), vec![TABS_KEY.to_string()]);
        assert!(other.raw(TABS_KEY).unwrap().contains("\"activeTab\": \"a:b:c\""));
    }

    #[test]
    fn test_missing_key() {
        let storage = MemoryStateStorage::new();
        assert_eq!(storage.load::<TabsState>("nothing").unwrap(), None);
    }
}
