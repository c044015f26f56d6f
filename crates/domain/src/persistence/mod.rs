//! Persisted state shapes

mod snapshot;

pub use snapshot::{
    COLLECTIONS_KEY, COLLECTIONS_VERSION, CollectionsState, PersistedState, TABS_KEY,
    TABS_VERSION, TabsState,
};
