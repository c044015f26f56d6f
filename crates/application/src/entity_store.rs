//! The canonical collection tree.

use relay_domain::collection::{find_request, find_request_mut};
use relay_domain::persistence::{COLLECTIONS_KEY, COLLECTIONS_VERSION};
use relay_domain::{
    Collection, CollectionsState, DomainResult, Folder, HttpMethod, Id, PersistedState,
    RequestPatch, SavedRequest, generate_id,
};
use tracing::{debug, info};

use crate::error::ApplicationResult;
use crate::ports::{Clock, StateStorage};

/// Owns the collection tree and writes it through on every effective change.
///
/// Mutations are applied to a copy of the tree, the copy is persisted, and
/// only then does it become the live state. A failed write leaves the tree
/// as it was.
pub struct EntityStore<S, C> {
    storage: S,
    clock: C,
    state: CollectionsState,
}

impl<S: StateStorage, C: Clock> EntityStore<S, C> {
    /// Loads the tree from storage. A missing document loads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored document cannot be read or decoded.
    pub fn load(storage: S, clock: C) -> ApplicationResult<Self> {
        let state = storage
            .load::<PersistedState<CollectionsState>>(COLLECTIONS_KEY)?
            .map(|doc| doc.state)
            .unwrap_or_default();
        debug!(collections = state.collections.len(), "loaded collections");
        Ok(Self {
            storage,
            clock,
            state,
        })
    }

    /// Returns the whole tree.
    #[must_use]
    pub fn collections(&self) -> &[Collection] {
        &self.state.collections
    }

    /// Creates a collection and returns its id. Empty names are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn add_collection(&mut self, name: impl Into<String>) -> ApplicationResult<Id> {
        let collection = Collection::new(generate_id(), name);
        let id = collection.id.clone();
        let mut next = self.state.clone();
        next.collections.push(collection);
        self.commit(next)?;
        info!(collection_id = %id, "collection added");
        Ok(id)
    }

    /// Appends a folder to a collection. Returns `None` if the collection is
    /// unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn add_folder_to_collection(
        &mut self,
        collection_id: &str,
        name: impl Into<String>,
    ) -> ApplicationResult<Option<Id>> {
        let mut next = self.state.clone();
        let Some(collection) = next.collections.iter_mut().find(|c| c.id == collection_id) else {
            debug!(collection_id, "add folder: unknown collection");
            return Ok(None);
        };
        let folder = Folder::new(generate_id(), name);
        let id = folder.id.clone();
        collection.folders.push(folder);
        self.commit(next)?;
        info!(collection_id, folder_id = %id, "folder added");
        Ok(Some(id))
    }

    /// Appends a request with default contents to a folder. Returns `None`
    /// if the collection/folder pair does not resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn add_request_to_collection(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        method: HttpMethod,
        name: impl Into<String>,
    ) -> ApplicationResult<Option<Id>> {
        let mut next = self.state.clone();
        let Some(folder) = next
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .and_then(|c| c.folder_mut(folder_id))
        else {
            debug!(collection_id, folder_id, "add request: unknown folder");
            return Ok(None);
        };
        let request = SavedRequest::new(generate_id(), name, method, self.clock.now());
        let id = request.id.clone();
        folder.requests.push(request);
        self.commit(next)?;
        info!(collection_id, folder_id, request_id = %id, "request added");
        Ok(Some(id))
    }

    /// Removes a collection with all its folders and requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn delete_collection(&mut self, collection_id: &str) -> ApplicationResult<bool> {
        let mut next = self.state.clone();
        let before = next.collections.len();
        next.collections.retain(|c| c.id != collection_id);
        if next.collections.len() == before {
            debug!(collection_id, "delete collection: not found");
            return Ok(false);
        }
        self.commit(next)?;
        info!(collection_id, "collection deleted");
        Ok(true)
    }

    /// Removes a folder with all its requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn delete_folder(
        &mut self,
        collection_id: &str,
        folder_id: &str,
    ) -> ApplicationResult<bool> {
        let mut next = self.state.clone();
        let removed = next
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .is_some_and(|c| {
                let before = c.folders.len();
                c.folders.retain(|f| f.id != folder_id);
                c.folders.len() != before
            });
        if !removed {
            debug!(collection_id, folder_id, "delete folder: not found");
            return Ok(false);
        }
        self.commit(next)?;
        info!(collection_id, folder_id, "folder deleted");
        Ok(true)
    }

    /// Removes a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn delete_request(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        request_id: &str,
    ) -> ApplicationResult<bool> {
        let mut next = self.state.clone();
        let removed = next
            .collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .and_then(|c| c.folder_mut(folder_id))
            .is_some_and(|f| {
                let before = f.requests.len();
                f.requests.retain(|r| r.id != request_id);
                f.requests.len() != before
            });
        if !removed {
            debug!(collection_id, folder_id, request_id, "delete request: not found");
            return Ok(false);
        }
        self.commit(next)?;
        info!(collection_id, folder_id, request_id, "request deleted");
        Ok(true)
    }

    /// Merges `patch` into a request and refreshes its `updated_at`.
    ///
    /// Unknown triples and patches that change nothing are no-ops: no
    /// timestamp bump, no write. Returns whether the request changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn update_request(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        request_id: &str,
        patch: &RequestPatch,
    ) -> ApplicationResult<bool> {
        let Ok(current) =
            find_request(&self.state.collections, collection_id, folder_id, request_id)
        else {
            debug!(collection_id, folder_id, request_id, "update request: stale reference");
            return Ok(false);
        };
        if !patch.would_change(current) {
            return Ok(false);
        }

        let mut next = self.state.clone();
        if let Some(request) =
            find_request_mut(&mut next.collections, collection_id, folder_id, request_id)
        {
            patch.apply(request);
            request.updated_at = self.clock.now();
        }
        self.commit(next)?;
        debug!(request_id, "request updated");
        Ok(true)
    }

    /// Looks up a request.
    ///
    /// # Errors
    ///
    /// Returns the not-found error naming the level that failed.
    pub fn get_request(
        &self,
        collection_id: &str,
        folder_id: &str,
        request_id: &str,
    ) -> DomainResult<&SavedRequest> {
        find_request(&self.state.collections, collection_id, folder_id, request_id)
    }

    /// Puts a request back exactly as given, timestamps included. Used to
    /// undo an edit whose other half could not be written.
    pub(crate) fn restore_request(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        request_id: &str,
        previous: SavedRequest,
    ) -> ApplicationResult<()> {
        let mut next = self.state.clone();
        let Some(request) =
            find_request_mut(&mut next.collections, collection_id, folder_id, request_id)
        else {
            return Ok(());
        };
        *request = previous;
        self.commit(next)?;
        debug!(request_id, "request restored");
        Ok(())
    }

    fn commit(&mut self, next: CollectionsState) -> ApplicationResult<()> {
        let doc = PersistedState::new(next, COLLECTIONS_VERSION);
        self.storage.save(COLLECTIONS_KEY, &doc)?;
        self.state = doc.state;
        Ok(())
    }
}
