//! Keeps stored requests and their open tabs in step.

use relay_domain::request::query::build_url;
use relay_domain::{
    Collection, HttpMethod, Id, QueryParams, RequestPatch, ResponseDescriptor, SavedRequest, Tab,
    TabId,
};
use tracing::{debug, warn};

use crate::dispatch::{DispatchError, Dispatcher};
use crate::entity_store::EntityStore;
use crate::error::ApplicationResult;
use crate::ports::{Clock, HttpClient, StateStorage};
use crate::tab_registry::TabRegistry;

/// Which side an edit touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// The stored request changed.
    pub store_changed: bool,
    /// An open tab's working snapshot changed.
    pub tab_changed: bool,
}

impl EditOutcome {
    /// Returns true if either side changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        self.store_changed || self.tab_changed
    }
}

/// Owns the entity store and the tab registry.
///
/// Every edit made through an open tab goes through [`Workbench::apply_edit`]
/// so the stored request and the tab snapshot are updated together.
pub struct Workbench<S, C> {
    entities: EntityStore<S, C>,
    tabs: TabRegistry<S>,
}

impl<S: StateStorage + Clone, C: Clock> Workbench<S, C> {
    /// Loads both stores from the same storage.
    ///
    /// # Errors
    ///
    /// Returns an error if either stored document cannot be read.
    pub fn load(storage: S, clock: C) -> ApplicationResult<Self> {
        let entities = EntityStore::load(storage.clone(), clock)?;
        let tabs = TabRegistry::load(storage)?;
        Ok(Self { entities, tabs })
    }

    /// Returns the entity store.
    #[must_use]
    pub const fn entities(&self) -> &EntityStore<S, C> {
        &self.entities
    }

    /// Returns the tab registry.
    #[must_use]
    pub const fn tabs(&self) -> &TabRegistry<S> {
        &self.tabs
    }

    /// Returns the collection tree.
    #[must_use]
    pub fn collections(&self) -> &[Collection] {
        self.entities.collections()
    }

    /// Creates a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn add_collection(&mut self, name: impl Into<String>) -> ApplicationResult<Id> {
        self.entities.add_collection(name)
    }

    /// Creates a folder in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn add_folder(
        &mut self,
        collection_id: &str,
        name: impl Into<String>,
    ) -> ApplicationResult<Option<Id>> {
        self.entities.add_folder_to_collection(collection_id, name)
    }

    /// Creates a request in a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn add_request(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        method: HttpMethod,
        name: impl Into<String>,
    ) -> ApplicationResult<Option<Id>> {
        self.entities
            .add_request_to_collection(collection_id, folder_id, method, name)
    }

    /// Removes a collection with everything in it. Open tabs are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn delete_collection(&mut self, collection_id: &str) -> ApplicationResult<bool> {
        self.entities.delete_collection(collection_id)
    }

    /// Removes a folder with its requests. Open tabs are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be persisted.
    pub fn delete_folder(
        &mut self,
        collection_id: &str,
        folder_id: &str,
    ) -> ApplicationResult<bool> {
        self.entities.delete_folder(collection_id, folder_id)
    }

    /// Removes a request. Its tab, if open, is kept.
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
        self.entities
            .delete_request(collection_id, folder_id, request_id)
    }

    /// Opens a stored request in a tab, or focuses its existing tab.
    ///
    /// Unknown triples are logged and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tabs cannot be persisted.
    pub fn open_request(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        request_id: &str,
    ) -> ApplicationResult<Option<TabId>> {
        let entities = &self.entities;
        self.tabs
            .open_request(collection_id, folder_id, request_id, |c, f, r| {
                entities.get_request(c, f, r).cloned()
            })
    }

    /// Applies `patch` to the stored request, then to its open tab.
    ///
    /// A stale triple no-ops on the store and still updates a matching tab.
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be persisted. When the tab
    /// write fails the stored request is put back as it was.
    pub fn apply_edit(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        request_id: &str,
        patch: &RequestPatch,
    ) -> ApplicationResult<EditOutcome> {
        let previous = self
            .entities
            .get_request(collection_id, folder_id, request_id)
            .ok()
            .cloned();
        let store_changed =
            self.entities
                .update_request(collection_id, folder_id, request_id, patch)?;
        let tab_changed = match self
            .tabs
            .update_open_tab_request(collection_id, folder_id, request_id, patch)
        {
            Ok(changed) => changed,
            Err(error) => {
                if store_changed
                    && let Some(previous) = previous
                    && let Err(undo) =
                        self.entities
                            .restore_request(collection_id, folder_id, request_id, previous)
                {
                    warn!(request_id, %undo, "stored edit could not be undone");
                }
                return Err(error);
            }
        };
        let outcome = EditOutcome {
            store_changed,
            tab_changed,
        };
        debug!(request_id, ?outcome, "edit applied");
        Ok(outcome)
    }

    /// Applies `patch` to the request behind the active tab.
    ///
    /// Returns `None` when no tab is active.
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be persisted.
    pub fn apply_edit_to_active(
        &mut self,
        patch: &RequestPatch,
    ) -> ApplicationResult<Option<EditOutcome>> {
        let Some((c, f, r)) = self.active_triple() else {
            return Ok(None);
        };
        self.apply_edit(&c, &f, &r, patch).map(Some)
    }

    /// Rewrites the query string of the tab open for the triple from
    /// structured rows. The base url (text before `?`) is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be persisted.
    pub fn edit_query_params(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        request_id: &str,
        params: &QueryParams,
    ) -> ApplicationResult<EditOutcome> {
        let current = self
            .tabs
            .tab(&TabId::derive(collection_id, folder_id, request_id))
            .map(|t| t.request.url.clone())
            .or_else(|| {
                self.entities
                    .get_request(collection_id, folder_id, request_id)
                    .ok()
                    .map(|r| r.url.clone())
            });
        let Some(current) = current else {
            debug!(request_id, "edit params: stale reference");
            return Ok(EditOutcome::default());
        };
        let patch = RequestPatch::new().with_url(build_url(&current, params));
        self.apply_edit(collection_id, folder_id, request_id, &patch)
    }

    /// Rewrites the active tab's query string from structured rows.
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be persisted.
    pub fn edit_active_query_params(
        &mut self,
        params: &QueryParams,
    ) -> ApplicationResult<Option<EditOutcome>> {
        let Some((c, f, r)) = self.active_triple() else {
            return Ok(None);
        };
        self.edit_query_params(&c, &f, &r, params).map(Some)
    }

    /// Derives the structured params from the active tab's url.
    #[must_use]
    pub fn active_query_params(&self) -> Option<QueryParams> {
        self.tabs.active_tab_data().map(|t| t.request.query_params())
    }

    /// Returns the active tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.active_tab_data()
    }

    /// Returns a copy of the active tab's working snapshot.
    #[must_use]
    pub fn active_snapshot(&self) -> Option<SavedRequest> {
        self.tabs.active_tab_data().map(|t| t.request.clone())
    }

    /// Sends the active tab's working snapshot.
    ///
    /// The snapshot is taken before the call suspends.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoActiveTab`] without an active tab, or the
    /// dispatcher's refusal.
    pub async fn send_active<H: HttpClient>(
        &self,
        dispatcher: &Dispatcher<H>,
    ) -> Result<ResponseDescriptor, DispatchError> {
        let snapshot = self.active_snapshot().ok_or(DispatchError::NoActiveTab)?;
        dispatcher.send(&snapshot).await
    }

    /// Closes a tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the tabs cannot be persisted.
    pub fn close_tab(&mut self, tab_id: &TabId) -> ApplicationResult<bool> {
        self.tabs.close_tab(tab_id)
    }

    /// Closes every tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the tabs cannot be persisted.
    pub fn close_all_tabs(&mut self) -> ApplicationResult<()> {
        self.tabs.close_all_tabs()
    }

    /// Sets or clears the active tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the tabs cannot be persisted.
    pub fn set_active_tab(&mut self, tab_id: Option<TabId>) -> ApplicationResult<()> {
        self.tabs.set_active_tab(tab_id)
    }

    fn active_triple(&self) -> Option<(Id, Id, Id)> {
        self.tabs.active_tab_data().map(|t| {
            (
                t.collection_id.clone(),
                t.folder_id.clone(),
                t.request_id.clone(),
            )
        })
    }
}
