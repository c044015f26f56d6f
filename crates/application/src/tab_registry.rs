//! Open tabs and the active tab.

use relay_domain::persistence::{TABS_KEY, TABS_VERSION};
use relay_domain::{
    DomainResult, PersistedState, RequestPatch, SavedRequest, Tab, TabId, TabsState,
};
use tracing::{debug, info, warn};

use crate::error::ApplicationResult;
use crate::ports::StateStorage;

/// Owns the open tabs and writes them through on every effective change.
pub struct TabRegistry<S> {
    storage: S,
    state: TabsState,
}

impl<S: StateStorage> TabRegistry<S> {
    /// Loads the tabs from storage. A missing document loads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored document cannot be read or decoded.
    pub fn load(storage: S) -> ApplicationResult<Self> {
        let state = storage
            .load::<PersistedState<TabsState>>(TABS_KEY)?
            .map(|doc| doc.state)
            .unwrap_or_default();
        debug!(tabs = state.open_tabs.len(), "loaded tabs");
        Ok(Self { storage, state })
    }

    /// Returns the open tabs in open order.
    #[must_use]
    pub fn open_tabs(&self) -> &[Tab] {
        &self.state.open_tabs
    }

    /// Returns the active tab id, which may not match any open tab.
    #[must_use]
    pub const fn active_tab(&self) -> Option<&TabId> {
        self.state.active_tab.as_ref()
    }

    /// Finds an open tab by id.
    #[must_use]
    pub fn tab(&self, tab_id: &TabId) -> Option<&Tab> {
        self.state.open_tabs.iter().find(|t| &t.tab_id == tab_id)
    }

    /// Returns the active tab, or `None` if unset or not open.
    #[must_use]
    pub fn active_tab_data(&self) -> Option<&Tab> {
        self.active_tab().and_then(|id| self.tab(id))
    }

    /// Opens the triple in a tab, or reuses the existing one, and makes it
    /// active.
    ///
    /// `lookup` supplies the snapshot for a new tab. If it fails the open is
    /// abandoned: nothing changes and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the tabs cannot be persisted.
    pub fn open_request<F>(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        request_id: &str,
        lookup: F,
    ) -> ApplicationResult<Option<TabId>>
    where
        F: FnOnce(&str, &str, &str) -> DomainResult<SavedRequest>,
    {
        let mut next = self.state.clone();
        let existing = self
            .state
            .open_tabs
            .iter()
            .find(|t| t.matches(collection_id, folder_id, request_id))
            .map(|t| t.tab_id.clone());

        let created = existing.is_none();
        let tab_id = if let Some(tab_id) = existing {
            tab_id
        } else {
            let request = match lookup(collection_id, folder_id, request_id) {
                Ok(request) => request,
                Err(error) => {
                    warn!(collection_id, folder_id, request_id, %error, "cannot open tab");
                    return Ok(None);
                }
            };
            let tab = Tab::new(collection_id, folder_id, request_id, request);
            let tab_id = tab.tab_id.clone();
            next.open_tabs.push(tab);
            tab_id
        };

        if created || next.active_tab.as_ref() != Some(&tab_id) {
            next.active_tab = Some(tab_id.clone());
            self.commit(next)?;
        }
        if created {
            info!(%tab_id, "tab opened");
        }
        Ok(Some(tab_id))
    }

    /// Closes a tab.
    ///
    /// When the active tab is closed, the tab to its left becomes active,
    /// else the new first tab, else none. Returns whether a tab was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the tabs cannot be persisted.
    pub fn close_tab(&mut self, tab_id: &TabId) -> ApplicationResult<bool> {
        let position = self.state.open_tabs.iter().position(|t| &t.tab_id == tab_id);
        let mut next = self.state.clone();
        next.open_tabs.retain(|t| &t.tab_id != tab_id);

        if next.active_tab.as_ref() == Some(tab_id) {
            next.active_tab = match position {
                Some(index) if index > 0 => next.open_tabs.get(index - 1),
                _ => next.open_tabs.first(),
            }
            .map(|t| t.tab_id.clone());
        }

        if next == self.state {
            return Ok(false);
        }
        self.commit(next)?;
        if position.is_some() {
            info!(%tab_id, "tab closed");
        }
        Ok(position.is_some())
    }

    /// Closes every tab and unsets the active tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the tabs cannot be persisted.
    pub fn close_all_tabs(&mut self) -> ApplicationResult<()> {
        if self.state == TabsState::default() {
            return Ok(());
        }
        let count = self.state.open_tabs.len();
        self.commit(TabsState::default())?;
        info!(tabs = count, "all tabs closed");
        Ok(())
    }

    /// Sets the active tab without checking that it is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the tabs cannot be persisted.
    pub fn set_active_tab(&mut self, tab_id: Option<TabId>) -> ApplicationResult<()> {
        if self.state.active_tab == tab_id {
            return Ok(());
        }
        let mut next = self.state.clone();
        next.active_tab = tab_id;
        self.commit(next)
    }

    /// Merges `patch` into the working snapshot of the tab open for the
    /// triple. Returns whether a snapshot changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the tabs cannot be persisted.
    pub fn update_open_tab_request(
        &mut self,
        collection_id: &str,
        folder_id: &str,
        request_id: &str,
        patch: &RequestPatch,
    ) -> ApplicationResult<bool> {
        let Some(index) = self
            .state
            .open_tabs
            .iter()
            .position(|t| t.matches(collection_id, folder_id, request_id))
        else {
            return Ok(false);
        };
        if !patch.would_change(&self.state.open_tabs[index].request) {
            return Ok(false);
        }
        let mut next = self.state.clone();
        patch.apply(&mut next.open_tabs[index].request);
        self.commit(next)?;
        Ok(true)
    }

    fn commit(&mut self, next: TabsState) -> ApplicationResult<()> {
        let doc = PersistedState::new(next, TABS_VERSION);
        self.storage.save(TABS_KEY, &doc)?;
        self.state = doc.state;
        Ok(())
    }
}
