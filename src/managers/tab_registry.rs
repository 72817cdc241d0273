use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::host::TabHost;
use crate::types::errors::HostError;
use crate::types::event::HostEvent;
use crate::types::stats::BadgeState;
use crate::types::tab::{TabDescriptor, TabId, WindowId};

/// Trait defining the tab mirror interface.
pub trait TabRegistryTrait {
    fn upsert_tab(&self, tab: TabDescriptor);
    fn remove_tab(&self, tab_id: TabId) -> Result<(), HostError>;
    fn activate_tab(&self, tab_id: TabId, window_id: WindowId) -> Result<(), HostError>;
    fn replace_all(&self, tabs: Vec<TabDescriptor>);
    fn get_tab(&self, tab_id: TabId) -> Option<TabDescriptor>;
    fn tab_count(&self) -> usize;
    fn badge(&self) -> Option<BadgeState>;
}

#[derive(Default)]
struct RegistryState {
    tabs: Vec<TabDescriptor>,
    badge: Option<BadgeState>,
}

impl RegistryState {
    fn find_tab_index(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }
}

/// In-memory mirror of the host's tabs, kept current by host events.
///
/// Serves as the `TabHost` when the host pushes its state instead of being
/// queried directly. Close commands and badge updates act on the mirror.
#[derive(Default)]
pub struct TabRegistry {
    state: Mutex<RegistryState>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mirrors the structural effect of a host event.
    pub fn apply(&self, event: &HostEvent) {
        match event {
            HostEvent::TabCreated { tab } | HostEvent::TabUpdated { tab, .. } => {
                self.upsert_tab(tab.clone());
            }
            HostEvent::TabRemoved { tab_id } => {
                // Removal of a tab we never saw is not an error for the mirror.
                let _ = self.remove_tab(*tab_id);
            }
            HostEvent::TabActivated { tab_id, window_id } => {
                if let Err(e) = self.activate_tab(*tab_id, *window_id) {
                    tracing::debug!(error = %e, "activation for unknown tab");
                }
            }
            HostEvent::WindowFocusChanged { .. } => {}
        }
    }
}

impl TabRegistryTrait for TabRegistry {
    /// Inserts a new tab or replaces the stored descriptor with the same id.
    fn upsert_tab(&self, tab: TabDescriptor) {
        let mut state = self.lock();
        if tab.active {
            for other in state.tabs.iter_mut() {
                if other.window_id == tab.window_id && other.id != tab.id {
                    other.active = false;
                }
            }
        }
        match state.find_tab_index(tab.id) {
            Some(idx) => state.tabs[idx] = tab,
            None => state.tabs.push(tab),
        }
    }

    fn remove_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        let mut state = self.lock();
        let idx = state
            .find_tab_index(tab_id)
            .ok_or(HostError::TabNotFound(tab_id))?;
        state.tabs.remove(idx);
        Ok(())
    }

    /// Makes `tab_id` the only active tab of `window_id`.
    fn activate_tab(&self, tab_id: TabId, window_id: WindowId) -> Result<(), HostError> {
        let mut state = self.lock();
        if state.find_tab_index(tab_id).is_none() {
            return Err(HostError::TabNotFound(tab_id));
        }
        for tab in state.tabs.iter_mut() {
            if tab.id == tab_id {
                tab.active = true;
                tab.window_id = window_id;
            } else if tab.window_id == window_id {
                tab.active = false;
            }
        }
        Ok(())
    }

    fn replace_all(&self, tabs: Vec<TabDescriptor>) {
        self.lock().tabs = tabs;
    }

    fn get_tab(&self, tab_id: TabId) -> Option<TabDescriptor> {
        self.lock().tabs.iter().find(|t| t.id == tab_id).cloned()
    }

    fn tab_count(&self) -> usize {
        self.lock().tabs.len()
    }

    /// Last badge the engine asked the host to show.
    fn badge(&self) -> Option<BadgeState> {
        self.lock().badge.clone()
    }
}

#[async_trait]
impl TabHost for TabRegistry {
    async fn list_tabs(&self) -> Vec<TabDescriptor> {
        self.lock().tabs.clone()
    }

    /// Closes all of `ids` or none of them.
    async fn close_tabs(&self, ids: &[TabId]) -> Result<(), HostError> {
        let mut state = self.lock();
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| state.find_tab_index(**id).is_none())
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(HostError::CommandFailed(format!(
                "cannot close unknown tabs: {}",
                missing.join(", ")
            )));
        }
        state.tabs.retain(|t| !ids.contains(&t.id));
        Ok(())
    }

    async fn set_badge(&self, badge: &BadgeState) -> Result<(), HostError> {
        self.lock().badge = Some(badge.clone());
        Ok(())
    }
}
