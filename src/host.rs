//! Host collaborator surface.
//!
//! The extension platform owns the tabs, windows and renderer processes. These
//! traits describe the small slice of it the estimation engine consumes, so the
//! engine can be driven by the in-memory registries in `managers` or by a mock
//! in tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::types::errors::HostError;
use crate::types::memory::{ProcessId, ProcessMemory};
use crate::types::stats::BadgeState;
use crate::types::tab::{TabDescriptor, TabId, WindowInfo};

/// Tab and window queries plus the fire-and-forget commands.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Lists every open tab across all windows.
    async fn list_tabs(&self) -> Vec<TabDescriptor>;

    /// Lists windows with the tabs they contain, ordered by window id.
    async fn list_windows(&self) -> Vec<WindowInfo> {
        let mut windows: BTreeMap<i64, Vec<TabId>> = BTreeMap::new();
        for tab in self.list_tabs().await {
            windows.entry(tab.window_id).or_default().push(tab.id);
        }
        windows
            .into_iter()
            .map(|(id, tab_ids)| WindowInfo { id, tab_ids })
            .collect()
    }

    /// Closes the given tabs.
    async fn close_tabs(&self, ids: &[TabId]) -> Result<(), HostError>;

    /// Sets the toolbar badge.
    async fn set_badge(&self, badge: &BadgeState) -> Result<(), HostError>;
}

/// Optional process-memory capability. Hosts without it expose `None`.
#[async_trait]
pub trait ProcessRegistry: Send + Sync {
    /// Resolves the renderer process that hosts `tab_id`.
    async fn process_id_for_tab(&self, tab_id: TabId) -> Result<ProcessId, HostError>;

    /// Fetches private-memory figures for a batch of processes.
    async fn process_info(
        &self,
        ids: &[ProcessId],
    ) -> Result<HashMap<ProcessId, ProcessMemory>, HostError>;
}
