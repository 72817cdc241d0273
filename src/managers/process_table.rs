use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::host::ProcessRegistry;
use crate::types::errors::HostError;
use crate::types::memory::{ProcessId, ProcessMemory};
use crate::types::tab::TabId;

#[derive(Default)]
struct ProcessState {
    tab_processes: HashMap<TabId, ProcessId>,
    private_memory: HashMap<ProcessId, u64>,
}

impl ProcessState {
    /// Drops memory figures of processes no tab maps to any more.
    fn prune_orphans(&mut self) {
        let tab_processes = &self.tab_processes;
        self.private_memory
            .retain(|pid, _| tab_processes.values().any(|p| p == pid));
    }
}

/// Host-reported process figures, served through the `ProcessRegistry` trait.
///
/// Tabs without a reported process fail their lookup individually. A batch
/// query fails as a whole while no memory figures have been reported.
#[derive(Default)]
pub struct ProcessTable {
    state: Mutex<ProcessState>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ProcessState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Merges a host report into the table.
    pub fn update(
        &self,
        tab_processes: HashMap<TabId, ProcessId>,
        private_memory: HashMap<ProcessId, u64>,
    ) {
        let mut state = self.lock();
        state.tab_processes.extend(tab_processes);
        state.private_memory.extend(private_memory);
    }

    /// Forgets the process owning `tab_id`, and its memory figure once no
    /// other tab shares that process.
    pub fn forget_tab(&self, tab_id: TabId) {
        let mut state = self.lock();
        if state.tab_processes.remove(&tab_id).is_some() {
            state.prune_orphans();
        }
    }

    /// Keeps only the mappings of tabs in `live`.
    pub fn retain_tabs(&self, live: &[TabId]) {
        let mut state = self.lock();
        let before = state.tab_processes.len();
        state.tab_processes.retain(|id, _| live.contains(id));
        if state.tab_processes.len() != before {
            tracing::debug!(
                dropped = before - state.tab_processes.len(),
                "pruned process mappings of closed tabs"
            );
            state.prune_orphans();
        }
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.tab_processes.clear();
        state.private_memory.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().tab_processes.is_empty()
    }
}

#[async_trait]
impl ProcessRegistry for ProcessTable {
    async fn process_id_for_tab(&self, tab_id: TabId) -> Result<ProcessId, HostError> {
        self.lock()
            .tab_processes
            .get(&tab_id)
            .copied()
            .ok_or_else(|| HostError::ProcessLookupFailed {
                tab_id,
                reason: "no process reported for tab".to_string(),
            })
    }

    /// Returns figures for the known ids; unknown ids are left out.
    async fn process_info(
        &self,
        ids: &[ProcessId],
    ) -> Result<HashMap<ProcessId, ProcessMemory>, HostError> {
        let state = self.lock();
        if state.private_memory.is_empty() {
            return Err(HostError::ProcessInfoFailed(
                "no process memory reported".to_string(),
            ));
        }
        Ok(ids
            .iter()
            .filter_map(|id| {
                state.private_memory.get(id).map(|bytes| {
                    (
                        *id,
                        ProcessMemory {
                            private_memory: *bytes,
                        },
                    )
                })
            })
            .collect())
    }
}
