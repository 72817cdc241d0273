//! Precise-data adapter with fallback to estimation.
//!
//! Asks the host process registry for real per-process figures and degrades
//! to the heuristic estimator whenever the registry is absent or a call fails.
//! The adapter never returns an error: every failure turns into a fallback.
//!
//! Fallback granularity:
//! - registry absent: the whole batch is estimated
//! - per-tab process lookup fails: that tab is estimated, the batch continues
//! - batched process-info call fails: the whole batch is estimated
//! - a process is missing from a successful batch reply: its tabs are estimated

use std::collections::{BTreeMap, HashMap};

use crate::host::ProcessRegistry;
use crate::managers::access_tracker::AccessSnapshot;
use crate::services::estimator::MemoryEstimator;
use crate::types::memory::{MemoryEstimate, MemoryReport, MemorySource, ProcessId, ProcessMemory};
use crate::types::tab::TabDescriptor;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Collects per-tab memory figures, preferring host measurements.
pub struct PreciseDataAdapter<'a> {
    estimator: &'a MemoryEstimator,
    registry: Option<&'a dyn ProcessRegistry>,
}

impl<'a> PreciseDataAdapter<'a> {
    pub fn new(estimator: &'a MemoryEstimator, registry: Option<&'a dyn ProcessRegistry>) -> Self {
        Self {
            estimator,
            registry,
        }
    }

    /// Returns one record per tab, sorted by descending memory.
    pub async fn collect(&self, tabs: &[TabDescriptor], access: &AccessSnapshot) -> MemoryReport {
        let Some(registry) = self.registry else {
            tracing::debug!("process registry unavailable, estimating {} tabs", tabs.len());
            return self.estimate_all(tabs, access);
        };

        let mut records = Vec::with_capacity(tabs.len());
        // BTreeMap keeps the batch request order stable.
        let mut by_process: BTreeMap<ProcessId, Vec<&TabDescriptor>> = BTreeMap::new();

        for tab in tabs {
            match registry.process_id_for_tab(tab.id).await {
                Ok(pid) => by_process.entry(pid).or_default().push(tab),
                Err(e) => {
                    tracing::debug!(tab_id = tab.id, error = %e, "falling back to estimation for tab");
                    records.push(self.estimate_one(tab, access));
                }
            }
        }

        if by_process.is_empty() {
            return MemoryReport::from_records(records);
        }

        let ids: Vec<ProcessId> = by_process.keys().copied().collect();
        let processes = match registry.process_info(&ids).await {
            Ok(processes) => processes,
            Err(e) => {
                tracing::info!(error = %e, "process info query failed, estimating whole batch");
                return self.estimate_all(tabs, access);
            }
        };

        records.extend(self.distribute(&by_process, &processes, access));
        MemoryReport::from_records(records)
    }

    /// Splits each process's private memory evenly across its tabs.
    fn distribute(
        &self,
        by_process: &BTreeMap<ProcessId, Vec<&TabDescriptor>>,
        processes: &HashMap<ProcessId, ProcessMemory>,
        access: &AccessSnapshot,
    ) -> Vec<MemoryEstimate> {
        let mut records = Vec::new();
        for (pid, tabs_in_process) in by_process {
            match processes.get(pid) {
                Some(process) => {
                    let per_tab_mb =
                        process.private_memory as f64 / tabs_in_process.len() as f64 / BYTES_PER_MB;
                    for tab in tabs_in_process {
                        records.push(MemoryEstimate::new(
                            tab.id,
                            per_tab_mb,
                            tab.active,
                            MemorySource::Measured,
                        ));
                    }
                }
                None => {
                    tracing::debug!(pid = *pid, "process missing from reply, estimating its tabs");
                    records.extend(tabs_in_process.iter().map(|tab| self.estimate_one(tab, access)));
                }
            }
        }
        records
    }

    fn estimate_all(&self, tabs: &[TabDescriptor], access: &AccessSnapshot) -> MemoryReport {
        MemoryReport::from_records(tabs.iter().map(|tab| self.estimate_one(tab, access)).collect())
    }

    fn estimate_one(&self, tab: &TabDescriptor, access: &AccessSnapshot) -> MemoryEstimate {
        let mb = self
            .estimator
            .estimate(tab, access.last_accessed(tab.id), access.now_ms);
        MemoryEstimate::new(tab.id, mb as f64, tab.active, MemorySource::Estimated)
    }
}
