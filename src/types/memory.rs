use serde::{Deserialize, Serialize};

use super::tab::TabId;

/// Host-assigned renderer process identifier.
pub type ProcessId = i64;

/// Where a per-tab memory figure came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemorySource {
    /// Heuristic estimator output.
    Estimated,
    /// Host process metric divided among the tabs sharing the process.
    Measured,
}

/// Per-tab memory figure. Recomputed on every aggregation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEstimate {
    pub tab_id: TabId,
    pub memory_mb: f64,
    pub active: bool,
    pub source: MemorySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staleness: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staleness_formatted: Option<String>,
}

impl MemoryEstimate {
    pub fn new(tab_id: TabId, memory_mb: f64, active: bool, source: MemorySource) -> Self {
        Self {
            tab_id,
            memory_mb,
            active,
            source,
            last_accessed: None,
            staleness: None,
            staleness_formatted: None,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.source == MemorySource::Measured
    }
}

/// Output of one precise-data collection pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryReport {
    pub total_mb: f64,
    /// Sorted by descending `memory_mb`.
    pub tabs: Vec<MemoryEstimate>,
}

impl MemoryReport {
    /// Builds a report from unsorted records, sorting them largest first.
    pub fn from_records(mut tabs: Vec<MemoryEstimate>) -> Self {
        tabs.sort_by(|a, b| b.memory_mb.total_cmp(&a.memory_mb));
        let total_mb = tabs.iter().map(|t| t.memory_mb).sum();
        Self { total_mb, tabs }
    }
}

/// Private memory figure the host reports for a single process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMemory {
    pub private_memory: u64,
}
