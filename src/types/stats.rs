use serde::{Deserialize, Serialize};

use super::memory::{MemoryEstimate, MemorySource};
use super::tab::{TabId, WindowId};

/// Cached statistics served to the popup between refreshes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabStats {
    pub total_tabs: usize,
    pub total_memory: u64,
    pub last_update: i64,
    pub source: MemorySource,
}

impl TabStats {
    pub fn empty(now_ms: i64) -> Self {
        Self {
            total_tabs: 0,
            total_memory: 0,
            last_update: now_ms,
            source: MemorySource::Estimated,
        }
    }
}

/// Coarse staleness class used to colour the tab list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StalenessLevel {
    Fresh,
    Stale,
    VeryStale,
}

/// One row of the staleness listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabStaleness {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub active: bool,
    pub window_id: WindowId,
    pub last_accessed: i64,
    pub staleness: u64,
    pub staleness_formatted: String,
    pub staleness_level: StalenessLevel,
}

/// Aggregator result: total, ranked records and per-tab staleness labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemorySummary {
    pub total_mb: u64,
    pub ranked_tabs: Vec<MemoryEstimate>,
    pub source: MemorySource,
}

impl MemorySummary {
    /// Label for the given tab, if it was part of this summary.
    pub fn staleness_label(&self, tab_id: TabId) -> Option<&str> {
        self.ranked_tabs
            .iter()
            .find(|t| t.tab_id == tab_id)
            .and_then(|t| t.staleness_formatted.as_deref())
    }
}

/// Outcome of duplicate detection. Every input tab lands in exactly one list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub kept: Vec<TabId>,
    pub closable: Vec<TabId>,
}

/// Badge text and background colour for the toolbar icon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BadgeState {
    pub text: String,
    pub color: String,
}

/// Tab and window counts for the popup header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub tab_count: usize,
    pub window_count: usize,
    pub last_window_focus: Option<i64>,
}

/// Result of a close command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CloseOutcome {
    pub success: bool,
    pub closed_count: usize,
    pub closed_ids: Vec<TabId>,
}
