//! Aggregation over a tab snapshot: totals, ranking, staleness labels and
//! duplicate detection.

use std::collections::HashMap;

use crate::host::ProcessRegistry;
use crate::managers::access_tracker::AccessSnapshot;
use crate::services::estimator::MemoryEstimator;
use crate::services::precise_adapter::PreciseDataAdapter;
use crate::types::memory::MemorySource;
use crate::types::settings::StalenessSettings;
use crate::types::stats::{DuplicateReport, MemorySummary, StalenessLevel, TabStaleness};
use crate::types::tab::{TabDescriptor, TabId};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Human-readable elapsed time: `"Ns ago"`, `"Nm ago"`, `"Nh ago"` or `"Nd ago"`.
pub fn format_staleness(secs: u64) -> String {
    if secs < MINUTE {
        format!("{}s ago", secs)
    } else if secs < HOUR {
        format!("{}m ago", secs / MINUTE)
    } else if secs < DAY {
        format!("{}h ago", secs / HOUR)
    } else {
        format!("{}d ago", secs / DAY)
    }
}

/// Buckets elapsed seconds with the configured thresholds (both inclusive upper bounds).
pub fn staleness_level(secs: u64, settings: &StalenessSettings) -> StalenessLevel {
    if secs > settings.very_stale_after_secs {
        StalenessLevel::VeryStale
    } else if secs > settings.stale_after_secs {
        StalenessLevel::Stale
    } else {
        StalenessLevel::Fresh
    }
}

/// Runs the collection cascade and decorates the result with staleness.
pub async fn summarize(
    tabs: &[TabDescriptor],
    access: &AccessSnapshot,
    estimator: &MemoryEstimator,
    registry: Option<&dyn ProcessRegistry>,
) -> MemorySummary {
    let report = PreciseDataAdapter::new(estimator, registry)
        .collect(tabs, access)
        .await;

    let mut ranked_tabs = report.tabs;
    ranked_tabs.sort_by(|a, b| b.memory_mb.total_cmp(&a.memory_mb));
    for record in &mut ranked_tabs {
        let secs = access.staleness_secs(record.tab_id);
        record.last_accessed = Some(access.last_accessed(record.tab_id));
        record.staleness = Some(secs);
        record.staleness_formatted = Some(format_staleness(secs));
    }

    let total: f64 = ranked_tabs.iter().map(|t| t.memory_mb).sum();
    let source = if ranked_tabs.iter().any(|t| t.is_measured()) {
        MemorySource::Measured
    } else {
        MemorySource::Estimated
    };

    MemorySummary {
        total_mb: total.max(0.0) as u64,
        ranked_tabs,
        source,
    }
}

/// Every tab with its staleness, most stale first.
pub fn staleness_listing(
    tabs: &[TabDescriptor],
    access: &AccessSnapshot,
    settings: &StalenessSettings,
) -> Vec<TabStaleness> {
    let mut rows: Vec<TabStaleness> = tabs
        .iter()
        .map(|tab| {
            let secs = access.staleness_secs(tab.id);
            TabStaleness {
                id: tab.id,
                title: tab.title.clone(),
                url: tab.url.clone(),
                active: tab.active,
                window_id: tab.window_id,
                last_accessed: access.last_accessed(tab.id),
                staleness: secs,
                staleness_formatted: format_staleness(secs),
                staleness_level: staleness_level(secs, settings),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.staleness.cmp(&a.staleness));
    rows
}

/// Groups tabs by exact URL and marks all but the most recently active tab of
/// each group as closable. Internal pages are always kept.
///
/// Ties on access time go to the active tab, then to the lower tab id.
pub fn find_duplicates(tabs: &[TabDescriptor], access: &AccessSnapshot) -> DuplicateReport {
    let mut groups: HashMap<&str, Vec<&TabDescriptor>> = HashMap::new();
    for tab in tabs.iter().filter(|t| !t.is_internal()) {
        groups.entry(tab.url.as_str()).or_default().push(tab);
    }

    let mut closable: Vec<TabId> = Vec::new();
    for group in groups.values().filter(|g| g.len() > 1) {
        let keeper = group
            .iter()
            .max_by(|a, b| {
                access
                    .last_accessed(a.id)
                    .cmp(&access.last_accessed(b.id))
                    .then(a.active.cmp(&b.active))
                    .then(b.id.cmp(&a.id))
            })
            .map(|t| t.id);
        closable.extend(group.iter().map(|t| t.id).filter(|id| Some(*id) != keeper));
    }
    closable.sort_unstable();

    let kept = tabs
        .iter()
        .map(|t| t.id)
        .filter(|id| closable.binary_search(id).is_err())
        .collect();

    DuplicateReport { kept, closable }
}
