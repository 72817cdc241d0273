use std::collections::HashMap;
use std::sync::Arc;

use crate::services::clock::Clock;
use crate::types::tab::TabId;

/// Trait defining the access-time tracking interface.
pub trait AccessTrackerTrait {
    fn record_access(&mut self, tab_id: TabId);
    fn remove(&mut self, tab_id: TabId);
    fn get_access_time(&self, tab_id: TabId) -> i64;
    fn staleness(&self, tab_id: TabId) -> u64;
    fn snapshot(&self) -> HashMap<TabId, i64>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
}

/// Last-active timestamps per tab, in milliseconds since the Unix epoch.
///
/// The tracker is the only owner of this mapping. Event handlers mutate it one
/// at a time; aggregation passes read it through `get_access_time`.
pub struct AccessTracker {
    clock: Arc<dyn Clock>,
    access_times: HashMap<TabId, i64>,
}

impl AccessTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            access_times: HashMap::new(),
        }
    }

    /// Current time according to the tracker's clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Recorded time, or `None` for a tab that was never observed.
    pub fn recorded_time(&self, tab_id: TabId) -> Option<i64> {
        self.access_times.get(&tab_id).copied()
    }

    /// Copies the mapping together with the current time, so an aggregation
    /// pass sees one consistent view even if events arrive meanwhile.
    pub fn capture(&self) -> AccessSnapshot {
        AccessSnapshot {
            times: self.access_times.clone(),
            now_ms: self.clock.now_ms(),
        }
    }

    /// Drops records for tabs not in `live`.
    pub fn retain_live(&mut self, live: &[TabId]) {
        self.access_times.retain(|id, _| live.contains(id));
    }
}

impl AccessTrackerTrait for AccessTracker {
    /// Marks `tab_id` as accessed now.
    fn record_access(&mut self, tab_id: TabId) {
        self.access_times.insert(tab_id, self.clock.now_ms());
    }

    fn remove(&mut self, tab_id: TabId) {
        self.access_times.remove(&tab_id);
    }

    /// Last access time. Unknown tabs count as accessed just now.
    fn get_access_time(&self, tab_id: TabId) -> i64 {
        self.recorded_time(tab_id)
            .unwrap_or_else(|| self.clock.now_ms())
    }

    /// Seconds since the last access, floored at zero.
    fn staleness(&self, tab_id: TabId) -> u64 {
        let elapsed_ms = self.clock.now_ms().saturating_sub(self.get_access_time(tab_id));
        (elapsed_ms.max(0) / 1000) as u64
    }

    fn snapshot(&self) -> HashMap<TabId, i64> {
        self.access_times.clone()
    }

    fn len(&self) -> usize {
        self.access_times.len()
    }

    fn is_empty(&self) -> bool {
        self.access_times.is_empty()
    }
}

/// Point-in-time copy of the tracker used by one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessSnapshot {
    pub times: HashMap<TabId, i64>,
    pub now_ms: i64,
}

impl AccessSnapshot {
    pub fn new(times: HashMap<TabId, i64>, now_ms: i64) -> Self {
        Self { times, now_ms }
    }

    /// Last access time, defaulting to the snapshot instant.
    pub fn last_accessed(&self, tab_id: TabId) -> i64 {
        self.times.get(&tab_id).copied().unwrap_or(self.now_ms)
    }

    /// Whole seconds since the last access, floored at zero.
    pub fn staleness_secs(&self, tab_id: TabId) -> u64 {
        (self.now_ms.saturating_sub(self.last_accessed(tab_id)).max(0) / 1000) as u64
    }
}
