//! App Core for tabmem.
//!
//! Central struct owning the access tracker, the host mirrors, the estimator
//! and the settings, plus the cached stats served between refreshes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::host::{ProcessRegistry, TabHost};
use crate::managers::access_tracker::{AccessTracker, AccessTrackerTrait};
use crate::managers::event_dispatcher::EventDispatcher;
use crate::managers::process_table::ProcessTable;
use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::services::aggregator;
use crate::services::badge::badge_for_tab_count;
use crate::services::clock::{Clock, SystemClock};
use crate::services::estimator::MemoryEstimator;
use crate::services::jitter::{JitterSource, RingJitter};
use crate::services::precise_adapter::PreciseDataAdapter;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::{HostError, SettingsError};
use crate::types::event::{HostEvent, RefreshHint};
use crate::types::memory::MemoryReport;
use crate::types::settings::MonitorSettings;
use crate::types::stats::{CloseOutcome, MemorySummary, TabInfo, TabStaleness, TabStats};
use crate::types::tab::{TabDescriptor, TabId};

/// Central application struct.
pub struct App {
    pub tracker: AccessTracker,
    pub dispatcher: EventDispatcher,
    pub tabs: TabRegistry,
    pub processes: ProcessTable,
    pub estimator: MemoryEstimator,
    pub settings_engine: SettingsEngine,
    stats: TabStats,
}

impl App {
    /// Creates an App from explicit parts. Tests pass a manual clock and a
    /// fixed jitter here.
    pub fn new(
        settings_engine: SettingsEngine,
        clock: Arc<dyn Clock>,
        jitter: Arc<dyn JitterSource>,
    ) -> Self {
        let dispatcher = EventDispatcher::new(&settings_engine.get_settings().refresh);
        let stats = TabStats::empty(clock.now_ms());
        Self {
            tracker: AccessTracker::new(clock),
            dispatcher,
            tabs: TabRegistry::new(),
            processes: ProcessTable::new(),
            estimator: MemoryEstimator::new(jitter),
            settings_engine,
            stats,
        }
    }

    /// Creates an App with the system clock and random jitter, loading
    /// settings from `config_path` or the default location.
    pub fn from_config(config_path: Option<String>) -> Result<Self, SettingsError> {
        let mut settings_engine = SettingsEngine::new(config_path);
        settings_engine.load()?;
        Ok(Self::new(
            settings_engine,
            Arc::new(SystemClock),
            Arc::new(RingJitter::new()),
        ))
    }

    pub fn settings(&self) -> &MonitorSettings {
        self.settings_engine.get_settings()
    }

    /// Updates one setting by dot path and applies it immediately.
    pub fn set_setting(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        self.settings_engine.set_value(key, value)?;
        let refresh = self.settings().refresh.clone();
        self.dispatcher.apply_settings(&refresh);
        Ok(())
    }

    /// Replaces the tab mirror with a full host listing. Newly seen tabs get
    /// an access record; access and process records of tabs that are gone
    /// are dropped.
    pub fn sync_tabs(&mut self, tabs: Vec<TabDescriptor>) {
        let live: Vec<TabId> = tabs.iter().map(|t| t.id).collect();
        for id in &live {
            if self.tracker.recorded_time(*id).is_none() {
                self.tracker.record_access(*id);
            }
        }
        self.tracker.retain_live(&live);
        self.processes.retain_tabs(&live);
        self.tabs.replace_all(tabs);
    }

    /// Applies a host event to the mirrors and the tracker.
    pub fn handle_event(&mut self, event: &HostEvent) -> RefreshHint {
        self.tabs.apply(event);
        if let HostEvent::TabRemoved { tab_id } = event {
            self.processes.forget_tab(*tab_id);
        }
        self.dispatcher.dispatch(&mut self.tracker, event)
    }

    /// The process registry, when precise memory is enabled and the host has
    /// reported any processes.
    fn process_registry(&self) -> Result<&dyn ProcessRegistry, HostError> {
        if !self.settings().memory.use_precise_memory || self.processes.is_empty() {
            return Err(HostError::CapabilityUnavailable);
        }
        Ok(&self.processes)
    }

    /// Per-tab figures without staleness decoration.
    pub async fn memory_report(&self) -> MemoryReport {
        let tabs = self.tabs.list_tabs().await;
        let access = self.tracker.capture();
        PreciseDataAdapter::new(&self.estimator, self.process_registry().ok())
            .collect(&tabs, &access)
            .await
    }

    pub async fn summarize(&self) -> MemorySummary {
        let tabs = self.tabs.list_tabs().await;
        let access = self.tracker.capture();
        aggregator::summarize(&tabs, &access, &self.estimator, self.process_registry().ok()).await
    }

    /// Recomputes the cached stats and pushes a new badge to the host.
    pub async fn refresh_stats(&mut self) -> TabStats {
        let summary = self.summarize().await;
        let total_tabs: usize = self
            .tabs
            .list_windows()
            .await
            .iter()
            .map(|w| w.tab_ids.len())
            .sum();

        self.stats = TabStats {
            total_tabs,
            total_memory: summary.total_mb,
            last_update: self.tracker.now_ms(),
            source: summary.source,
        };

        let badge = badge_for_tab_count(total_tabs, &self.settings().badge);
        if let Err(e) = self.tabs.set_badge(&badge).await {
            tracing::warn!(error = %e, "failed to update badge");
        }

        tracing::debug!(
            total_tabs,
            total_memory = self.stats.total_memory,
            "stats refreshed"
        );
        self.stats.clone()
    }

    /// Stats from the last refresh.
    pub fn stats(&self) -> &TabStats {
        &self.stats
    }

    pub fn access_times(&self) -> HashMap<TabId, i64> {
        self.tracker.snapshot()
    }

    pub async fn staleness_listing(&self) -> Vec<TabStaleness> {
        let tabs = self.tabs.list_tabs().await;
        aggregator::staleness_listing(&tabs, &self.tracker.capture(), &self.settings().staleness)
    }

    pub async fn tab_info(&self) -> TabInfo {
        let windows = self.tabs.list_windows().await;
        TabInfo {
            tab_count: windows.iter().map(|w| w.tab_ids.len()).sum(),
            window_count: windows.len(),
            last_window_focus: self.dispatcher.last_window_focus(),
        }
    }

    /// Closes every duplicate except the most recently active copy.
    pub async fn close_duplicates(&mut self) -> Result<CloseOutcome, HostError> {
        let tabs = self.tabs.list_tabs().await;
        let report = aggregator::find_duplicates(&tabs, &self.tracker.capture());
        if report.closable.is_empty() {
            return Ok(CloseOutcome {
                success: true,
                closed_count: 0,
                closed_ids: Vec::new(),
            });
        }
        self.close_tabs(&report.closable).await
    }

    /// Closes the given tabs. Failures are returned for the popup to show and
    /// are not retried.
    ///
    /// Repeated ids are closed and reported once, in first-seen order.
    pub async fn close_tabs(&mut self, ids: &[TabId]) -> Result<CloseOutcome, HostError> {
        let mut unique: Vec<TabId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }

        if let Err(e) = self.tabs.close_tabs(&unique).await {
            tracing::warn!(error = %e, "close command failed");
            return Err(e);
        }
        for id in &unique {
            self.tracker.remove(*id);
            self.processes.forget_tab(*id);
        }
        tracing::info!(count = unique.len(), "closed tabs");
        Ok(CloseOutcome {
            success: true,
            closed_count: unique.len(),
            closed_ids: unique,
        })
    }
}
