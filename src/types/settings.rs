use serde::{Deserialize, Serialize};

/// Top-level monitor settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MonitorSettings {
    pub refresh: RefreshSettings,
    pub memory: MemorySettings,
    pub badge: BadgeSettings,
    pub staleness: StalenessSettings,
    pub rpc: RpcSettings,
}

/// Timing of stats refreshes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RefreshSettings {
    /// Periodic refresh cadence.
    pub interval_secs: u64,
    /// Delay before refreshing after the user switches tabs.
    pub activation_delay_ms: u64,
    /// Delay before refreshing after a window gains focus.
    pub focus_delay_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            activation_delay_ms: 1000,
            focus_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MemorySettings {
    /// Try the host process registry before falling back to estimation.
    pub use_precise_memory: bool,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            use_precise_memory: true,
        }
    }
}

/// Tab-count thresholds and colours for the toolbar badge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BadgeSettings {
    pub medium_tab_count: usize,
    pub high_tab_count: usize,
    pub low_color: String,
    pub medium_color: String,
    pub high_color: String,
}

impl Default for BadgeSettings {
    fn default() -> Self {
        Self {
            medium_tab_count: 20,
            high_tab_count: 50,
            low_color: "#4CAF50".to_string(),
            medium_color: "#FF9800".to_string(),
            high_color: "#F44336".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StalenessSettings {
    pub stale_after_secs: u64,
    pub very_stale_after_secs: u64,
}

impl Default for StalenessSettings {
    fn default() -> Self {
        Self {
            stale_after_secs: 300,
            very_stale_after_secs: 1800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RpcSettings {
    pub max_requests_per_second: u32,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            max_requests_per_second: 200,
        }
    }
}
