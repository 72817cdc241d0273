use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier, unique while the tab exists.
pub type TabId = i64;

/// Host-assigned window identifier.
pub type WindowId = i64;

/// Window id the host reports when focus leaves every browser window.
pub const WINDOW_ID_NONE: WindowId = -1;

/// Read-only view of a host tab, as delivered by the "list all tabs" query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabDescriptor {
    pub id: TabId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub window_id: WindowId,
}

impl TabDescriptor {
    pub fn new(id: TabId, url: &str, title: &str) -> Self {
        Self {
            id,
            url: url.to_string(),
            title: title.to_string(),
            active: false,
            window_id: 1,
        }
    }

    /// Returns true for browser-internal pages that never count as duplicates.
    pub fn is_internal(&self) -> bool {
        const INTERNAL_PREFIXES: [&str; 8] = [
            "chrome://",
            "chrome-extension://",
            "about:",
            "edge://",
            "brave://",
            "devtools://",
            "moz-extension://",
            "view-source:",
        ];
        let url = self.url.to_ascii_lowercase();
        url.is_empty() || INTERNAL_PREFIXES.iter().any(|p| url.starts_with(p))
    }
}

/// A host window with the ids of the tabs it contains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowInfo {
    pub id: WindowId,
    pub tab_ids: Vec<TabId>,
}

/// Loading status carried by a tab-updated event.
///
/// Only `Complete` counts as an access. Statuses this crate does not know,
/// such as `"unloaded"` for discarded tabs, deserialize as `Other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
    #[serde(other)]
    Other,
}
