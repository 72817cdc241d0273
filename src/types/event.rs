use serde::{Deserialize, Serialize};

use super::tab::{TabDescriptor, TabId, TabStatus, WindowId};

/// Push notifications delivered by the host, one at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    TabCreated {
        tab: TabDescriptor,
    },
    TabRemoved {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    TabUpdated {
        tab: TabDescriptor,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<TabStatus>,
    },
    TabActivated {
        #[serde(rename = "tabId")]
        tab_id: TabId,
        #[serde(rename = "windowId")]
        window_id: WindowId,
    },
    WindowFocusChanged {
        #[serde(rename = "windowId")]
        window_id: WindowId,
    },
}

/// When the caller should recompute stats after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshHint {
    None,
    Now,
    AfterMs(u64),
}
