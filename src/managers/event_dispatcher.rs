use crate::managers::access_tracker::{AccessTracker, AccessTrackerTrait};
use crate::types::event::{HostEvent, RefreshHint};
use crate::types::settings::RefreshSettings;
use crate::types::tab::{TabStatus, WINDOW_ID_NONE};

/// Routes host events into the access tracker and decides when stats need
/// recomputing. Events are handled strictly one at a time.
pub struct EventDispatcher {
    activation_delay_ms: u64,
    focus_delay_ms: u64,
    last_window_focus: Option<i64>,
}

impl EventDispatcher {
    pub fn new(settings: &RefreshSettings) -> Self {
        Self {
            activation_delay_ms: settings.activation_delay_ms,
            focus_delay_ms: settings.focus_delay_ms,
            last_window_focus: None,
        }
    }

    /// Picks up changed refresh delays without losing focus history.
    pub fn apply_settings(&mut self, settings: &RefreshSettings) {
        self.activation_delay_ms = settings.activation_delay_ms;
        self.focus_delay_ms = settings.focus_delay_ms;
    }

    /// When a browser window last gained focus, if ever.
    pub fn last_window_focus(&self) -> Option<i64> {
        self.last_window_focus
    }

    pub fn dispatch(&mut self, tracker: &mut AccessTracker, event: &HostEvent) -> RefreshHint {
        tracing::debug!(?event, "host event");
        match event {
            HostEvent::TabCreated { tab } => {
                tracker.record_access(tab.id);
                RefreshHint::Now
            }
            HostEvent::TabRemoved { tab_id } => {
                tracker.remove(*tab_id);
                RefreshHint::Now
            }
            HostEvent::TabUpdated { tab, status } => {
                if *status == Some(TabStatus::Complete) {
                    tracker.record_access(tab.id);
                    RefreshHint::Now
                } else {
                    RefreshHint::None
                }
            }
            HostEvent::TabActivated { tab_id, .. } => {
                tracker.record_access(*tab_id);
                RefreshHint::AfterMs(self.activation_delay_ms)
            }
            HostEvent::WindowFocusChanged { window_id } => {
                if *window_id == WINDOW_ID_NONE {
                    return RefreshHint::None;
                }
                self.last_window_focus = Some(tracker.now_ms());
                RefreshHint::AfterMs(self.focus_delay_ms)
            }
        }
    }
}
