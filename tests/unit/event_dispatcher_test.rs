use std::sync::Arc;

use tabmem::managers::access_tracker::{AccessTracker, AccessTrackerTrait};
use tabmem::managers::event_dispatcher::EventDispatcher;
use tabmem::services::clock::ManualClock;
use tabmem::types::event::{HostEvent, RefreshHint};
use tabmem::types::settings::RefreshSettings;
use tabmem::types::tab::{TabDescriptor, TabStatus, WINDOW_ID_NONE};

const START: i64 = 1_700_000_000_000;

fn setup() -> (EventDispatcher, AccessTracker, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let tracker = AccessTracker::new(clock.clone());
    (EventDispatcher::new(&RefreshSettings::default()), tracker, clock)
}

#[test]
fn test_tab_created_records_access_and_refreshes() {
    let (mut dispatcher, mut tracker, _clock) = setup();
    let event = HostEvent::TabCreated {
        tab: TabDescriptor::new(1, "https://a.test/", "A"),
    };
    assert_eq!(dispatcher.dispatch(&mut tracker, &event), RefreshHint::Now);
    assert_eq!(tracker.recorded_time(1), Some(START));
}

#[test]
fn test_tab_removed_drops_record() {
    let (mut dispatcher, mut tracker, _clock) = setup();
    tracker.record_access(1);
    let hint = dispatcher.dispatch(&mut tracker, &HostEvent::TabRemoved { tab_id: 1 });
    assert_eq!(hint, RefreshHint::Now);
    assert!(tracker.is_empty());
}

#[test]
fn test_tab_updated_only_complete_counts() {
    let (mut dispatcher, mut tracker, clock) = setup();
    let tab = TabDescriptor::new(4, "https://a.test/", "A");

    let loading = HostEvent::TabUpdated {
        tab: tab.clone(),
        status: Some(TabStatus::Loading),
    };
    assert_eq!(dispatcher.dispatch(&mut tracker, &loading), RefreshHint::None);
    assert!(tracker.recorded_time(4).is_none());

    let no_status = HostEvent::TabUpdated {
        tab: tab.clone(),
        status: None,
    };
    assert_eq!(dispatcher.dispatch(&mut tracker, &no_status), RefreshHint::None);

    clock.advance_secs(5);
    let complete = HostEvent::TabUpdated {
        tab,
        status: Some(TabStatus::Complete),
    };
    assert_eq!(dispatcher.dispatch(&mut tracker, &complete), RefreshHint::Now);
    assert_eq!(tracker.recorded_time(4), Some(START + 5_000));
}

#[test]
fn test_activation_uses_activation_delay() {
    let (mut dispatcher, mut tracker, _clock) = setup();
    let hint = dispatcher.dispatch(
        &mut tracker,
        &HostEvent::TabActivated {
            tab_id: 9,
            window_id: 2,
        },
    );
    assert_eq!(hint, RefreshHint::AfterMs(1_000));
    assert_eq!(tracker.recorded_time(9), Some(START));
}

#[test]
fn test_window_focus_sets_focus_time() {
    let (mut dispatcher, mut tracker, clock) = setup();
    clock.advance_secs(3);
    let hint = dispatcher.dispatch(&mut tracker, &HostEvent::WindowFocusChanged { window_id: 2 });
    assert_eq!(hint, RefreshHint::AfterMs(500));
    assert_eq!(dispatcher.last_window_focus(), Some(START + 3_000));
    assert!(tracker.is_empty());
}

#[test]
fn test_focus_leaving_all_windows_is_ignored() {
    let (mut dispatcher, mut tracker, _clock) = setup();
    let hint = dispatcher.dispatch(
        &mut tracker,
        &HostEvent::WindowFocusChanged {
            window_id: WINDOW_ID_NONE,
        },
    );
    assert_eq!(hint, RefreshHint::None);
    assert_eq!(dispatcher.last_window_focus(), None);
}

#[test]
fn test_apply_settings_changes_delays() {
    let (mut dispatcher, mut tracker, _clock) = setup();
    dispatcher.apply_settings(&RefreshSettings {
        activation_delay_ms: 250,
        focus_delay_ms: 75,
        ..RefreshSettings::default()
    });
    assert_eq!(
        dispatcher.dispatch(
            &mut tracker,
            &HostEvent::TabActivated {
                tab_id: 1,
                window_id: 1
            }
        ),
        RefreshHint::AfterMs(250)
    );
    assert_eq!(
        dispatcher.dispatch(&mut tracker, &HostEvent::WindowFocusChanged { window_id: 1 }),
        RefreshHint::AfterMs(75)
    );
}

#[test]
fn test_event_wire_format() {
    let event: HostEvent =
        serde_json::from_str(r#"{"type":"tab_activated","tabId":3,"windowId":7}"#).unwrap();
    assert_eq!(
        event,
        HostEvent::TabActivated {
            tab_id: 3,
            window_id: 7
        }
    );

    let event: HostEvent = serde_json::from_str(
        r#"{"type":"tab_updated","tab":{"id":2,"url":"https://a.test/"},"status":"complete"}"#,
    )
    .unwrap();
    match event {
        HostEvent::TabUpdated { tab, status } => {
            assert_eq!(tab.id, 2);
            assert_eq!(tab.title, "");
            assert_eq!(status, Some(TabStatus::Complete));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_unknown_tab_status_is_not_an_access() {
    let (mut dispatcher, mut tracker, _clock) = setup();
    let event: HostEvent = serde_json::from_str(
        r#"{"type":"tab_updated","tab":{"id":5,"url":"https://example.org/"},"status":"unloaded"}"#,
    )
    .unwrap();
    match &event {
        HostEvent::TabUpdated { status, .. } => assert_eq!(*status, Some(TabStatus::Other)),
        other => panic!("unexpected event: {:?}", other),
    }

    assert_eq!(dispatcher.dispatch(&mut tracker, &event), RefreshHint::None);
    assert!(tracker.recorded_time(5).is_none());
}
