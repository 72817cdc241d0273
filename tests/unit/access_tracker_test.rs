use std::sync::Arc;

use tabmem::managers::access_tracker::{AccessTracker, AccessTrackerTrait};
use tabmem::services::clock::ManualClock;

const START: i64 = 1_700_000_000_000;

fn tracker() -> (AccessTracker, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    (AccessTracker::new(clock.clone()), clock)
}

#[test]
fn test_record_access_uses_current_time() {
    let (mut tracker, clock) = tracker();
    tracker.record_access(1);
    clock.advance_secs(30);
    assert_eq!(tracker.get_access_time(1), START);
    assert_eq!(tracker.staleness(1), 30);
}

#[test]
fn test_unknown_tab_counts_as_just_accessed() {
    let (tracker, clock) = tracker();
    clock.advance_secs(100);
    assert_eq!(tracker.get_access_time(99), START + 100_000);
    assert_eq!(tracker.staleness(99), 0);
}

#[test]
fn test_remove_restores_absence_default() {
    let (mut tracker, clock) = tracker();
    tracker.record_access(7);
    clock.advance_secs(600);
    tracker.remove(7);
    assert_eq!(tracker.get_access_time(7), clock_now(&clock));
    assert!(tracker.recorded_time(7).is_none());
}

fn clock_now(clock: &ManualClock) -> i64 {
    use tabmem::services::clock::Clock;
    clock.now_ms()
}

#[test]
fn test_record_access_overwrites() {
    let (mut tracker, clock) = tracker();
    tracker.record_access(3);
    clock.advance_secs(45);
    tracker.record_access(3);
    assert_eq!(tracker.get_access_time(3), START + 45_000);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_staleness_floored_at_zero_when_clock_goes_back() {
    let (mut tracker, clock) = tracker();
    tracker.record_access(1);
    clock.set(START - 5_000);
    assert_eq!(tracker.staleness(1), 0);
}

#[test]
fn test_staleness_truncates_partial_seconds() {
    let (mut tracker, clock) = tracker();
    tracker.record_access(1);
    clock.set(START + 59_999);
    assert_eq!(tracker.staleness(1), 59);
}

#[test]
fn test_capture_is_independent_of_later_events() {
    let (mut tracker, clock) = tracker();
    tracker.record_access(1);
    let snapshot = tracker.capture();
    clock.advance_secs(10);
    tracker.remove(1);
    tracker.record_access(2);

    assert_eq!(snapshot.now_ms, START);
    assert_eq!(snapshot.last_accessed(1), START);
    assert_eq!(snapshot.last_accessed(2), START);
    assert_eq!(snapshot.times.len(), 1);
}

#[test]
fn test_retain_live_drops_closed_tabs() {
    let (mut tracker, _clock) = tracker();
    for id in 1..=4 {
        tracker.record_access(id);
    }
    tracker.retain_live(&[2, 4]);
    let mut ids: Vec<_> = tracker.snapshot().into_keys().collect();
    ids.sort();
    assert_eq!(ids, vec![2, 4]);
    assert!(!tracker.is_empty());
}
