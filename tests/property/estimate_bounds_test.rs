//! Property-based tests for the memory estimator.
//!
//! These tests check the clamp and the monotonic growth with staleness for
//! arbitrary URLs, titles, access times and fragmentation factors.

use tabmem::services::estimator::{
    estimate_with_factor, raw_estimate, MAX_ESTIMATE_MB, MIN_ESTIMATE_MB,
};
use tabmem::services::jitter::{JITTER_MIN, JITTER_SPAN};
use tabmem::types::tab::TabDescriptor;
use proptest::prelude::*;

const NOW: i64 = 1_700_000_000_000;

fn arb_url() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("https://www.youtube.com/watch?v=abc".to_string()),
        Just("https://github.com/".to_string()),
        "https?://[a-z]{1,12}\\.(com|org|net)/[a-zA-Z0-9/?=&]{0,200}",
    ]
}

fn arb_tab() -> impl Strategy<Value = TabDescriptor> {
    (arb_url(), "\\PC{0,300}").prop_map(|(url, title)| TabDescriptor::new(1, &url, &title))
}

fn arb_factor() -> impl Strategy<Value = f64> {
    (0.0f64..1.0).prop_map(|u| JITTER_MIN + u * JITTER_SPAN)
}

// Every estimate lies in [MIN_ESTIMATE_MB, MAX_ESTIMATE_MB], including access
// times in the future.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn estimate_always_clamped(
        tab in arb_tab(),
        elapsed_ms in -3_600_000i64..100 * 3_600_000,
        factor in arb_factor(),
    ) {
        let mb = estimate_with_factor(&tab, NOW - elapsed_ms, NOW, factor);
        prop_assert!((MIN_ESTIMATE_MB..=MAX_ESTIMATE_MB).contains(&mb));
    }

    #[test]
    fn raw_estimate_never_decreases_with_staleness(
        tab in arb_tab(),
        a in 0i64..20 * 3_600_000,
        b in 0i64..20 * 3_600_000,
    ) {
        let (newer, older) = if a <= b { (a, b) } else { (b, a) };
        let fresh = raw_estimate(&tab, NOW - newer, NOW);
        let stale = raw_estimate(&tab, NOW - older, NOW);
        prop_assert!(stale >= fresh);
    }

    #[test]
    fn future_access_counts_as_fresh(tab in arb_tab(), ahead_ms in 1i64..1_000_000) {
        prop_assert_eq!(
            raw_estimate(&tab, NOW + ahead_ms, NOW),
            raw_estimate(&tab, NOW, NOW)
        );
    }

    #[test]
    fn raw_estimate_bounded_by_adjustment_caps(tab in arb_tab()) {
        // Largest heap is 220 and staleness adds at most 60%; title and URL add at most 110.
        let raw = raw_estimate(&tab, NOW - 1_000 * 3_600_000, NOW);
        prop_assert!(raw >= 45.0 + 45.0 + 35.0 + 8.0 + 12.0);
        prop_assert!(raw <= 45.0 + (220.0 + 110.0) * 1.6 + 200.0 + 300.0 + 80.0);
    }
}
