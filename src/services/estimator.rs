//! Heuristic per-tab memory estimator.
//!
//! A tab's footprint is modelled as a fixed engine overhead plus four
//! per-site quantities looked up from [`CATEGORY_TABLE`], nudged by the title
//! and URL length, grown by staleness and finally scaled by a fragmentation
//! factor drawn from a [`JitterSource`].

use std::sync::Arc;

use crate::services::jitter::{JitterSource, RingJitter};
use crate::types::tab::TabDescriptor;

/// Fixed engine and DOM overhead every tab pays.
pub const BASE_MEMORY_MB: f64 = 45.0;

/// Smallest estimate ever reported.
pub const MIN_ESTIMATE_MB: u32 = 30;

/// Largest estimate ever reported.
pub const MAX_ESTIMATE_MB: u32 = 800;

const TITLE_WEIGHT: f64 = 1.5;
const TITLE_CAP: f64 = 80.0;
const URL_WEIGHT: f64 = 0.3;
const URL_CAP: f64 = 30.0;
const HOUR_MS: f64 = 60.0 * 60.0 * 1000.0;
const MAX_TIME_FACTOR: f64 = 2.0;
const GROWTH_PER_HOUR: f64 = 0.3;

/// Heuristic weights for a recognised kind of site, in MB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryProfile {
    pub heap_estimate: f64,
    pub dom_complexity: f64,
    pub media_overhead: f64,
    pub network_overhead: f64,
}

impl CategoryProfile {
    const fn new(heap: f64, dom: f64, media: f64, network: f64) -> Self {
        Self {
            heap_estimate: heap,
            dom_complexity: dom,
            media_overhead: media,
            network_overhead: network,
        }
    }
}

/// Profile applied when no domain in [`CATEGORY_TABLE`] matches.
pub const DEFAULT_PROFILE: CategoryProfile = CategoryProfile::new(60.0, 50.0, 20.0, 15.0);

/// Ordered `(url substring, profile)` pairs. The first match wins, so more
/// specific domains must precede any domain they contain.
pub const CATEGORY_TABLE: &[(&str, CategoryProfile)] = &[
    // Video and streaming
    ("youtube.com", CategoryProfile::new(180.0, 120.0, 200.0, 50.0)),
    ("netflix.com", CategoryProfile::new(220.0, 100.0, 300.0, 80.0)),
    ("twitch.tv", CategoryProfile::new(160.0, 90.0, 180.0, 60.0)),
    // Social
    ("facebook.com", CategoryProfile::new(140.0, 200.0, 80.0, 40.0)),
    ("twitter.com", CategoryProfile::new(120.0, 150.0, 60.0, 35.0)),
    ("x.com", CategoryProfile::new(120.0, 150.0, 60.0, 35.0)),
    ("instagram.com", CategoryProfile::new(130.0, 180.0, 120.0, 45.0)),
    // Mail
    ("gmail.com", CategoryProfile::new(110.0, 100.0, 30.0, 25.0)),
    ("outlook.com", CategoryProfile::new(100.0, 90.0, 25.0, 20.0)),
    // Shopping
    ("amazon.com", CategoryProfile::new(90.0, 140.0, 80.0, 30.0)),
    ("ebay.com", CategoryProfile::new(85.0, 120.0, 70.0, 25.0)),
    // News and forums
    ("reddit.com", CategoryProfile::new(80.0, 100.0, 50.0, 20.0)),
    ("cnn.com", CategoryProfile::new(70.0, 90.0, 60.0, 15.0)),
    ("bbc.com", CategoryProfile::new(70.0, 90.0, 60.0, 15.0)),
    // Development
    ("github.com", CategoryProfile::new(95.0, 80.0, 20.0, 30.0)),
    ("stackoverflow.com", CategoryProfile::new(75.0, 70.0, 15.0, 20.0)),
    // Search
    ("google.com", CategoryProfile::new(50.0, 40.0, 10.0, 15.0)),
    ("bing.com", CategoryProfile::new(45.0, 35.0, 8.0, 12.0)),
];

/// Returns the profile for `url`, matching case-insensitively.
pub fn lookup_profile(url: &str) -> CategoryProfile {
    let url = url.to_lowercase();
    CATEGORY_TABLE
        .iter()
        .find(|(pattern, _)| url.contains(pattern))
        .map(|(_, profile)| *profile)
        .unwrap_or(DEFAULT_PROFILE)
}

/// Staleness growth multiplier applied to the heap estimate, in `[1.0, 1.6]`.
pub fn staleness_multiplier(last_accessed_ms: i64, now_ms: i64) -> f64 {
    let elapsed = now_ms.saturating_sub(last_accessed_ms).max(0) as f64;
    let time_factor = (elapsed / HOUR_MS).min(MAX_TIME_FACTOR);
    1.0 + time_factor * GROWTH_PER_HOUR
}

/// Estimate before the fragmentation factor and rounding are applied.
pub fn raw_estimate(tab: &TabDescriptor, last_accessed_ms: i64, now_ms: i64) -> f64 {
    let profile = lookup_profile(&tab.url);

    let mut heap = profile.heap_estimate;
    heap += (tab.title.chars().count() as f64 * TITLE_WEIGHT).min(TITLE_CAP);
    heap += (tab.url.chars().count() as f64 * URL_WEIGHT).min(URL_CAP);
    heap *= staleness_multiplier(last_accessed_ms, now_ms);

    BASE_MEMORY_MB + heap + profile.dom_complexity + profile.media_overhead + profile.network_overhead
}

/// Deterministic estimate for a given fragmentation factor, clamped to
/// `[MIN_ESTIMATE_MB, MAX_ESTIMATE_MB]`.
pub fn estimate_with_factor(
    tab: &TabDescriptor,
    last_accessed_ms: i64,
    now_ms: i64,
    factor: f64,
) -> u32 {
    let total = (raw_estimate(tab, last_accessed_ms, now_ms) * factor).round();
    total.clamp(MIN_ESTIMATE_MB as f64, MAX_ESTIMATE_MB as f64) as u32
}

/// Estimator bound to a fragmentation source.
#[derive(Clone)]
pub struct MemoryEstimator {
    jitter: Arc<dyn JitterSource>,
}

impl MemoryEstimator {
    pub fn new(jitter: Arc<dyn JitterSource>) -> Self {
        Self { jitter }
    }

    /// Estimated MB for `tab`, last active at `last_accessed_ms`.
    pub fn estimate(&self, tab: &TabDescriptor, last_accessed_ms: i64, now_ms: i64) -> u32 {
        estimate_with_factor(tab, last_accessed_ms, now_ms, self.jitter.factor())
    }
}

impl Default for MemoryEstimator {
    fn default() -> Self {
        Self::new(Arc::new(RingJitter::new()))
    }
}
