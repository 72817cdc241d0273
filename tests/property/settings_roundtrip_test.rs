//! Property-based tests for MonitorSettings persistence.
//!
//! Any valid settings written by one engine are read back unchanged by a
//! fresh engine on the same path, and invalid threshold pairs never persist.

use proptest::prelude::*;
use tabmem::services::settings_engine::{validate, SettingsEngine, SettingsEngineTrait};
use tabmem::types::settings::{
    BadgeSettings, MemorySettings, MonitorSettings, RefreshSettings, RpcSettings,
    StalenessSettings,
};
use tempfile::TempDir;

fn arb_color() -> impl Strategy<Value = String> {
    "#[0-9A-F]{6}"
}

fn arb_refresh_settings() -> impl Strategy<Value = RefreshSettings> {
    (1u64..=3_600, 0u64..=10_000, 0u64..=10_000).prop_map(
        |(interval_secs, activation_delay_ms, focus_delay_ms)| RefreshSettings {
            interval_secs,
            activation_delay_ms,
            focus_delay_ms,
        },
    )
}

fn arb_badge_settings() -> impl Strategy<Value = BadgeSettings> {
    (0usize..100, 1usize..100, arb_color(), arb_color(), arb_color()).prop_map(
        |(medium_tab_count, gap, low_color, medium_color, high_color)| BadgeSettings {
            medium_tab_count,
            high_tab_count: medium_tab_count + gap,
            low_color,
            medium_color,
            high_color,
        },
    )
}

fn arb_staleness_settings() -> impl Strategy<Value = StalenessSettings> {
    (0u64..10_000, 1u64..100_000).prop_map(|(stale_after_secs, gap)| StalenessSettings {
        stale_after_secs,
        very_stale_after_secs: stale_after_secs + gap,
    })
}

fn arb_monitor_settings() -> impl Strategy<Value = MonitorSettings> {
    (
        arb_refresh_settings(),
        any::<bool>(),
        arb_badge_settings(),
        arb_staleness_settings(),
        1u32..=1_000,
    )
        .prop_map(
            |(refresh, use_precise_memory, badge, staleness, max_requests_per_second)| {
                MonitorSettings {
                    refresh,
                    memory: MemorySettings { use_precise_memory },
                    badge,
                    staleness,
                    rpc: RpcSettings {
                        max_requests_per_second,
                    },
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn saved_settings_load_back(settings in arb_monitor_settings()) {
        prop_assert!(validate(&settings).is_ok());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json").to_string_lossy().to_string();

        SettingsEngine::with_settings(path.clone(), settings.clone())
            .save()
            .unwrap();

        let mut engine = SettingsEngine::new(Some(path));
        let loaded = engine.load().unwrap();
        prop_assert_eq!(loaded, settings);
    }

    #[test]
    fn stale_threshold_must_stay_below_very_stale(value in 0u64..5_000) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json").to_string_lossy().to_string();
        let mut engine = SettingsEngine::new(Some(path));
        engine.load().unwrap();

        let result = engine.set_value("staleness.stale_after_secs", serde_json::json!(value));
        if value < 1_800 {
            prop_assert!(result.is_ok());
            prop_assert_eq!(engine.get_settings().staleness.stale_after_secs, value);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(engine.get_settings(), &MonitorSettings::default());
        }
    }
}
