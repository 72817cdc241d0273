//! Unit tests for the SettingsEngine public API.
//!
//! These tests exercise the engine through its trait interface: default
//! loading, dot-path updates, persistence, validation and reset.

use tabmem::services::settings_engine::{validate, SettingsEngine, SettingsEngineTrait};
use tabmem::types::errors::SettingsError;
use tabmem::types::settings::MonitorSettings;
use tempfile::TempDir;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

/// Without a config file the monitor starts from built-in defaults.
#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, MonitorSettings::default());
    assert_eq!(settings.refresh.interval_secs, 30);
    assert!(settings.memory.use_precise_memory);
}

/// A change made through `set_value` is visible to a fresh engine on the same path.
#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();

    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine
            .set_value("refresh.interval_secs", serde_json::json!(90))
            .unwrap();
        engine
            .set_value("memory.use_precise_memory", serde_json::json!(false))
            .unwrap();
    }

    let mut engine2 = engine_in_temp(&dir);
    let loaded = engine2.load().unwrap();
    assert_eq!(loaded.refresh.interval_secs, 90);
    assert!(!loaded.memory.use_precise_memory);
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine
        .set_value("badge.high_color", serde_json::json!("#000000"))
        .unwrap();

    engine.reset().unwrap();
    assert_eq!(*engine.get_settings(), MonitorSettings::default());

    let mut engine2 = engine_in_temp(&dir);
    assert_eq!(engine2.load().unwrap(), MonitorSettings::default());
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"staleness": {"stale_after_secs": 120}}"#,
    )
    .unwrap();

    let mut engine = engine_in_temp(&dir);
    let settings = engine.load().unwrap();
    assert_eq!(settings.staleness.stale_after_secs, 120);
    assert_eq!(settings.staleness.very_stale_after_secs, 1800);
    assert_eq!(settings.badge, MonitorSettings::default().badge);
}

#[test]
fn test_malformed_file_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();

    let mut engine = engine_in_temp(&dir);
    assert!(matches!(
        engine.load(),
        Err(SettingsError::SerializationError(_))
    ));
}

#[test]
fn test_invalid_file_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"refresh": {"interval_secs": 0}}"#,
    )
    .unwrap();

    let mut engine = engine_in_temp(&dir);
    assert!(matches!(engine.load(), Err(SettingsError::InvalidValue(_))));
}

#[test]
fn test_set_value_unknown_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    for key in ["", "refresh.nope", "nope"] {
        assert!(
            matches!(
                engine.set_value(key, serde_json::json!(1)),
                Err(SettingsError::InvalidKey(_))
            ),
            "key {:?} should be rejected",
            key
        );
    }
}

#[test]
fn test_set_value_wrong_type_keeps_old_settings() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let result = engine.set_value("refresh.interval_secs", serde_json::json!("soon"));
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings().refresh.interval_secs, 30);
    assert!(!dir.path().join("settings.json").exists());
}

#[test]
fn test_validate_rejects_bad_thresholds() {
    let mut settings = MonitorSettings::default();
    settings.staleness.stale_after_secs = 1800;
    assert!(validate(&settings).is_err());

    let mut settings = MonitorSettings::default();
    settings.rpc.max_requests_per_second = 0;
    assert!(validate(&settings).is_err());

    let mut settings = MonitorSettings::default();
    settings.badge.high_tab_count = 20;
    assert!(validate(&settings).is_err());
}

#[test]
fn test_config_path_override_wins() {
    let engine = SettingsEngine::new(Some("/tmp/tabmem-explicit.json".to_string()));
    assert_eq!(engine.get_config_path(), "/tmp/tabmem-explicit.json");
}
