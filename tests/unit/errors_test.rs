use tabmem::types::errors::*;

// === HostError Tests ===

#[test]
fn host_error_display_variants() {
    assert_eq!(
        HostError::CapabilityUnavailable.to_string(),
        "Process registry capability unavailable"
    );
    assert_eq!(
        HostError::ProcessLookupFailed {
            tab_id: 7,
            reason: "renderer gone".to_string()
        }
        .to_string(),
        "Process lookup failed for tab 7: renderer gone"
    );
    assert_eq!(
        HostError::ProcessInfoFailed("timeout".to_string()).to_string(),
        "Process info query failed: timeout"
    );
    assert_eq!(
        HostError::CommandFailed("tab is pinned".to_string()).to_string(),
        "Host command failed: tab is pinned"
    );
    assert_eq!(HostError::TabNotFound(42).to_string(), "Tab not found: 42");
}

#[test]
fn host_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(HostError::CapabilityUnavailable);
    assert!(err.source().is_none());
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
    assert_eq!(
        SettingsError::SerializationError("eof".to_string()).to_string(),
        "Settings serialization error: eof"
    );
    assert_eq!(
        SettingsError::InvalidKey("a.b".to_string()).to_string(),
        "Invalid settings key: a.b"
    );
    assert_eq!(
        SettingsError::InvalidValue("negative".to_string()).to_string(),
        "Invalid settings value: negative"
    );
}
