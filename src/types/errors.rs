use std::fmt;

use super::tab::TabId;

// === HostError ===

/// Errors raised by host collaborator calls.
///
/// The precise-data adapter recovers from every lookup variant locally by
/// falling back to estimation; only `CommandFailed` and `TabNotFound` reach
/// the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// The host exposes no process registry.
    CapabilityUnavailable,
    /// The owning process of a single tab could not be resolved.
    ProcessLookupFailed { tab_id: TabId, reason: String },
    /// The batched process-memory query failed.
    ProcessInfoFailed(String),
    /// A command such as closing tabs was rejected by the host.
    CommandFailed(String),
    /// The tab is not known to the host.
    TabNotFound(TabId),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::CapabilityUnavailable => {
                write!(f, "Process registry capability unavailable")
            }
            HostError::ProcessLookupFailed { tab_id, reason } => {
                write!(f, "Process lookup failed for tab {}: {}", tab_id, reason)
            }
            HostError::ProcessInfoFailed(msg) => write!(f, "Process info query failed: {}", msg),
            HostError::CommandFailed(msg) => write!(f, "Host command failed: {}", msg),
            HostError::TabNotFound(id) => write!(f, "Tab not found: {}", id),
        }
    }
}

impl std::error::Error for HostError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
