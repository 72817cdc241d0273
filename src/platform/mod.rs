// tabmem platform abstraction
// Resolves the per-user settings location on Windows, macOS, and Linux.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
use linux as os;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
use macos as os;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
use windows as os;

/// File name of the persisted monitor settings.
pub const SETTINGS_FILE: &str = "settings.json";

/// Returns the platform-specific configuration directory for tabmem.
///
/// - **Linux**: `~/.config/tabmem` (or `$XDG_CONFIG_HOME/tabmem`)
/// - **macOS**: `~/Library/Application Support/tabmem`
/// - **Windows**: `%APPDATA%/tabmem`
pub fn get_config_dir() -> PathBuf {
    os::get_config_dir()
}

/// Default location of the settings file.
pub fn default_settings_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILE)
}
