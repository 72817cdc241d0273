// tabmem Settings Engine
// Manages monitor settings: loading, saving, updating individual values, and resetting to defaults.
// Settings are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::Path;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::MonitorSettings;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "TABMEM_CONFIG";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<MonitorSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &MonitorSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: MonitorSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// Path resolution order: `path_override`, then `$TABMEM_CONFIG`, then
    /// `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
            .unwrap_or_else(|| platform::default_settings_path().to_string_lossy().to_string());

        Self {
            config_path,
            settings: MonitorSettings::default(),
        }
    }

    /// Creates an engine holding `settings` without touching the disk.
    pub fn with_settings(config_path: String, settings: MonitorSettings) -> Self {
        Self {
            config_path,
            settings,
        }
    }
}

/// Rejects combinations the monitor cannot work with.
pub fn validate(settings: &MonitorSettings) -> Result<(), SettingsError> {
    if settings.refresh.interval_secs == 0 {
        return Err(SettingsError::InvalidValue(
            "refresh.interval_secs must be positive".to_string(),
        ));
    }
    if settings.badge.medium_tab_count >= settings.badge.high_tab_count {
        return Err(SettingsError::InvalidValue(
            "badge.medium_tab_count must be below badge.high_tab_count".to_string(),
        ));
    }
    if settings.staleness.stale_after_secs >= settings.staleness.very_stale_after_secs {
        return Err(SettingsError::InvalidValue(
            "staleness.stale_after_secs must be below staleness.very_stale_after_secs".to_string(),
        ));
    }
    if settings.rpc.max_requests_per_second == 0 {
        return Err(SettingsError::InvalidValue(
            "rpc.max_requests_per_second must be positive".to_string(),
        ));
    }
    Ok(())
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<MonitorSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            tracing::debug!(path = %self.config_path, "no settings file, using defaults");
            self.settings = MonitorSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: MonitorSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        validate(&settings)?;

        tracing::info!(path = %self.config_path, "loaded settings");
        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Updates an individual setting by dot-notation key path.
    ///
    /// The settings are converted to a `serde_json::Value`, the target is
    /// replaced, and the result is deserialized and validated before it is
    /// accepted and saved.
    ///
    /// # Examples
    /// - `"refresh.interval_secs"` → updates `settings.refresh.interval_secs`
    /// - `"memory.use_precise_memory"` → updates `settings.memory.use_precise_memory`
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let parts: Vec<&str> = key.split('.').collect();

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        {
            let mut current = &mut json_value;
            for (i, part) in parts.iter().enumerate() {
                let last = i == parts.len() - 1;
                let serde_json::Value::Object(map) = current else {
                    return Err(SettingsError::InvalidKey(format!(
                        "Cannot navigate to key '{}': intermediate value is not an object",
                        key
                    )));
                };
                let Some(slot) = map.get_mut(*part) else {
                    return Err(SettingsError::InvalidKey(format!(
                        "Key '{}' not found in settings",
                        key
                    )));
                };
                if last {
                    *slot = value.clone();
                    break;
                }
                current = slot;
            }
        }

        let new_settings: MonitorSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        validate(&new_settings)?;

        self.settings = new_settings;
        self.save()?;

        Ok(())
    }

    /// Resets all settings to defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = MonitorSettings::default();
        self.save()?;
        Ok(())
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
