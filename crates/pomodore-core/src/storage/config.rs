//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The active timer mode and break auto-start
//! - How often overdue task penalties are checked
//! - Accent color
//! - Custom timer modes
//!
//! Configuration is stored at `~/.config/pomodore/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::modes::{default_preset, is_hex_color, is_preset_id, preset_by_id, Mode};

/// Timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Preset id or custom mode id.
    #[serde(default = "default_active_mode")]
    pub active_mode: String,
    #[serde(default)]
    pub auto_start_breaks: bool,
}

/// Task configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default = "default_penalty_check_interval")]
    pub penalty_check_interval_secs: u64,
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomodore/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub custom_modes: Vec<Mode>,
}

// Default functions
fn default_active_mode() -> String {
    "traditional".into()
}
fn default_penalty_check_interval() -> u64 {
    60
}
fn default_accent_color() -> String {
    "#7aa2f7".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            active_mode: default_active_mode(),
            auto_start_breaks: false,
        }
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            penalty_check_interval_secs: default_penalty_check_interval(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            tasks: TasksConfig::default(),
            ui: UiConfig::default(),
            custom_modes: Vec::new(),
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(key, format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<u64>().map_err(|_| {
                            invalid(key, format!("cannot parse '{value}' as number"))
                        })?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(key, e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing a default file if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing a default file if none exists.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, in memory only. The result must
    /// still validate; on error the config is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(key, e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let next: Config = serde_json::from_value(json).map_err(|e| invalid(key, e.to_string()))?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Set a value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Every leaf key with its value, in key order.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out.sort();
        out
    }

    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_hex_color(&self.ui.accent_color) {
            return Err(invalid("ui.accent_color", "expected a #RRGGBB color"));
        }
        if self.tasks.penalty_check_interval_secs == 0 {
            return Err(invalid("tasks.penalty_check_interval_secs", "must be positive"));
        }
        for mode in &self.custom_modes {
            mode.validate()
                .map_err(|e| invalid("custom_modes", format!("{}: {e}", mode.id)))?;
        }
        Ok(())
    }

    /// The mode named by `timer.active_mode`: a preset, then a custom mode,
    /// then the default preset.
    pub fn active_mode(&self) -> Mode {
        let id = self.timer.active_mode.as_str();
        preset_by_id(id)
            .or_else(|| self.custom_modes.iter().find(|m| m.id == id).cloned())
            .unwrap_or_else(default_preset)
    }

    pub fn find_mode(&self, id: &str) -> Option<Mode> {
        preset_by_id(id).or_else(|| self.custom_modes.iter().find(|m| m.id == id).cloned())
    }

    /// Register a custom mode. Its id must not clash with a preset or an
    /// existing custom mode.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid or duplicate mode.
    pub fn add_custom_mode(&mut self, mut mode: Mode) -> Result<(), ValidationError> {
        mode.is_custom = true;
        mode.validate()?;
        if is_preset_id(&mode.id) || self.custom_modes.iter().any(|m| m.id == mode.id) {
            return Err(ValidationError::invalid(
                "id",
                format!("mode '{}' already exists", mode.id),
            ));
        }
        self.custom_modes.push(mode);
        Ok(())
    }
}
