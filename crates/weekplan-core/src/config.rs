//! Scheduler constants and TOML-based user configuration.
//!
//! [`SchedulerConfig`] holds the tunable constants of the engine; its
//! defaults are the documented scheduling rules. [`Config`] is the
//! persisted document stored at `<data_dir>/config.toml`, with:
//! - `[scheduler]` engine constants
//! - `[display]` CLI rendering preferences

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chunk::DEFAULT_MAX_CHUNK_MINUTES;
use crate::error::ConfigError;
use crate::gap::{DEFAULT_BUFFER_MINUTES, DEFAULT_MIN_SLOT_MINUTES};

/// Engine constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minutes kept free before and after every busy interval
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: u32,
    /// Shortest free slot kept (minutes)
    #[serde(default = "default_min_slot_minutes")]
    pub min_slot_minutes: u32,
    /// Largest chunk of work placed in one go (minutes)
    #[serde(default = "default_max_chunk_minutes")]
    pub max_chunk_minutes: u32,
    /// Days until due assumed for tasks with no due date
    #[serde(default = "default_undated_horizon_days")]
    pub undated_horizon_days: i64,
    /// Score multiplier for overdue tasks
    #[serde(default = "default_overdue_multiplier")]
    pub overdue_multiplier: f64,
}

impl SchedulerConfig {
    /// Reject values that would invert or void the priority ordering.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for a non-positive
    /// `undated_horizon_days` or a non-positive or non-finite
    /// `overdue_multiplier`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.undated_horizon_days <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "scheduler.undated_horizon_days".to_string(),
                message: format!("must be positive, got {}", self.undated_horizon_days),
            });
        }
        if !self.overdue_multiplier.is_finite() || self.overdue_multiplier <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "scheduler.overdue_multiplier".to_string(),
                message: format!("must be positive, got {}", self.overdue_multiplier),
            });
        }
        Ok(())
    }
}

/// Clock style for rendered times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

/// CLI display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_time_format")]
    pub time_format: TimeFormat,
    /// List tasks whose work did not fully fit in the week
    #[serde(default = "default_true")]
    pub show_unscheduled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

// Default functions
fn default_buffer_minutes() -> u32 {
    DEFAULT_BUFFER_MINUTES
}
fn default_min_slot_minutes() -> u32 {
    DEFAULT_MIN_SLOT_MINUTES
}
fn default_max_chunk_minutes() -> u32 {
    DEFAULT_MAX_CHUNK_MINUTES
}
fn default_undated_horizon_days() -> i64 {
    365
}
fn default_overdue_multiplier() -> f64 {
    100.0
}
fn default_time_format() -> TimeFormat {
    TimeFormat::TwentyFourHour
}
fn default_true() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            buffer_minutes: default_buffer_minutes(),
            min_slot_minutes: default_min_slot_minutes(),
            max_chunk_minutes: default_max_chunk_minutes(),
            undated_horizon_days: default_undated_horizon_days(),
            overdue_multiplier: default_overdue_multiplier(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
            show_unscheduled: true,
        }
    }
}

/// Returns the directory holding `config.toml`.
///
/// `WEEKPLAN_HOME` wins if set; otherwise `~/.config/weekplan`, or
/// `~/.config/weekplan-dev` when `WEEKPLAN_ENV=dev`. The directory is
/// created if missing.
///
/// # Errors
/// Returns an error if no home directory is known or the directory cannot
/// be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("WEEKPLAN_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir().ok_or(ConfigError::NoConfigDir)?.join(".config");
            let env = std::env::var("WEEKPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("weekplan-dev")
            } else {
                base_dir.join("weekplan")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(n) if n.is_f64() => value
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                serde_json::Value::Number(_) => value
                    .parse::<i64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config
            .scheduler
            .validate()
            .map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(config)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
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

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.scheduler.validate()?;
        *self = updated;
        Ok(())
    }
}
