//! TOML-based engine configuration.
//!
//! Stores the queue capacity and the timing constants:
//! - how many toasts may be queued at once
//! - the auto-dismiss duration used when a request does not set one
//! - the grace delay between dismissal and removal
//!
//! Configuration is stored at `~/.config/toastkit/toast.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::toast::ToastDuration;

/// Queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of toasts kept; adding past it evicts the oldest.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

/// Timing configuration, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,
    #[serde(default = "default_remove_delay_ms")]
    pub remove_delay_ms: u64,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/toastkit/toast.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastConfig {
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

fn default_capacity() -> usize {
    1
}
fn default_duration_ms() -> u64 {
    5000
}
fn default_remove_delay_ms() -> u64 {
    1000
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
            remove_delay_ms: default_remove_delay_ms(),
        }
    }
}

/// Returns the config directory, creating it if needed.
///
/// `TOASTKIT_CONFIG_DIR` wins when set. Otherwise `~/.config/toastkit`, or
/// `~/.config/toastkit-dev` when `TOASTKIT_ENV=dev`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TOASTKIT_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TOASTKIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("toastkit-dev")
            } else {
                base_dir.join("toastkit")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

impl ToastConfig {
    /// Config with the given capacity and default timings.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: QueueConfig { capacity },
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity
    }

    pub fn default_duration(&self) -> ToastDuration {
        ToastDuration::Millis(self.timing.default_duration_ms)
    }

    pub fn remove_delay(&self) -> Duration {
        Duration::from_millis(self.timing.remove_delay_ms)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "queue.capacity".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.timing.default_duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timing.default_duration_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.timing.remove_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timing.remove_delay_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("toast.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: ToastConfig = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

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
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key.
    ///
    /// The new value is validated; on error `self` is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        set_json_value_by_path(&mut json, key, value)?;
        let updated: ToastConfig =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

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
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            serde_json::Value::Object(_) => return Err(unknown()),
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(part.to_string(), new_value);
        return Ok(());
    }

    Err(unknown())
}
