//! TOML-based agent configuration.
//!
//! Stores user preferences including:
//! - Agent loop cadence (poll and evaluation intervals)
//! - Notification preferences and optional webhook
//! - Asset cache origin
//!
//! Configuration is stored at `~/.config/examflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Agent loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Seconds between wake-ups of the agent loop.
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
    /// Seconds between periodic evaluation passes.
    #[serde(default = "default_evaluate_interval_secs")]
    pub evaluate_interval_secs: u64,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Optional webhook to deliver reminders to instead of the console.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Asset cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Origin the static assets are fetched from, e.g. "https://examflow.app".
    #[serde(default)]
    pub origin: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/examflow/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

// Default functions
fn default_poll_secs() -> u64 {
    15
}
fn default_evaluate_interval_secs() -> u64 {
    300
}
fn default_true() -> bool {
    true
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            poll_secs: default_poll_secs(),
            evaluate_interval_secs: default_evaluate_interval_secs(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { origin: None }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            notifications: NotificationsConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = json.pointer(&dot_to_pointer(key))?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by dot-separated key without touching disk.
    ///
    /// The new value must parse as the type the field already has;
    /// optional fields accept "null" to clear them.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed as the field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let slot = json
            .pointer_mut(&dot_to_pointer(key))
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match &*slot {
            serde_json::Value::Bool(_) => {
                let parsed = value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as bool"),
                })?;
                serde_json::Value::Bool(parsed)
            }
            serde_json::Value::Number(_) => {
                let parsed = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as number"),
                })?;
                serde_json::Value::Number(parsed.into())
            }
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "cannot set a whole section; use a leaf key".to_string(),
                })
            }
            // Null means an unset Option field; "null" clears it again.
            _ => {
                if value == "null" {
                    serde_json::Value::Null
                } else {
                    serde_json::Value::String(value.to_string())
                }
            }
        };

        *slot = new_value;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }
}

fn dot_to_pointer(key: &str) -> String {
    format!("/{}", key.replace('.', "/"))
}
