//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Planning-poker timing (heartbeat interval, staleness threshold) and deck
//! - Share link base URL
//! - Retrospective recommendation count
//! - Display locale
//!
//! Configuration is stored at `~/.config/teamroom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::poker::presence::{DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_STALE_AFTER};
use crate::poker::Deck;
use crate::shared::constants::{DEFAULT_LOCALE, MAX_FILE_SIZE};
use crate::shared::utils::is_valid_url;

/// Planning-poker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokerConfig {
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
    /// Card faces, numbers or "?".
    #[serde(default = "default_deck")]
    pub deck: Vec<String>,
}

/// Share link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Page the `?room=` parameter is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Retrospective recommender configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetroConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_locale")]
    pub locale: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/teamroom/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub poker: PokerConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub retro: RetroConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_heartbeat_interval_secs() -> u64 {
    DEFAULT_HEARTBEAT_INTERVAL.as_secs()
}
fn default_stale_after_secs() -> u64 {
    DEFAULT_STALE_AFTER.as_secs()
}
fn default_deck() -> Vec<String> {
    ["0", "1", "2", "3", "5", "8", "13", "21", "34", "55", "89", "?"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}
fn default_base_url() -> String {
    "http://localhost:5173/planning-poker/".into()
}
fn default_top_n() -> usize {
    3
}
fn default_locale() -> String {
    DEFAULT_LOCALE.into()
}

impl Default for PokerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            stale_after_secs: default_stale_after_secs(),
            deck: default_deck(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for RetroConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
        }
    }
}

impl PokerConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    /// Parse the configured card faces.
    pub fn deck(&self) -> Result<Deck> {
        Ok(Deck::parse(&self.deck)?)
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
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

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };

        match std::fs::metadata(path) {
            Ok(meta) => {
                if meta.len() > MAX_FILE_SIZE {
                    return Err(load_failed(format!(
                        "file is {} bytes, limit is {MAX_FILE_SIZE}",
                        meta.len()
                    ))
                    .into());
                }
                let content =
                    std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
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

    /// Set a config value by key without saving.
    ///
    /// The updated config must pass [`Config::validate`]; on failure `self`
    /// is left unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// the result is invalid, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.poker.heartbeat_interval_secs == 0 {
            return Err(invalid("poker.heartbeat_interval_secs", "must be at least 1"));
        }
        if self.poker.stale_after_secs <= self.poker.heartbeat_interval_secs {
            return Err(invalid(
                "poker.stale_after_secs",
                "must be greater than poker.heartbeat_interval_secs",
            ));
        }
        match Deck::parse(&self.poker.deck) {
            Ok(deck) if deck.has_numeric_card() => {}
            Ok(_) => return Err(invalid("poker.deck", "needs at least one numeric card")),
            Err(e) => return Err(invalid("poker.deck", &e.to_string())),
        }
        if !is_valid_url(&self.share.base_url) {
            return Err(invalid("share.base_url", "not an absolute URL"));
        }
        if self.retro.top_n == 0 {
            return Err(invalid("retro.top_n", "must be at least 1"));
        }
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load().and_then(|cfg| {
            cfg.validate().map_err(CoreError::from)?;
            Ok(cfg)
        }) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }
}
