//! Configuration for chatbox sessions.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::responses::{ResponseTable, FRIEND_RESPONSES};
use crate::user::User;

/// Directory holding the config file, relative to the working directory.
pub const CONFIG_DIR: &str = ".chatbox";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The person at the keyboard.
    #[serde(default = "User::local")]
    pub local_user: User,

    /// The simulated counterpart.
    #[serde(default = "User::friend")]
    pub friend: User,

    /// Scripted reply delays.
    #[serde(default)]
    pub delays: ReplyDelays,

    /// Pool of replies to text messages.
    #[serde(default = "default_responses")]
    pub responses: Vec<String>,

    /// Seed for reply selection. Random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Scratch directory for staged images. A fresh temporary directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

fn default_responses() -> Vec<String> {
    FRIEND_RESPONSES.iter().map(|s| (*s).to_string()).collect()
}

/// Delays before the friend answers each kind of action, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyDelays {
    #[serde(default = "default_text_ms")]
    pub text_ms: u64,
    #[serde(default = "default_image_ms")]
    pub image_ms: u64,
    #[serde(default = "default_invite_ms")]
    pub invite_ms: u64,
}

fn default_text_ms() -> u64 {
    2000
}

fn default_image_ms() -> u64 {
    2500
}

fn default_invite_ms() -> u64 {
    1000
}

impl Default for ReplyDelays {
    fn default() -> Self {
        Self {
            text_ms: default_text_ms(),
            image_ms: default_image_ms(),
            invite_ms: default_invite_ms(),
        }
    }
}

impl ReplyDelays {
    pub fn text(&self) -> Duration {
        Duration::from_millis(self.text_ms)
    }

    pub fn image(&self) -> Duration {
        Duration::from_millis(self.image_ms)
    }

    pub fn invite(&self) -> Duration {
        Duration::from_millis(self.invite_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_user: User::local(),
            friend: User::friend(),
            delays: ReplyDelays::default(),
            responses: default_responses(),
            seed: None,
            storage_dir: None,
        }
    }
}

impl Config {
    /// Default config path under `root`.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load and validate configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Check the invariants a session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.responses.is_empty() {
            return Err(ConfigError::EmptyResponses);
        }
        if self.local_user.id == self.friend.id {
            return Err(ConfigError::DuplicateUserId(self.local_user.id.to_string()));
        }
        Ok(())
    }

    /// The response pool as a validated table.
    pub fn response_table(&self) -> Result<ResponseTable, ConfigError> {
        ResponseTable::new(self.responses.clone()).ok_or(ConfigError::EmptyResponses)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The response pool has no entries.
    #[error("responses must contain at least one entry")]
    EmptyResponses,

    /// Local user and friend share an id.
    #[error("local user and friend share the id {0:?}")]
    DuplicateUserId(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.delays.text(), Duration::from_millis(2000));
        assert_eq!(config.delays.image(), Duration::from_millis(2500));
        assert_eq!(config.delays.invite(), Duration::from_millis(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_delays_json() {
        let json = serde_json::to_string_pretty(&ReplyDelays::default()).unwrap();
        insta::assert_snapshot!(json, @r#"
        {
          "text_ms": 2000,
          "image_ms": 2500,
          "invite_ms": 1000
        }
        "#);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.local_user, User::local());
        assert_eq!(config.friend, User::friend());
        assert_eq!(config.delays, ReplyDelays::default());
        assert_eq!(config.responses.len(), FRIEND_RESPONSES.len());
    }

    #[test]
    fn test_partial_delays() {
        let config: Config = serde_json::from_str(r#"{"delays":{"text_ms":10}}"#).unwrap();
        assert_eq!(config.delays.text_ms, 10);
        assert_eq!(config.delays.image_ms, 2500);
    }

    #[test]
    fn test_validate_rejects_empty_responses() {
        let config = Config {
            responses: Vec::new(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyResponses)));
    }

    #[test]
    fn test_validate_rejects_shared_id() {
        let config = Config {
            friend: User::new("user1", "Clone", "👯"),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateUserId(id)) if id == "user1"
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = Config::default_path(dir.path());

        let config = Config {
            seed: Some(9),
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.seed, Some(9));
        assert_eq!(loaded.responses, config.responses);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.json")).unwrap();
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
