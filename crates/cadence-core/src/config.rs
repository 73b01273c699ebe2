//! Configuration loading and typed config structures for a Cadence session.
//!
//! The canonical configuration lives in `cadence-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure and a loader that reads the file and applies environment
//! overrides. Every section and field has a default, so an empty file is a
//! valid configuration.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::Deserialize;

use cadence_progression::ProgressionConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level session configuration.
///
/// Mirrors the structure of `cadence-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Timer, queue and randomness settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Calendar used for daily and weekly boundaries.
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Where the save file and catalog live.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Subsystem tunables.
    #[serde(default)]
    pub progression: ProgressionConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `CADENCE_SAVE_PATH` overrides `persistence.save_path`
    /// - `CADENCE_SEED` overrides `session.seed`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("CADENCE_SAVE_PATH") {
            self.persistence.save_path = PathBuf::from(path);
        }
        if let Some(seed) = std::env::var("CADENCE_SEED")
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            self.session.seed = Some(seed);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.calendar.offset()?;
        if self.session.notification_capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "session.notification_capacity must be at least 1".to_owned(),
            });
        }
        if self.session.tick_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                reason: "session.tick_interval_secs must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Session runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Seconds between periodic ticks.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// Notifications kept before the oldest are dropped.
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// Fixed RNG seed; `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
            notification_capacity: default_notification_capacity(),
            seed: None,
        }
    }
}

/// The player's calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CalendarConfig {
    /// Offset from UTC in minutes, e.g. `-300` for UTC-5.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl CalendarConfig {
    /// The configured offset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for offsets of a day or more.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                reason: format!(
                    "calendar.utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ),
            })
    }
}

/// Save and catalog locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Path of the JSON save file.
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,

    /// Optional YAML catalog; the built-in catalog is used when absent.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            catalog_path: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_tick_interval_secs() -> u64 {
    60
}

const fn default_notification_capacity() -> usize {
    50
}

fn default_save_path() -> PathBuf {
    PathBuf::from("cadence-save.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.session.tick_interval_secs, 60);
        assert_eq!(config.session.notification_capacity, 50);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
        assert_eq!(config.progression.missions.daily_count, 3);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
session:
  tick_interval_secs: 30
  notification_capacity: 10
  seed: 99
calendar:
  utc_offset_minutes: -300
persistence:
  save_path: /tmp/player.json
  catalog_path: content/catalog.yaml
logging:
  level: debug
  json: true
progression:
  pets:
    feed_hunger: 40
  missions:
    daily_count: 2
";
        let config = GameConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.session.tick_interval_secs, 30);
        assert_eq!(config.calendar.utc_offset_minutes, -300);
        assert_eq!(
            config.persistence.catalog_path,
            Some(PathBuf::from("content/catalog.yaml"))
        );
        assert!(config.logging.json);
        assert_eq!(config.progression.pets.feed_hunger, 40);
        // Untouched fields keep their defaults.
        assert_eq!(config.progression.pets.feed_happiness, 5);
        assert_eq!(config.progression.missions.daily_count, 2);
        assert_eq!(config.progression.missions.weekly_count, 3);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = GameConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn offset_is_checked() {
        let config = GameConfig::parse("calendar:\n  utc_offset_minutes: 2000\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));

        let calendar = CalendarConfig {
            utc_offset_minutes: 330,
        };
        let offset = calendar.offset().ok().map(|o| o.local_minus_utc());
        assert_eq!(offset, Some(19_800));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = GameConfig::parse("session:\n  notification_capacity: 0\n");
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("cadence-config.yaml");
        if path.exists() {
            let config = GameConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
