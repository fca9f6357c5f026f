//! # Configuration Module
//!
//! Handles loading and validating runtime settings from TOML files.
//!
//! The bindings themselves are compiled in (see [`crate::mapping::table`]);
//! this file only covers device selection, loop timing, the virtual device and
//! logging.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::{PadMapperError, Result};
use crate::output::uinput::MAX_DEVICE_NAME_LEN;

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "PAD_MAPPER_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub emitter: EmitterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Which detected gamepad to sample (0 = first by device path).
    #[serde(default)]
    pub device_index: u32,

    /// Explicit `/dev/input/eventX` path; empty means auto-detect.
    #[serde(default)]
    pub device_path: String,
}

/// Polling loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_elevate_priority")]
    pub elevate_priority: bool,

    #[serde(default = "default_thread_nice")]
    pub thread_nice: i32,

    #[serde(default = "default_status_interval_ticks")]
    pub status_interval_ticks: u64,
}

/// Virtual input device configuration
#[derive(Debug, Deserialize, Clone)]
pub struct EmitterConfig {
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub file_enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

// Default value functions
fn default_poll_interval_ms() -> u64 { 1 }
fn default_elevate_priority() -> bool { true }
fn default_thread_nice() -> i32 { -10 }
fn default_status_interval_ticks() -> u64 { 10000 }

fn default_device_name() -> String { "pad-mapper virtual input".to_string() }

fn default_log_level() -> String { "info".to_string() }
fn default_log_dir() -> String { "./logs".to_string() }
fn default_file_prefix() -> String { "pad-mapper.log".to_string() }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            device_path: String::new(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            elevate_priority: default_elevate_priority(),
            thread_nice: default_thread_nice(),
            status_interval_ticks: default_status_interval_ticks(),
        }
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_enabled: false,
            log_dir: default_log_dir(),
            file_prefix: default_file_prefix(),
        }
    }
}

impl SchedulerConfig {
    /// Sleep between two polling iterations.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pad_mapper::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Path named by `PAD_MAPPER_CONFIG`, or the default path
    #[must_use]
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Validate polling cadence
        if self.scheduler.poll_interval_ms == 0 || self.scheduler.poll_interval_ms > 100 {
            return Err(PadMapperError::Config(
                toml::de::Error::custom("poll_interval_ms must be between 1 and 100")
            ));
        }

        if !(-20..=19).contains(&self.scheduler.thread_nice) {
            return Err(PadMapperError::Config(
                toml::de::Error::custom("thread_nice must be between -20 and 19")
            ));
        }

        if self.scheduler.status_interval_ticks == 0 {
            return Err(PadMapperError::Config(
                toml::de::Error::custom("status_interval_ticks must be greater than 0")
            ));
        }

        // Validate virtual device name
        if self.emitter.device_name.is_empty() {
            return Err(PadMapperError::Config(
                toml::de::Error::custom("emitter device_name cannot be empty")
            ));
        }

        if self.emitter.device_name.len() > MAX_DEVICE_NAME_LEN {
            return Err(PadMapperError::Config(
                toml::de::Error::custom(format!(
                    "emitter device_name must be at most {} bytes", MAX_DEVICE_NAME_LEN
                ))
            ));
        }

        // Validate logging
        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(PadMapperError::Config(
                toml::de::Error::custom("log level must be one of: trace, debug, info, warn, error")
            ));
        }

        if self.logging.file_enabled && self.logging.log_dir.is_empty() {
            return Err(PadMapperError::Config(
                toml::de::Error::custom("logging log_dir cannot be empty when file logging is enabled")
            ));
        }

        if self.logging.file_enabled && self.logging.file_prefix.is_empty() {
            return Err(PadMapperError::Config(
                toml::de::Error::custom("logging file_prefix cannot be empty when file logging is enabled")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.controller.device_index, 0);
        assert!(config.controller.device_path.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[controller]
device_index = 1

[scheduler]
poll_interval_ms = 4
elevate_priority = false

[emitter]
device_name = "test pad"

[logging]
level = "debug"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.controller.device_index, 1);
        assert_eq!(config.scheduler.poll_interval_ms, 4);
        assert!(!config.scheduler.elevate_priority);
        assert_eq!(config.scheduler.thread_nice, default_thread_nice());
        assert_eq!(config.emitter.device_name, "test pad");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.scheduler.poll_interval_ms, 1);
        assert_eq!(config.emitter.device_name, default_device_name());
    }

    #[test]
    fn test_load_invalid_value_fails() {
        use std::io::Write;

        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file.write_all(b"[scheduler]\npoll_interval_ms = 0\n").unwrap();
        temp_file.flush().unwrap();

        assert!(matches!(Config::load(temp_file.path()), Err(PadMapperError::Config(_))));
    }

    #[test]
    fn test_load_malformed_toml_fails() {
        use std::io::Write;

        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file.write_all(b"[scheduler\n").unwrap();
        temp_file.flush().unwrap();

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.scheduler.poll_interval_ms, default_poll_interval_ms());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(PadMapperError::Io(_))));
    }

    #[test]
    fn test_poll_interval_zero() {
        let mut config = Config::default();
        config.scheduler.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_too_high() {
        let mut config = Config::default();
        config.scheduler.poll_interval_ms = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_duration() {
        let mut config = Config::default();
        config.scheduler.poll_interval_ms = 8;
        assert_eq!(config.scheduler.poll_interval(), Duration::from_millis(8));
    }

    #[test]
    fn test_thread_nice_bounds() {
        for (nice, valid) in [(-21, false), (-20, true), (0, true), (19, true), (20, false)] {
            let mut config = Config::default();
            config.scheduler.thread_nice = nice;
            assert_eq!(config.validate().is_ok(), valid, "nice {}", nice);
        }
    }

    #[test]
    fn test_status_interval_zero() {
        let mut config = Config::default();
        config.scheduler.status_interval_ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_device_name() {
        let mut config = Config::default();
        config.emitter.device_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_device_name_too_long() {
        let mut config = Config::default();
        config.emitter.device_name = "x".repeat(MAX_DEVICE_NAME_LEN + 1);
        assert!(config.validate().is_err());

        config.emitter.device_name = "x".repeat(MAX_DEVICE_NAME_LEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = Config::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Level {} should be valid", level);
        }
    }

    #[test]
    fn test_empty_log_dir_when_enabled() {
        let mut config = Config::default();
        config.logging.file_enabled = true;
        config.logging.log_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_dir_when_disabled() {
        let mut config = Config::default();
        config.logging.file_enabled = false;
        config.logging.log_dir = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_prefix_when_enabled() {
        let mut config = Config::default();
        config.logging.file_enabled = true;
        config.logging.file_prefix = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_poll_interval_ms(), 1);
        assert_eq!(default_elevate_priority(), true);
        assert_eq!(default_thread_nice(), -10);
        assert_eq!(default_status_interval_ticks(), 10000);
        assert_eq!(default_device_name(), "pad-mapper virtual input");
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_dir(), "./logs");
        assert_eq!(default_file_prefix(), "pad-mapper.log");
    }
}
