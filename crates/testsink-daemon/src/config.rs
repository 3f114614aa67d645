//! Daemon configuration.
//!
//! Layered the usual way: built-in defaults, then the TOML config file, then
//! `TESTSINK_*` environment variables, then CLI arguments (highest
//! precedence). Directory paths and the database target are configuration,
//! never compile-time constants.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use testsink_watch::RetryPolicy;

/// Top-level daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonConfig {
    /// Directory watched for newly created report files.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory the reserved per-report export path points into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Watch configuration.
    #[serde(default)]
    pub watch: WatchSettings,

    /// Locked-file retry configuration.
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Database target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

/// Directory-watch knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchSettings {
    /// Debounce window in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Locked-file retry knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrySettings {
    /// Total open attempts per file.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, in seconds.
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,

    /// Upper bound for the growing delay, in seconds.
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

impl RetrySettings {
    /// Convert to the watch crate's retry policy.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.initial_delay_secs),
            Duration::from_secs(self.max_delay_secs),
        )
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            database: DatabaseConfig::default(),
            watch: WatchSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_secs: default_initial_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("processed")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("testsink.db")
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    8
}

fn default_initial_delay_secs() -> u64 {
    5
}

fn default_max_delay_secs() -> u64 {
    60
}

impl DaemonConfig {
    /// Load configuration with precedence: defaults < file < env < args.
    pub fn load(
        config_file: Option<PathBuf>,
        input_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        database: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = Self::from_file_or_default(config_file)?;

        if let Ok(dir) = std::env::var("TESTSINK_INPUT_DIR") {
            config.input_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("TESTSINK_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("TESTSINK_DATABASE") {
            config.database.path = PathBuf::from(path);
        }

        if let Some(dir) = input_dir {
            config.input_dir = dir;
        }
        if let Some(dir) = output_dir {
            config.output_dir = dir;
        }
        if let Some(path) = database {
            config.database.path = path;
        }

        Ok(config)
    }

    /// Read the given config file, or the default location if it exists, or
    /// fall back to defaults.
    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        let path = match config_file {
            Some(path) => path,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Default config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("testsink").join("config.toml"))
    }
}
