//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`HUSH_*`)
//! 2. Config file (`~/.hush/config.toml`)
//! 3. Defaults

use crate::core::catalog::{DEFAULT_TITLE, SESSION_TYPES};
use crate::core::timer::{CountdownMode, DurationBounds};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Countdown timer configuration.
    pub timer: TimerConfig,

    /// Defaults applied to recorded sessions.
    pub session: SessionConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `sessions.json` and `settings.json`.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_hush_home(),
        }
    }
}

/// Countdown timer configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimerConfig {
    /// Lower clamp for preset durations, in seconds.
    pub min_seconds: u32,

    /// Upper clamp for preset durations, in seconds.
    pub max_seconds: u32,

    /// Lower clamp for custom duration entry, in seconds.
    pub custom_min_seconds: u32,

    /// Upper clamp for custom duration entry, in seconds.
    pub custom_max_seconds: u32,

    /// Duration used when none is given.
    pub default_seconds: u32,

    /// Compute remaining time from elapsed wall-clock time instead of
    /// decrementing once per tick.
    pub drift_correction: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            min_seconds: DurationBounds::DEFAULT.min,
            max_seconds: DurationBounds::DEFAULT.max,
            custom_min_seconds: DurationBounds::CUSTOM.min,
            custom_max_seconds: DurationBounds::CUSTOM.max,
            default_seconds: 60,
            drift_correction: true,
        }
    }
}

impl TimerConfig {
    /// Bounds for preset durations.
    #[must_use]
    pub fn bounds(&self) -> DurationBounds {
        DurationBounds::new(self.min_seconds, self.max_seconds)
    }

    /// Bounds for custom duration entry.
    #[must_use]
    pub fn custom_bounds(&self) -> DurationBounds {
        DurationBounds::new(self.custom_min_seconds, self.custom_max_seconds)
    }

    /// Countdown strategy selected by `drift_correction`.
    #[must_use]
    pub fn mode(&self) -> CountdownMode {
        if self.drift_correction {
            CountdownMode::WallClock
        } else {
            CountdownMode::Decrement
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, min, max) in [
            ("min_seconds/max_seconds", self.min_seconds, self.max_seconds),
            (
                "custom_min_seconds/custom_max_seconds",
                self.custom_min_seconds,
                self.custom_max_seconds,
            ),
        ] {
            if min == 0 || min > max {
                return Err(Error::Config(format!(
                    "timer {name} must satisfy 1 <= min <= max (got {min}..{max})"
                )));
            }
        }
        if self.default_seconds == 0 {
            return Err(Error::Config(
                "timer default_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Defaults applied to recorded sessions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Title used when a session is recorded without one.
    pub default_title: String,

    /// Session type key used when none is given.
    pub default_type: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            default_type: SESSION_TYPES.default_key().to_string(),
        }
    }
}

/// Get the default hush home directory.
fn default_hush_home() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".hush"), |h| h.join(".hush"))
}

/// Get the hush home directory.
///
/// Uses `HUSH_HOME` environment variable if set, otherwise `~/.hush`.
#[must_use]
pub fn get_hush_home() -> PathBuf {
    env::var("HUSH_HOME").map_or_else(|_| default_hush_home(), PathBuf::from)
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resulting timer bounds are inconsistent.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let config_path = get_config_path();
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        config = parse_config(&contents)?;
    }

    apply_env_overrides(&mut config);
    config.timer.validate()?;

    Ok(config)
}

/// Parse a TOML config document.
///
/// # Errors
///
/// Returns `Error::Config` if the document is not valid TOML for [`Config`].
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
}

/// Get the path to the config file.
fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("HUSH_CONFIG") {
        return PathBuf::from(path);
    }

    get_hush_home().join("config.toml")
}

/// Apply environment variable overrides to config.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(path) = env::var("HUSH_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    } else if let Ok(home) = env::var("HUSH_HOME") {
        config.storage.path = PathBuf::from(home);
    }

    if let Some(secs) = env_parse("HUSH_MIN_SECONDS") {
        config.timer.min_seconds = secs;
    }

    if let Some(secs) = env_parse("HUSH_MAX_SECONDS") {
        config.timer.max_seconds = secs;
    }

    if let Ok(val) = env::var("HUSH_DRIFT_CORRECTION") {
        config.timer.drift_correction = !matches!(
            val.to_lowercase().as_str(),
            "0" | "false" | "off" | "no"
        );
    }
}

fn env_parse(key: &str) -> Option<u32> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
