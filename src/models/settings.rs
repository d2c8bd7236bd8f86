//! Persistent user configuration stored as TOML.

use crate::error::ConfigError;
use crate::models::ruleset::Ruleset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the settings file.
pub const SETTINGS_PATH: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub replay_dir: PathBuf,
    /// Whether song select lists beatmaps converted from another ruleset.
    pub show_converted_beatmaps: bool,
    /// Ruleset active at startup.
    pub default_ruleset: Ruleset,
    /// Logic ticks per second.
    pub frame_rate: u32,
    /// Budget for arrival confirmation, in milliseconds.
    pub arrival_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("main.db"),
            replay_dir: PathBuf::from("data/r"),
            show_converted_beatmaps: true,
            default_ruleset: Ruleset::Osu,
            frame_rate: 200,
            arrival_timeout_ms: 10_000,
        }
    }
}

impl Settings {
    /// Loads settings from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_or_default(Path::new(SETTINGS_PATH))
    }

    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("CONFIG: No settings at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("CONFIG: Failed to load {:?} ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Writes settings to the default path, logging failures.
    pub fn save(&self) {
        if let Err(e) = self.save_to(Path::new(SETTINGS_PATH)) {
            log::error!("CONFIG: Failed to save settings: {}", e);
        }
    }

    /// Duration of one logic tick.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.frame_rate.max(1) as u64)
    }

    pub fn arrival_timeout(&self) -> Duration {
        Duration::from_millis(self.arrival_timeout_ms)
    }
}
