// SPDX-License-Identifier: MPL-2.0
//! This module handles playback configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use group_player::config::{self, Config};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.playback.looping = Some(true);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::video::PlaybackSpeed;
use crate::error::Result;
use crate::video_player::PacketBudget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "GroupPlayer";

/// Environment variable overriding the configuration directory.
pub const ENV_CONFIG_DIR: &str = "GROUP_PLAYER_CONFIG_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,
}

/// Playback settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Group clock multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,

    /// Restart the group at its end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,

    /// Frame rate used when a file declares none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_fps: Option<f64>,

    /// Packets a stream may read per update before yielding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packets_per_tick: Option<usize>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: Some(DEFAULT_SPEED),
            looping: Some(DEFAULT_LOOPING),
            fallback_fps: Some(DEFAULT_FALLBACK_FPS),
            packets_per_tick: Some(DEFAULT_PACKETS_PER_TICK),
        }
    }
}

impl PlaybackConfig {
    #[must_use]
    pub fn speed(&self) -> PlaybackSpeed {
        self.speed.map(PlaybackSpeed::new).unwrap_or_default()
    }

    #[must_use]
    pub fn looping(&self) -> bool {
        self.looping.unwrap_or(DEFAULT_LOOPING)
    }

    /// Fallback frame rate, clamped to the accepted range.
    #[must_use]
    pub fn fallback_fps(&self) -> f64 {
        match self.fallback_fps {
            Some(fps) if fps.is_finite() => fps.clamp(MIN_FALLBACK_FPS, MAX_FALLBACK_FPS),
            _ => DEFAULT_FALLBACK_FPS,
        }
    }

    #[must_use]
    pub fn packet_budget(&self) -> PacketBudget {
        self.packets_per_tick
            .map(PacketBudget::new)
            .unwrap_or_default()
    }
}

/// Returns the configuration directory.
///
/// # Resolution Order
///
/// 1. `GROUP_PLAYER_CONFIG_DIR` environment variable (if set and non-empty)
/// 2. Platform config directory with the app name appended
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

fn get_default_config_path() -> Option<PathBuf> {
    config_dir().map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration, falling back to defaults if no file exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Saves the configuration to the default location.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads configuration from a specific path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Saves configuration to a specific path, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directories or file cannot be written.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::assert_abs_diff_eq;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Mutex to prevent parallel tests from interfering with each other's env vars
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            playback: PlaybackConfig {
                speed: Some(2.0),
                looping: Some(true),
                fallback_fps: Some(25.0),
                packets_per_tick: Some(64),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn missing_section_uses_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "").expect("failed to write empty file");

        let loaded = load_from_path(&config_path).expect("empty file should parse");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_section_leaves_other_fields_unset() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[playback]\nlooping = true\n").expect("failed to write");

        let loaded = load_from_path(&config_path).expect("failed to load config");
        assert!(loaded.playback.looping());
        assert_eq!(loaded.playback.speed, None);
        assert_abs_diff_eq!(loaded.playback.speed().value(), DEFAULT_SPEED);
        assert_eq!(loaded.playback.packet_budget().value(), DEFAULT_PACKETS_PER_TICK);
    }

    #[test]
    fn out_of_range_values_are_clamped_on_use() {
        let playback = PlaybackConfig {
            speed: Some(50.0),
            looping: None,
            fallback_fps: Some(0.0),
            packets_per_tick: Some(1),
        };
        assert!(playback.speed().is_max());
        assert_abs_diff_eq!(playback.fallback_fps(), MIN_FALLBACK_FPS);
        assert_eq!(playback.packet_budget().value(), MIN_PACKETS_PER_TICK);
    }

    #[test]
    fn save_to_path_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("deep").join("path").join("settings.toml");

        save_to_path(&Config::default(), &config_path).expect("save should create directories");
        assert!(config_path.exists());
    }

    #[test]
    fn env_var_overrides_config_dir() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let temp_dir = tempdir().expect("failed to create temp dir");
        std::env::set_var(ENV_CONFIG_DIR, temp_dir.path());

        assert_eq!(config_dir(), Some(temp_dir.path().to_path_buf()));
        let loaded = load().expect("missing file should yield defaults");
        assert_eq!(loaded, Config::default());

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn empty_env_var_is_ignored() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "");

        if let Some(dir) = config_dir() {
            assert!(dir.ends_with(APP_NAME));
        }

        std::env::remove_var(ENV_CONFIG_DIR);
    }
}
