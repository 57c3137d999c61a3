//! Configuration file support for deckconf.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/deckconf/config.toml`. Settings include the action directory,
//! the format of generated scripts, the daemon reload command, and the recorder's
//! stop/cancel chords.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod keybindings;
pub mod types;

// Re-export commonly used types at module level
pub use keybindings::{ControlAction, KeyBinding, RecorderKeybindings};
pub use types::{DaemonConfig, PathsConfig, ScriptConfig};

use crate::util::expand_tilde;
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [paths]
/// actions_dir = "~/streamdeck-actions"
///
/// [script]
/// key_command = "xdotool key"
/// click_command = "xdotool click"
///
/// [daemon]
/// reload_command = "systemctl --user restart streamdeck"
///
/// [recorder]
/// stop = ["Ctrl+Alt+S"]
/// cancel = ["Ctrl+Alt+X"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Generated script format
    #[serde(default)]
    pub script: ScriptConfig,

    /// Daemon integration
    #[serde(default)]
    pub daemon: DaemonConfig,

    /// Recorder control chords
    #[serde(default)]
    pub recorder: RecorderKeybindings,
}

impl Config {
    /// Validates configuration values, replacing unusable ones with defaults.
    ///
    /// Invalid values are replaced and a warning is logged:
    /// - empty `actions_dir`
    /// - `shebang` not starting with `#!`
    /// - multi-line `description`
    /// - empty `key_command` / `click_command`
    /// - recorder chords that fail to parse or collide
    fn validate_and_clamp(&mut self) {
        if self.paths.actions_dir.trim().is_empty() {
            log::warn!("Empty actions_dir, falling back to default");
            self.paths.actions_dir = types::default_actions_dir();
        }

        if !self.script.shebang.starts_with("#!") || self.script.shebang.contains('\n') {
            log::warn!(
                "Invalid shebang '{}', falling back to '{}'",
                self.script.shebang,
                types::default_shebang()
            );
            self.script.shebang = types::default_shebang();
        }

        if self.script.description.contains('\n') {
            log::warn!("Script description spans multiple lines, keeping the first line only");
            self.script.description = self
                .script
                .description
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
        }

        if self.script.key_command.trim().is_empty() {
            log::warn!("Empty key_command, falling back to default");
            self.script.key_command = types::default_key_command();
        }

        if self.script.click_command.trim().is_empty() {
            log::warn!("Empty click_command, falling back to default");
            self.script.click_command = types::default_click_command();
        }

        if let Err(err) = self.recorder.build_action_map() {
            log::warn!("Invalid recorder keybindings ({}), using defaults", err);
            self.recorder = RecorderKeybindings::default();
        }
    }

    /// Returns the primary configuration directory (`~/.config/deckconf`).
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not find config directory")?
            .join("deckconf"))
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/deckconf/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Resolved action directory with `~` expanded.
    pub fn actions_dir(&self) -> PathBuf {
        expand_tilde(&self.paths.actions_dir)
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the example config from `config.example.toml` to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&config_path, EXAMPLE_CONFIG)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema of the config file, for editor integration.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Documented example configuration shipped with the binary.
pub const EXAMPLE_CONFIG: &str = include_str!("../../config.example.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config.paths.actions_dir, "~/streamdeck-actions");
        assert_eq!(config.script.key_command, "xdotool key");
        assert_eq!(config.recorder.stop, vec!["Ctrl+Alt+S".to_string()]);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[script]\nkey_command = \"ydotool key\"\n\n[daemon]\nreload_command = \"\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.script.key_command, "ydotool key");
        assert_eq!(config.script.click_command, "xdotool click");
        assert!(config.daemon.reload_command.is_empty());
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[paths]
actions_dir = "  "

[script]
shebang = "/bin/sh"
description = "first\nsecond"
key_command = ""

[recorder]
stop = ["Ctrl+Alt"]
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.paths.actions_dir, "~/streamdeck-actions");
        assert_eq!(config.script.shebang, "#!/bin/bash");
        assert_eq!(config.script.description, "first");
        assert_eq!(config.script.key_command, "xdotool key");
        assert_eq!(config.recorder.stop, RecorderKeybindings::default().stop);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[paths\nactions_dir = 1").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn example_config_parses_to_defaults() {
        let config: Config = toml::from_str(EXAMPLE_CONFIG).unwrap();
        let defaults = Config::default();
        assert_eq!(config.paths.actions_dir, defaults.paths.actions_dir);
        assert_eq!(config.script.format(), defaults.script.format());
        assert_eq!(config.daemon.reload_command, defaults.daemon.reload_command);
        assert_eq!(config.recorder.stop, defaults.recorder.stop);
        assert_eq!(config.recorder.cancel, defaults.recorder.cancel);
    }

    #[test]
    fn script_config_builds_format() {
        let format = ScriptConfig::default().format();
        assert_eq!(format, crate::script::ScriptFormat::default());
    }

    #[test]
    fn actions_dir_expands_tilde() {
        let config = Config::default();
        assert!(!config.actions_dir().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn schema_lists_sections() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for section in ["paths", "script", "daemon", "recorder"] {
            assert!(properties.contains_key(section), "missing {section}");
        }
    }
}
