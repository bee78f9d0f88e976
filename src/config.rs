//! Configuration management for TypingStats
//!
//! Provides persistent configuration loaded from a platform-specific config
//! file. Command-line flags override whatever the file says.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/typing-stats/config.toml` |
//! | macOS | `~/Library/Application Support/typing-stats/config.toml` |
//! | Windows | `%APPDATA%\typing-stats\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use typing_stats::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.files.results_path = "./history.txt".into();
//! config.save().expect("Failed to save config");
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("typing-stats");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Test texts and results history
    #[serde(default)]
    pub files: FilesConfig,
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
    /// Keyboard decoding settings
    #[serde(default)]
    pub keys: KeysConfig,
}

/// Where test texts are found and results are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Directory scanned by the startup menu
    pub tests_dir: PathBuf,
    /// File name prefix of test texts
    pub test_prefix: String,
    /// File extension of test texts (without the dot)
    pub test_extension: String,
    /// Results history file, appended after every run
    pub results_path: PathBuf,
    /// Characters of the first line shown in the menu
    pub preview_chars: usize,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            tests_dir: PathBuf::from("./tests/"),
            test_prefix: "test".to_string(),
            test_extension: "txt".to_string(),
            results_path: PathBuf::from("./results.txt"),
            preview_chars: 50,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme (dark/light)
    pub theme: Theme,
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Keyboard decoding configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeysConfig {
    /// Swap single-character and word undo between Backspace and
    /// Ctrl+Backspace, for terminals that send the two codes the other way
    /// round
    pub swap_backspace: bool,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
