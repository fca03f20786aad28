//! Configuration management for brailledit.
//!
//! This crate provides configuration loading, saving, and validation
//! with support for TOML format and XDG directory conventions.

mod settings;
mod xdg;

pub use settings::{Config, FileSettings, InputSettings, LayoutSettings, LoggingSettings};
pub use xdg::get_config_dir;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Default values as constants
pub mod defaults {
    pub const CHARS_PER_LINE: usize = 40;
    pub const LINES_PER_PAGE: usize = 25;
    pub const LINE_MARGIN: usize = 33;
    pub const PAGE_MARGIN: usize = 25;
    pub const CHORD_KEYS: &str = "fdsjkl";
    pub const RELEASE_MODEL: &str = "auto";
    pub const BRAILLE_ENTRY: bool = true;
    pub const LINE_ENDING: &str = "native";
    pub const MIN_LOG_LEVEL: &str = "info";
    pub const MAX_LOG_ENTRIES: usize = 500;
}

const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from the XDG config file.
    ///
    /// On first run, creates config file with default values.
    /// Auto-completes missing keys with default values.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let original_content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;

            let config = Self::validate_content(&original_content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;

            // Serialize back to get normalized content
            let normalized_content = toml::to_string_pretty(&config)?;

            // If content changed, save the updated config
            if original_content != normalized_content {
                config.save_to(path)?;
            }

            Ok(config)
        } else {
            // First run - create config file with default values
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the XDG config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Parse and validate config content.
    pub fn validate_content(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// String settings naming keys, release models and line endings are
    /// resolved (and rejected) by their consumers.
    pub fn validate(&self) -> Result<()> {
        if self.layout.chars_per_line == 0 {
            bail!("layout.chars_per_line must be positive");
        }
        if self.layout.lines_per_page == 0 {
            bail!("layout.lines_per_page must be positive");
        }
        if !LOG_LEVELS.contains(&self.logging.min_level.to_lowercase().as_str()) {
            bail!(
                "logging.min_level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.logging.min_level
            );
        }
        Ok(())
    }
}
