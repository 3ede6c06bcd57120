use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::caption_tracks::DEFAULT_PREFERENCES;
use crate::language_utils;

/// Application configuration module
/// This module handles loading, validating and saving the settings that the
/// orchestration layer threads through every conversion.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory subtitle files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Caption codes to try, in order
    #[serde(default = "default_caption_preferences")]
    pub caption_preferences: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_output_dir() -> PathBuf {
    dirs::video_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Videos")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_caption_preferences() -> Vec<String> {
    DEFAULT_PREFERENCES.iter().map(|code| code.to_string()).collect()
}

impl Config {
    /// Load a configuration file, or write the defaults there if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok((config, false));
        }

        let config = Config::default();
        config.save(path)?;
        Ok((config, true))
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("Output directory must not be empty"));
        }

        if self.caption_preferences.is_empty() {
            return Err(anyhow!("At least one caption preference is required"));
        }

        for code in &self.caption_preferences {
            language_utils::validate_caption_code(code)
                .with_context(|| format!("Invalid caption preference: '{}'", code))?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: default_output_dir(),
            caption_preferences: default_caption_preferences(),
            log_level: LogLevel::default(),
        }
    }
}
