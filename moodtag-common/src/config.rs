//! Configuration loading and input folder resolution
//!
//! Bootstrap configuration comes from a single TOML file. Every key is
//! optional; a missing file means built-in defaults.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments
//! 2. Environment variables (`MOODTAG_INPUT_FOLDER`, `MOODTAG_DECODER`)
//! 3. TOML configuration file
//! 4. Built-in defaults

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the folder to process
pub const INPUT_FOLDER_ENV: &str = "MOODTAG_INPUT_FOLDER";

/// Environment variable naming the external fallback decoder binary
pub const DECODER_ENV: &str = "MOODTAG_DECODER";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder scanned for audio files
    #[serde(default)]
    pub input_folder: Option<PathBuf>,

    /// File extensions to process (case-insensitive, with or without dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Re-read tags after writing them
    #[serde(default = "default_verify")]
    pub verify: bool,

    /// External decoder (ffmpeg-compatible) used when in-process decoding fails
    #[serde(default)]
    pub decoder_path: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Mood catalog override, in priority order. `None` keeps the built-in catalog.
    #[serde(default)]
    pub moods: Option<Vec<MoodCategoryConfig>>,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            input_folder: None,
            extensions: default_extensions(),
            verify: default_verify(),
            decoder_path: None,
            logging: LoggingConfig::default(),
            moods: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// One `[[moods]]` entry of the TOML file
///
/// Ranges are `[low, high]` arrays and are interpreted as half-open `[low, high)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodCategoryConfig {
    pub name: String,
    pub bpm_range: (f64, f64),
    pub energy_range: (f64, f64),
    #[serde(default)]
    pub fuzzy_energy_thresh: Option<f64>,
}

fn default_extensions() -> Vec<String> {
    vec!["mp3".to_string(), "flac".to_string()]
}

fn default_verify() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration with graceful degradation
    ///
    /// An explicit path must exist. Without one, the platform config locations
    /// are searched; if nothing is found the built-in defaults are used.
    /// Returns the config and the file it came from, if any.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::NotFound(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        match find_config_file() {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Configured extensions, normalized
    pub fn normalized_extensions(&self) -> Vec<String> {
        normalize_extensions(&self.extensions)
    }
}

/// Per-user config file location (`<config_dir>/moodtag/config.toml`)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("moodtag").join("config.toml"))
}

/// Locate the first existing config file for the platform
///
/// Linux also falls back to `/etc/moodtag/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    if let Some(path) = user_config_path() {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/moodtag/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the folder to process
///
/// Priority: command-line argument, `MOODTAG_INPUT_FOLDER`, TOML `input_folder`.
/// There is no compiled default: `None` means nothing was configured.
pub fn resolve_input_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Some(path) = non_empty_env(INPUT_FOLDER_ENV) {
        return Some(PathBuf::from(path));
    }

    config.input_folder.clone()
}

/// Resolve the external decoder binary
///
/// Priority: command-line argument, `MOODTAG_DECODER`, TOML `decoder_path`.
pub fn resolve_decoder_path(cli_arg: Option<&Path>, config: &TomlConfig) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Some(path) = non_empty_env(DECODER_ENV) {
        return Some(PathBuf::from(path));
    }

    config.decoder_path.clone()
}

/// Lowercase, strip leading dots, drop blanks and duplicates (first wins)
pub fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        if !ext.is_empty() && !normalized.contains(&ext) {
            normalized.push(ext);
        }
    }
    normalized
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
