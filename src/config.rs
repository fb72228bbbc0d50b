//! Configuration management for Country Registry
//!
//! This module provides configuration loading with zero-config defaults,
//! multi-source precedence and first-run file generation.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{config as config_files, defaults, env as env_vars};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Data file settings
    pub data: DataConfig,
    /// Output settings
    pub display: DisplayConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Data file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV file loaded by default
    pub path: PathBuf,
    /// Save after every add/update
    pub auto_save: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::DATA_PATH),
            auto_save: defaults::AUTO_SAVE,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum records printed per listing
    pub result_limit: usize,
    /// Digit group separator for displayed numbers
    pub thousands_separator: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            result_limit: defaults::RESULT_LIMIT,
            thousands_separator: defaults::THOUSANDS_SEPARATOR.to_string(),
        }
    }
}

impl DisplayConfig {
    /// Separator as a character
    pub fn separator(&self) -> char {
        self.thousands_separator
            .chars()
            .next()
            .unwrap_or(defaults::THOUSANDS_SEPARATOR)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    ///
    /// CLI arguments are applied by the caller on top of the result.
    pub fn load(config_file_override: Option<&Path>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(env_vars::DATA_PATH) {
            self.data.path = PathBuf::from(path);
        }

        if let Some(value) = lookup(env_vars::AUTO_SAVE) {
            self.data.auto_save = parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                field: env_vars::AUTO_SAVE.to_string(),
                value: value.clone(),
                reason: "Expected true/false, yes/no or 1/0".to_string(),
            })?;
        }

        if let Some(value) = lookup(env_vars::RESULT_LIMIT) {
            self.display.result_limit =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: env_vars::RESULT_LIMIT.to_string(),
                        value: value.clone(),
                        reason: "Expected a positive whole number".to_string(),
                    })?;
        }

        Ok(())
    }

    /// Check value constraints that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.display.result_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "display.result_limit".to_string(),
                value: "0".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.display.thousands_separator.chars().count() != 1 {
            return Err(ConfigError::InvalidValue {
                field: "display.thousands_separator".to_string(),
                value: self.display.thousands_separator.clone(),
                reason: "Must be exactly one character".to_string(),
            });
        }

        Ok(())
    }

    /// Write the default configuration file to the user config location
    ///
    /// Existing files are kept unless `force` is set. Returns the path and
    /// whether a file was written.
    pub fn initialize(force: bool) -> ConfigResult<(PathBuf, bool)> {
        let config_path = Self::get_default_config_path()?;
        let written = Self::write_default_config(&config_path, force)?;
        Ok((config_path, written))
    }

    /// Write the default configuration content to `path`
    pub fn write_default_config(path: &Path, force: bool) -> ConfigResult<bool> {
        if path.exists() && !force {
            debug!("Config already exists at {}", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!("Creating default configuration file at {}", path.display());
        fs::write(path, Self::generate_default_config_content())?;
        Ok(true)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(config_files::LOCAL_FILE)];
        if let Ok(user_path) = Self::get_default_config_path() {
            search_paths.push(user_path);
        }

        for path in search_paths {
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir
            .join(config_files::APP_DIR)
            .join(config_files::FILE_NAME))
    }

    /// Load configuration from a TOML file
    fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    fn generate_default_config_content() -> String {
        format!(
            r#"# Country Registry Configuration
# You can customize any of these settings to suit your needs.

[data]
# CSV file loaded when no --data flag is given
path = "{}"

# Save the file after every add or update
auto_save = {}

[display]
# Maximum number of records printed per listing
result_limit = {}

# Digit group separator for displayed numbers
thousands_separator = "{}"

[logging]
level = "{}"  # error, warn, info, debug, trace
"#,
            defaults::DATA_PATH,
            defaults::AUTO_SAVE,
            defaults::RESULT_LIMIT,
            defaults::THOUSANDS_SEPARATOR,
            defaults::LOG_LEVEL,
        )
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
