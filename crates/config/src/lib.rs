#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for binlink
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/binlink/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

pub use constants as fixed_paths;

use binlink_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub launcher: LauncherConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GeneralConfig {
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub debug: bool,
}

/// Where the embedded executable lives and where its alias goes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LauncherConfig {
    #[serde(default = "default_executable_name")]
    pub executable_name: String,
    /// Running from a finalized bundle rather than a development checkout
    #[serde(default)]
    pub packaged: bool,
    /// Packaged resources directory; derived from the running executable if unset
    pub resources_dir: Option<PathBuf>,
    /// Development working directory; the process cwd if unset
    pub cwd: Option<PathBuf>,
    #[serde(default = "default_alias_dir")]
    pub alias_dir: PathBuf,
    /// Full alias path, overrides `alias_dir`
    pub alias_path: Option<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            executable_name: default_executable_name(),
            packaged: false,
            resources_dir: None,
            cwd: None,
            alias_dir: default_alias_dir(),
            alias_path: None,
        }
    }
}

impl LauncherConfig {
    /// Alias location: the explicit path, else `alias_dir/executable_name`
    #[must_use]
    pub fn alias_path(&self) -> PathBuf {
        self.alias_path
            .clone()
            .unwrap_or_else(|| self.alias_dir.join(&self.executable_name))
    }
}

fn default_executable_name() -> String {
    fixed_paths::DEFAULT_EXECUTABLE_NAME.to_string()
}

fn default_alias_dir() -> PathBuf {
    PathBuf::from(fixed_paths::DEFAULT_ALIAS_DIR)
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(fixed_paths::CONFIG_DIR_NAME)
            .join(fixed_paths::CONFIG_FILE_NAME))
    }

    /// Directory for debug log files
    #[must_use]
    pub fn logs_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(fixed_paths::CONFIG_DIR_NAME)
            .join(fixed_paths::LOGS_DIR_NAME)
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::ReadError {
                    path: path.display().to_string(),
                    error: e.to_string(),
                }
            }
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn parse(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if fs::try_exists(&config_path).await.unwrap_or(false) {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// An explicit path must exist; the default location may be absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Merge overrides from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value of the wrong shape.
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(packaged) = lookup(fixed_paths::ENV_PACKAGED) {
            self.launcher.packaged = match packaged.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: fixed_paths::ENV_PACKAGED.to_string(),
                        value: packaged,
                    }
                    .into())
                }
            };
        }

        if let Some(dir) = lookup(fixed_paths::ENV_RESOURCES_DIR) {
            if dir.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: fixed_paths::ENV_RESOURCES_DIR.to_string(),
                    value: dir,
                }
                .into());
            }
            self.launcher.resources_dir = Some(PathBuf::from(dir));
        }

        if let Some(alias) = lookup(fixed_paths::ENV_ALIAS) {
            let alias = PathBuf::from(alias);
            if !alias.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    field: fixed_paths::ENV_ALIAS.to_string(),
                    value: alias.display().to_string(),
                }
                .into());
            }
            self.launcher.alias_path = Some(alias);
        }

        Ok(())
    }
}
