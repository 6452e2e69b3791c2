//! Configuration file handling for ssm-edit.
//!
//! The config file is optional. It supplies defaults that command-line flags
//! can override.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::retry::{RetryPolicy, DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS};

/// Default path for the configuration file
const DEFAULT_CONFIG_PATH: &str = "~/.ssm-edit/config.yml";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RetrySettings {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: u64::try_from(DEFAULT_DELAY.as_millis()).unwrap_or(200),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(value: &RetrySettings) -> Self {
        RetryPolicy::new(value.attempts, Duration::from_millis(value.delay_ms))
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub secure: bool,
    pub retry: RetrySettings,
}

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use ssm_edit_core::config::get_config_path;
///
/// let default_path = get_config_path(&None);
/// assert!(default_path.ends_with("config.yml"));
///
/// let custom_path = get_config_path(&Some("/path/to/config.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/config.yml");
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}

/// Reads the configuration file, falling back to defaults if it doesn't exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not valid YAML
/// for [`Config`].
pub fn load_config(config_path: &str) -> Result<Config> {
    if !Path::exists(Path::new(config_path)) {
        debug!("No config file at `{config_path}`, using defaults");
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(config_path)
        .map_err(|e| Error::io_error("config".to_string(), config_path.to_string(), e))?;

    if contents.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str(&contents).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "config".to_string(),
            config_path.to_string(),
            e,
        )
    })
}
