//! Application configuration.
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - `config.json` in the platform config directory, or an explicit file
//! - `RELAY_*` environment variables (`RELAY_DATA_DIR`,
//!   `RELAY_REQUEST_TIMEOUT_MS`, `RELAY_USER_AGENT`)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use relay_application::DEFAULT_TIMEOUT_MS;
use serde::{Deserialize, Serialize};

use crate::adapters::DEFAULT_USER_AGENT;

const APP_DIR: &str = "relay";
const CONFIG_FILE: &str = "config.json";
const ENV_PREFIX: &str = "RELAY";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Runtime settings for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where state files live; the platform data directory when unset
    pub data_dir: Option<PathBuf>,
    /// Per-request timeout
    pub request_timeout_ms: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Returns the configured data directory, falling back to
    /// `<platform data dir>/relay`, then to `./.relay`.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from(".relay"))
    }
}

/// Returns the platform data directory for Relay.
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(APP_DIR))
}

/// Returns the default config file location.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
}

/// Loads the configuration.
///
/// An explicit `path` must exist; the default config file is optional.
///
/// # Errors
///
/// Returns an error if a file is missing when required, unreadable, or
/// holds values of the wrong type.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (file, required) = match path {
        Some(path) => (Some(path.to_path_buf()), true),
        None => (default_config_path(), false),
    };
    build(file.as_deref(), required, None)
}

fn build(
    file: Option<&Path>,
    required: bool,
    env: Option<HashMap<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(file) = file {
        builder = builder.add_source(
            File::from(file)
                .format(FileFormat::Json)
                .required(required),
        );
    }
    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        )
        .build()?;
    Ok(config.try_deserialize()?)
}
