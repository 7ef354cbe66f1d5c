//! CLI configuration
//!
//! Precedence: `--config` > `CONFIG_PATH` > `tribufu.toml` in the working
//! directory. The default file is optional; an explicitly named one is not.
//! Credentials are never read from the TOML, only from `<PREFIX>_*`
//! environment variables, so the file can be committed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use common::env::{DEFAULT_PREFIX, lookup};
use serde::Deserialize;
use tribufu::{ApiOptions, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const DEFAULT_CONFIG_FILE: &str = "tribufu.toml";

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    /// Prefix for credential environment variables.
    #[serde(default = "default_env_prefix")]
    pub env_prefix: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            env_prefix: default_env_prefix(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_env_prefix() -> String {
    DEFAULT_PREFIX.to_owned()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Where the config came from.
#[derive(Debug, PartialEq)]
pub enum ConfigSource {
    /// Named by `--config` or `CONFIG_PATH`; must exist.
    Explicit(PathBuf),
    /// The working-directory default; may be absent.
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Default(path) => path,
        }
    }
}

impl Config {
    /// Parse and validate a TOML file, then apply `TRIBUFU_API_URL`.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load from `source`, falling back to defaults when the default file
    /// does not exist.
    pub fn load_from(source: &ConfigSource) -> common::Result<Self> {
        match source {
            ConfigSource::Default(path) if !path.exists() => {
                let mut config = Config::default();
                config.apply_env();
                config.validate()?;
                Ok(config)
            }
            _ => Self::load(source.path()),
        }
    }

    /// `path` is `--config`, which clap already falls back to `CONFIG_PATH`
    /// for.
    pub fn resolve_path(path: Option<PathBuf>) -> ConfigSource {
        match path {
            Some(path) => ConfigSource::Explicit(path),
            None => ConfigSource::Default(PathBuf::from(DEFAULT_CONFIG_FILE)),
        }
    }

    pub fn api_options(&self) -> ApiOptions {
        ApiOptions::default()
            .base_url(self.api.base_url.clone())
            .timeout(Duration::from_secs(self.api.timeout_secs))
    }

    fn apply_env(&mut self) {
        if let Some(base_url) = lookup(DEFAULT_PREFIX, "API_URL") {
            self.api.base_url = base_url;
        }
    }

    fn validate(&self) -> common::Result<()> {
        self.api_options().validate().map_err(|e| match e {
            tribufu::Error::Config(message) => common::Error::Config(message),
            other => common::Error::Config(other.to_string()),
        })?;

        if self.env_prefix.trim().is_empty() {
            return Err(common::Error::Config("env_prefix must not be empty".into()));
        }

        Ok(())
    }
}
