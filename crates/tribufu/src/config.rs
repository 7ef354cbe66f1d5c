//! SDK configuration and environment bootstrap
//!
//! `ApiOptions` describes where and how to reach the API. `EnvCredentials`
//! collects whatever credentials the environment provides under a prefix
//! (default `TRIBUFU`):
//!
//! | variable               | used by            |
//! |------------------------|--------------------|
//! | `<PREFIX>_API_KEY`     | `Api`              |
//! | `<PREFIX>_CLIENT_ID`   | `Client`, `Server` |
//! | `<PREFIX>_CLIENT_SECRET` | `Client`, `Server` |
//! | `<PREFIX>_SERVER_ID`   | `Server`           |
//! | `<PREFIX>_BOT_TOKEN`   | `Bot`              |
//!
//! Missing variables are not errors; the wrapper constructors return `None`.

use std::sync::Arc;
use std::time::Duration;

use common::Secret;
use common::env::{DEFAULT_PREFIX, lookup};
use transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpTransport, Transport};
use tribufu_auth::ClientCredentials;

use crate::error::{Error, Result};

/// Connection settings for the default HTTP transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiOptions {
    /// Defaults with `TRIBUFU_API_URL` applied when set.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(base_url) = lookup(DEFAULT_PREFIX, "API_URL") {
            options.base_url = base_url;
        }
        options
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the options before building a transport.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than 0".into()));
        }
        Ok(())
    }

    /// Build the shared HTTP transport. Construct once and hand clones of
    /// the `Arc` to every wrapper.
    pub fn transport(&self) -> Result<Arc<dyn Transport>> {
        self.validate()?;
        let transport = HttpTransport::new(self.base_url.clone(), self.timeout)?;
        Ok(Arc::new(transport))
    }
}

/// Credentials found in the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials {
    pub api_key: Option<Secret<String>>,
    pub client_id: Option<String>,
    pub client_secret: Option<Secret<String>>,
    pub server_id: Option<String>,
    pub bot_token: Option<Secret<String>>,
}

impl EnvCredentials {
    /// Read every credential variable under `prefix`. `None` uses `TRIBUFU`.
    pub fn from_env(prefix: Option<&str>) -> Self {
        let prefix = prefix.unwrap_or(DEFAULT_PREFIX);
        Self {
            api_key: lookup(prefix, "API_KEY").map(Secret::new),
            client_id: lookup(prefix, "CLIENT_ID"),
            client_secret: lookup(prefix, "CLIENT_SECRET").map(Secret::new),
            server_id: lookup(prefix, "SERVER_ID"),
            bot_token: lookup(prefix, "BOT_TOKEN").map(Secret::new),
        }
    }

    /// Client identity, when both halves are present.
    pub fn client(&self) -> Option<ClientCredentials> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some(ClientCredentials::new(id.clone(), secret.clone())),
            _ => None,
        }
    }
}
