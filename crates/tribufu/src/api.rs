//! Unauthenticated and API-key access
//!
//! `Api` is the entry point for read-only resource access. It never talks to
//! the OAuth2 endpoints; use `Client` for token-based sessions.

use std::sync::Arc;

use common::Secret;
use tracing::{debug, info};
use transport::{HeaderMap, Transport};
use tribufu_auth::{Credential, CredentialStore};

use crate::config::EnvCredentials;
use crate::resources::Resources;

pub struct Api {
    transport: Arc<dyn Transport>,
    store: CredentialStore,
}

impl Api {
    /// Anonymous access: requests carry no `Authorization` header.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            store: CredentialStore::anonymous(),
        }
    }

    pub fn with_api_key(transport: Arc<dyn Transport>, api_key: impl Into<Secret<String>>) -> Self {
        Self {
            transport,
            store: CredentialStore::with_api_key(api_key),
        }
    }

    /// Api keyed from `<PREFIX>_API_KEY`, or `None` when it is unset.
    pub fn from_env(transport: Arc<dyn Transport>, prefix: Option<&str>) -> Option<Self> {
        let api_key = EnvCredentials::from_env(prefix).api_key?;
        debug!("api key loaded from environment");
        Some(Self::with_api_key(transport, api_key))
    }

    /// The factory hosts call once at startup: keyed from the environment
    /// when possible, anonymous otherwise.
    pub fn from_env_or_default(transport: Arc<dyn Transport>, prefix: Option<&str>) -> Self {
        match Self::from_env(transport.clone(), prefix) {
            Some(api) => api,
            None => {
                info!("no api key in environment, using anonymous access");
                Self::new(transport)
            }
        }
    }

    /// Swap in a new API key, discarding any previous credential.
    pub fn set_api_key(&mut self, api_key: impl Into<Secret<String>>) {
        self.store.set(Credential::ApiKey(api_key.into()));
    }

    pub fn credential(&self) -> &Credential {
        self.store.credential()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn headers(&self) -> HeaderMap {
        self.store.headers()
    }

    pub fn resources(&self) -> Resources<'_> {
        Resources::new(self.transport.as_ref(), self.headers())
    }
}
