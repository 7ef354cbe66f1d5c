//! OAuth2 client wrapper
//!
//! `Client` pairs a client identity with a `TokenManager`. Before a login API
//! calls go out without an `Authorization` header; after one, they carry the
//! session's Bearer token. The client's Basic credentials only ever reach the
//! OAuth2 endpoints.

use std::sync::Arc;

use common::Secret;
use tracing::{debug, warn};
use transport::{HeaderMap, Transport};
use tribufu_auth::{
    ClientCredentials, GrantType, IntrospectionResponse, TokenManager, TokenResponse, TokenSet,
    USERINFO_PATH,
};

use crate::config::EnvCredentials;
use crate::error::{Error, Result};
use crate::models::User;
use crate::resources::Resources;

pub struct Client {
    manager: TokenManager,
}

impl Client {
    /// Fails when either half of the client identity is empty.
    pub fn new(
        transport: Arc<dyn Transport>,
        client_id: impl Into<String>,
        client_secret: impl Into<Secret<String>>,
    ) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.trim().is_empty() || client_secret.is_empty() {
            return Err(Error::Config("client id and client secret are required".into()));
        }

        let client = ClientCredentials::new(client_id, client_secret);
        Ok(Self {
            manager: TokenManager::new(transport, client),
        })
    }

    /// Client from `<PREFIX>_CLIENT_ID` and `<PREFIX>_CLIENT_SECRET`.
    pub fn from_env(transport: Arc<dyn Transport>, prefix: Option<&str>) -> Option<Self> {
        let client = EnvCredentials::from_env(prefix).client()?;
        debug!(client_id = %client.client_id, "client credentials loaded from environment");
        Some(Self {
            manager: TokenManager::new(transport, client),
        })
    }

    /// Resume a session with tokens kept from an earlier login.
    pub fn with_tokens(
        mut self,
        access_token: impl Into<Secret<String>>,
        refresh_token: Option<Secret<String>>,
    ) -> Self {
        let mut tokens = TokenSet::new(access_token);
        if let Some(refresh_token) = refresh_token {
            tokens = tokens.with_refresh_token(refresh_token);
        }
        self.manager.restore_session(tokens);
        self
    }

    pub fn manager(&self) -> &TokenManager {
        &self.manager
    }

    pub fn client_id(&self) -> Option<&str> {
        self.manager.client_id()
    }

    pub fn is_authenticated(&self) -> bool {
        self.manager.is_authenticated()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.manager.access_token()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.manager.refresh_token()
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.manager.expires_in()
    }

    pub fn headers(&self) -> HeaderMap {
        self.manager.headers()
    }

    pub fn oauth_headers(&self) -> Option<HeaderMap> {
        self.manager.oauth_headers()
    }

    pub fn resources(&self) -> Resources<'_> {
        Resources::new(self.manager.transport().as_ref(), self.headers())
    }

    pub async fn exchange_token(
        &self,
        grant: GrantType,
        grant_value: Option<&str>,
        subject_key: Option<&str>,
        subject_value: Option<&str>,
    ) -> Option<TokenResponse> {
        self.manager
            .exchange_token(grant, grant_value, subject_key, subject_value)
            .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        self.manager.login(username, password).await
    }

    pub async fn device_login(&mut self, device_code: &str) -> bool {
        self.manager.device_login(device_code).await
    }

    pub async fn passkey_login(&mut self, username: &str, passkey: &str) -> bool {
        self.manager.passkey_login(username, passkey).await
    }

    pub async fn client_login(&mut self, subject_key: Option<&str>, subject_value: Option<&str>) -> bool {
        self.manager.client_login(subject_key, subject_value).await
    }

    pub async fn authorization_login(&mut self, code: &str) -> bool {
        self.manager.authorization_login(code).await
    }

    pub async fn refresh(&mut self) -> bool {
        self.manager.refresh().await
    }

    pub async fn introspect_token(&self) -> Option<IntrospectionResponse> {
        self.manager.introspect_token().await
    }

    pub async fn revoke_token(&mut self) -> bool {
        self.manager.revoke_token().await
    }

    pub async fn is_token_valid(&self) -> bool {
        self.manager.is_token_valid().await
    }

    /// Profile of the logged-in user. `None` without a session.
    pub async fn user_info(&self) -> Option<User> {
        if !self.is_authenticated() {
            warn!("user info requested without an active session");
            return None;
        }
        self.resources().get(USERINFO_PATH).await
    }
}
