//! OAuth2 token lifecycle
//!
//! `TokenManager` owns one client's credential store and drives every grant
//! flow through a single primitive, `exchange_token`. The named flows commit
//! a successful response into the store (switching it to Bearer) and report
//! a plain `bool`.
//!
//! Session state machine:
//!
//! ```text
//! Anonymous     --login/device/passkey/client/authorization ok--> Authenticated
//! Authenticated --refresh ok-------> Authenticated (tokens rotated)
//! Authenticated --refresh failed---> Authenticated (unchanged)
//! Authenticated --revoke ok--------> Anonymous (client identity kept)
//! Authenticated --revoke failed----> Authenticated (unchanged)
//! ```
//!
//! Failure is deliberately coarse at this surface: a rejected password, a
//! 500 and a refused connection all return `false`/`None`. The concrete
//! cause is logged at `warn`. Preconditions (client identity, stored refresh
//! or access token) are checked before any request is sent.
//!
//! Mutating flows take `&mut self`, so a refresh cannot interleave with a
//! revoke on the same manager.

use std::sync::Arc;

use common::Secret;
use tracing::{debug, info, warn};
use transport::{HeaderMap, Transport};

use crate::credentials::{ClientCredentials, CredentialStore, TokenSet};
use crate::error::{Error, Result};
use crate::grant::{GrantType, TokenRequest};
use crate::token::{self, IntrospectionRequest, IntrospectionResponse, TokenHint, TokenResponse};

/// Token lifecycle manager for one OAuth2 client.
pub struct TokenManager {
    transport: Arc<dyn Transport>,
    store: CredentialStore,
}

impl TokenManager {
    /// New manager in the Anonymous state, authenticating OAuth2 calls as
    /// `client`.
    pub fn new(transport: Arc<dyn Transport>, client: ClientCredentials) -> Self {
        Self {
            transport,
            store: CredentialStore::with_client(client),
        }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn client_id(&self) -> Option<&str> {
        self.store.client().map(|c| c.client_id.as_str())
    }

    /// Headers for ordinary API calls (Bearer while a session is active).
    pub fn headers(&self) -> HeaderMap {
        self.store.headers()
    }

    /// Headers for OAuth2 endpoint calls (always Basic).
    pub fn oauth_headers(&self) -> Option<HeaderMap> {
        self.store.oauth_headers()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.store.tokens().map(|t| t.access_token.expose_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.store
            .tokens()
            .and_then(|t| t.refresh_token.as_ref())
            .map(Secret::expose_str)
    }

    /// Lifetime in seconds reported with the current access token.
    pub fn expires_in(&self) -> Option<u64> {
        self.store.tokens().and_then(|t| t.expires_in)
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.tokens().is_some()
    }

    /// Resume a session from tokens obtained elsewhere (e.g. a previous run).
    pub fn restore_session(&mut self, tokens: TokenSet) {
        self.store.set_tokens(tokens);
    }

    /// Exchange a grant for tokens without touching the session.
    ///
    /// `subject_key`/`subject_value` go into the URL query only when both are
    /// non-empty. Returns `None` on any failure.
    pub async fn exchange_token(
        &self,
        grant: GrantType,
        grant_value: Option<&str>,
        subject_key: Option<&str>,
        subject_value: Option<&str>,
    ) -> Option<TokenResponse> {
        match self
            .try_exchange(grant, grant_value, subject_key, subject_value)
            .await
        {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(grant = %grant, error = %e, "token exchange failed");
                None
            }
        }
    }

    async fn try_exchange(
        &self,
        grant: GrantType,
        grant_value: Option<&str>,
        subject_key: Option<&str>,
        subject_value: Option<&str>,
    ) -> Result<TokenResponse> {
        let client = self.client()?;
        let headers = self.required_oauth_headers()?;
        let request = TokenRequest::new(grant, grant_value, subject_value, client);

        let subject = match (subject_key, subject_value) {
            (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => Some((key, value)),
            _ => None,
        };

        token::exchange_token(self.transport.as_ref(), headers, &request, subject).await
    }

    /// Shared body of the named flows: exchange, then commit on success.
    async fn grant(
        &mut self,
        grant: GrantType,
        grant_value: Option<&str>,
        subject_key: Option<&str>,
        subject_value: Option<&str>,
    ) -> bool {
        if self.store.client().is_none() {
            warn!(grant = %grant, "no client credentials, skipping token exchange");
            return false;
        }

        let Some(response) = self
            .exchange_token(grant, grant_value, subject_key, subject_value)
            .await
        else {
            return false;
        };

        let tokens = TokenSet::from(response);
        debug!(
            grant = %grant,
            has_refresh_token = tokens.refresh_token.is_some(),
            expires_in = ?tokens.expires_in,
            "committing tokens"
        );
        self.store.set_tokens(tokens);
        info!(grant = %grant, "session established");
        true
    }

    /// Resource-owner password grant.
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        self.grant(GrantType::Password, Some(password), None, Some(username))
            .await
    }

    /// Device authorization grant, once the user has approved `device_code`.
    pub async fn device_login(&mut self, device_code: &str) -> bool {
        self.grant(GrantType::DeviceCode, Some(device_code), None, None)
            .await
    }

    pub async fn passkey_login(&mut self, username: &str, passkey: &str) -> bool {
        self.grant(GrantType::Passkey, Some(passkey), None, Some(username))
            .await
    }

    /// Client credentials grant, optionally scoped to a subject such as
    /// `("server_id", "42")`.
    pub async fn client_login(&mut self, subject_key: Option<&str>, subject_value: Option<&str>) -> bool {
        self.grant(GrantType::ClientCredentials, None, subject_key, subject_value)
            .await
    }

    pub async fn authorization_login(&mut self, code: &str) -> bool {
        self.grant(GrantType::AuthorizationCode, Some(code), None, None)
            .await
    }

    /// Rotate tokens with the stored refresh token. Without one, returns
    /// `false` and sends nothing. On failure the old tokens stay in place.
    pub async fn refresh(&mut self) -> bool {
        let Some(refresh_token) = self.refresh_token().map(str::to_owned) else {
            debug!("no refresh token stored, skipping refresh");
            return false;
        };
        let refresh_token = Secret::new(refresh_token);
        self.grant(
            GrantType::RefreshToken,
            Some(refresh_token.expose_str()),
            None,
            None,
        )
        .await
    }

    /// Ask the server about the current access token. `None` without a call
    /// when no access token is held, or on any failure.
    pub async fn introspect_token(&self) -> Option<IntrospectionResponse> {
        let access_token = self.access_token()?;
        let request = IntrospectionRequest::new(access_token, TokenHint::AccessToken);

        let result = match self.required_oauth_headers() {
            Ok(headers) => token::introspect(self.transport.as_ref(), headers, &request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(error = %e, "token introspection failed");
                None
            }
        }
    }

    /// Revoke the stored refresh token and clear the session.
    ///
    /// `false` without a call when no refresh token is held. On failure the
    /// session is left exactly as it was.
    pub async fn revoke_token(&mut self) -> bool {
        let Some(refresh_token) = self.refresh_token() else {
            debug!("no refresh token stored, skipping revoke");
            return false;
        };
        let request = IntrospectionRequest::new(refresh_token, TokenHint::RefreshToken);

        let result = match self.required_oauth_headers() {
            Ok(headers) => token::revoke(self.transport.as_ref(), headers, &request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.store.clear_tokens();
                info!("session revoked");
                true
            }
            Err(e) => {
                warn!(error = %e, "token revocation failed");
                false
            }
        }
    }

    /// Whether the server reports the current access token as active.
    pub async fn is_token_valid(&self) -> bool {
        self.introspect_token()
            .await
            .is_some_and(|response| response.active)
    }

    fn client(&self) -> Result<&ClientCredentials> {
        self.store
            .client()
            .ok_or_else(|| Error::MissingCredentials("client id and secret are not set".into()))
    }

    fn required_oauth_headers(&self) -> Result<HeaderMap> {
        self.store
            .oauth_headers()
            .ok_or_else(|| Error::MissingCredentials("client id and secret are not set".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{INTROSPECT_PATH, REVOKE_PATH, TOKEN_PATH};
    use serde_json::json;
    use transport::header;
    use transport::mock::MockTransport;

    fn manager(mock: &Arc<MockTransport>) -> TokenManager {
        TokenManager::new(mock.clone(), ClientCredentials::new("client-1", "s3cret"))
    }

    fn authorization(headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_owned())
    }

    fn token_body(access: &str, refresh: &str, expires_in: u64) -> serde_json::Value {
        json!({
            "token_type": "bearer",
            "access_token": access,
            "refresh_token": refresh,
            "expires_in": expires_in,
        })
    }

    /// Snapshot of the three lifecycle fields.
    fn state(manager: &TokenManager) -> (Option<String>, Option<String>, Option<u64>) {
        (
            manager.access_token().map(str::to_owned),
            manager.refresh_token().map(str::to_owned),
            manager.expires_in(),
        )
    }

    async fn logged_in(mock: &Arc<MockTransport>) -> TokenManager {
        let mut manager = manager(mock);
        mock.respond(200, token_body("AT1", "RT1", 3600));
        assert!(manager.login("alice", "secret").await);
        manager
    }

    #[test]
    fn starts_anonymous_with_basic_identity() {
        let mock = MockTransport::new();
        let manager = manager(&mock);
        assert!(!manager.is_authenticated());
        assert_eq!(state(&manager), (None, None, None));
        assert_eq!(manager.client_id(), Some("client-1"));
        assert!(manager.headers().is_empty());
    }

    #[tokio::test]
    async fn login_success_switches_to_bearer() {
        let mock = MockTransport::new();
        let manager = logged_in(&mock).await;

        assert_eq!(
            state(&manager),
            (Some("AT1".into()), Some("RT1".into()), Some(3600))
        );
        assert_eq!(authorization(&manager.headers()).as_deref(), Some("Bearer AT1"));

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.path, TOKEN_PATH);
        let body = sent.body.value().unwrap();
        assert_eq!(body["grant_type"], "password");
        assert_eq!(body["username"], "alice");
        assert_eq!(body["password"], "secret");
        assert_eq!(
            authorization(&sent.headers).as_deref(),
            Some("Basic Y2xpZW50LTE6czNjcmV0")
        );
    }

    #[tokio::test]
    async fn login_rejected_leaves_state_empty() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);
        mock.respond(401, json!({"error": "invalid_grant"}));

        assert!(!manager.login("alice", "wrong").await);
        assert_eq!(state(&manager), (None, None, None));
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn login_transport_failure_is_plain_false() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);
        mock.fail("connection refused");

        assert!(!manager.login("alice", "secret").await);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn refresh_without_login_sends_nothing() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);

        assert!(!manager.refresh().await);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn refresh_rotates_tokens() {
        let mock = MockTransport::new();
        let mut manager = logged_in(&mock).await;

        mock.respond(200, json!({"access_token": "AT2", "refresh_token": "RT2", "expires_in": 7200}));
        assert!(manager.refresh().await);

        assert_eq!(
            state(&manager),
            (Some("AT2".into()), Some("RT2".into()), Some(7200))
        );
        let body = mock.last_request().unwrap().body.value().unwrap().clone();
        assert_eq!(body["grant_type"], "refresh_token");
        assert_eq!(body["refresh_token"], "RT1");
        assert_eq!(authorization(&manager.headers()).as_deref(), Some("Bearer AT2"));
    }

    #[tokio::test]
    async fn refresh_failure_keeps_stale_tokens() {
        let mock = MockTransport::new();
        let mut manager = logged_in(&mock).await;
        let before = state(&manager);

        mock.respond(400, json!({"error": "invalid_grant"}));
        assert!(!manager.refresh().await);
        assert_eq!(state(&manager), before);
    }

    #[tokio::test]
    async fn introspect_without_token_sends_nothing() {
        let mock = MockTransport::new();
        let manager = manager(&mock);

        assert!(manager.introspect_token().await.is_none());
        assert!(!manager.is_token_valid().await);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn introspect_posts_access_token_hint() {
        let mock = MockTransport::new();
        let manager = logged_in(&mock).await;

        mock.respond(200, json!({"active": true, "client_id": "client-1", "username": "alice", "exp": 1_900_000_000u64}));
        let response = manager.introspect_token().await.unwrap();
        assert!(response.active);
        assert_eq!(response.username.as_deref(), Some("alice"));

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.path, INTROSPECT_PATH);
        assert_eq!(
            sent.body.value().unwrap(),
            &json!({"token": "AT1", "token_type_hint": "access_token"})
        );
        assert_eq!(
            authorization(&sent.headers).as_deref(),
            Some("Basic Y2xpZW50LTE6czNjcmV0")
        );
    }

    #[tokio::test]
    async fn is_token_valid_follows_active_flag() {
        let mock = MockTransport::new();
        let manager = logged_in(&mock).await;

        mock.respond(200, json!({"active": false}));
        assert!(!manager.is_token_valid().await);

        mock.respond(200, json!({"active": true}));
        assert!(manager.is_token_valid().await);

        mock.respond(500, json!({}));
        assert!(!manager.is_token_valid().await);
    }

    #[tokio::test]
    async fn revoke_without_login_sends_nothing() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);

        assert!(!manager.revoke_token().await);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn revoke_success_clears_session() {
        let mock = MockTransport::new();
        let mut manager = logged_in(&mock).await;

        mock.respond(200, json!({}));
        assert!(manager.revoke_token().await);

        assert_eq!(state(&manager), (None, None, None));
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.path, REVOKE_PATH);
        assert_eq!(
            sent.body.value().unwrap(),
            &json!({"token": "RT1", "token_type_hint": "refresh_token"})
        );
        // Identity survives logout so the client can log in again
        assert!(manager.headers().is_empty());
        assert!(manager.oauth_headers().is_some());
    }

    #[tokio::test]
    async fn revoke_failure_leaves_session_untouched() {
        let mock = MockTransport::new();
        let mut manager = logged_in(&mock).await;
        let before = state(&manager);

        mock.respond(503, serde_json::Value::Null);
        assert!(!manager.revoke_token().await);
        assert_eq!(state(&manager), before);

        mock.fail("timeout");
        assert!(!manager.revoke_token().await);
        assert_eq!(state(&manager), before);
    }

    #[tokio::test]
    async fn oauth_headers_identical_before_and_after_login() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);
        let before = manager.oauth_headers().unwrap();

        mock.respond(200, token_body("AT1", "RT1", 3600));
        assert!(manager.login("alice", "secret").await);

        assert_eq!(manager.oauth_headers().unwrap(), before);
    }

    #[tokio::test]
    async fn device_login_sends_code() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);
        mock.respond(200, token_body("AT-dev", "RT-dev", 600));

        assert!(manager.device_login("dev-code-1").await);
        let body = mock.last_request().unwrap().body.value().unwrap().clone();
        assert_eq!(body["grant_type"], "device_code");
        assert_eq!(body["code"], "dev-code-1");
        assert_eq!(manager.access_token(), Some("AT-dev"));
        assert_eq!(authorization(&manager.headers()).as_deref(), Some("Bearer AT-dev"));
    }

    #[tokio::test]
    async fn passkey_login_sends_username_and_passkey() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);
        mock.respond(200, token_body("AT-pk", "RT-pk", 600));

        assert!(manager.passkey_login("alice", "assertion").await);
        let body = mock.last_request().unwrap().body.value().unwrap().clone();
        assert_eq!(body["grant_type"], "passkey");
        assert_eq!(body["username"], "alice");
        assert_eq!(body["passkey"], "assertion");
        assert!(body.get("password").is_none());
        assert_eq!(authorization(&manager.headers()).as_deref(), Some("Bearer AT-pk"));
    }

    #[tokio::test]
    async fn authorization_login_sends_code() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);
        mock.respond(200, token_body("AT-code", "RT-code", 600));

        assert!(manager.authorization_login("auth-code").await);
        let body = mock.last_request().unwrap().body.value().unwrap().clone();
        assert_eq!(body["grant_type"], "authorization_code");
        assert_eq!(body["code"], "auth-code");
        assert_eq!(authorization(&manager.headers()).as_deref(), Some("Bearer AT-code"));
    }

    #[tokio::test]
    async fn client_login_with_subject_sets_query() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);
        mock.respond(200, json!({"access_token": "AT-srv", "expires_in": 900}));

        assert!(manager.client_login(Some("server_id"), Some("42")).await);
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.query, vec![("server_id".to_owned(), "42".to_owned())]);
        assert_eq!(sent.body.value().unwrap()["grant_type"], "client_credentials");
        // No refresh token issued for client credentials
        assert_eq!(state(&manager), (Some("AT-srv".into()), None, Some(900)));
        assert_eq!(authorization(&manager.headers()).as_deref(), Some("Bearer AT-srv"));
    }

    #[tokio::test]
    async fn client_login_with_empty_subject_skips_query() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);
        mock.respond(200, json!({"access_token": "AT-app"}));

        assert!(manager.client_login(Some("server_id"), Some("")).await);
        assert!(mock.last_request().unwrap().query.is_empty());
        assert_eq!(authorization(&manager.headers()).as_deref(), Some("Bearer AT-app"));
    }

    #[tokio::test]
    async fn exchange_token_does_not_commit() {
        let mock = MockTransport::new();
        let manager = manager(&mock);
        mock.respond(200, token_body("AT1", "RT1", 3600));

        let response = manager
            .exchange_token(GrantType::Password, Some("secret"), None, Some("alice"))
            .await
            .unwrap();
        assert_eq!(response.access_token, "AT1");
        assert!(!manager.is_authenticated());
        assert!(manager.headers().is_empty());
    }

    #[tokio::test]
    async fn session_is_reusable_after_revoke() {
        let mock = MockTransport::new();
        let mut manager = logged_in(&mock).await;

        mock.respond(200, json!({}));
        assert!(manager.revoke_token().await);

        mock.respond(200, token_body("AT3", "RT3", 60));
        assert!(manager.login("alice", "secret").await);
        assert_eq!(manager.access_token(), Some("AT3"));
    }

    #[test]
    fn restore_session_uses_given_tokens() {
        let mock = MockTransport::new();
        let mut manager = manager(&mock);
        manager.restore_session(TokenSet::new("AT-saved").with_refresh_token("RT-saved"));

        assert_eq!(manager.refresh_token(), Some("RT-saved"));
        assert_eq!(authorization(&manager.headers()).as_deref(), Some("Bearer AT-saved"));
    }
}
