//! Credential store for outgoing requests
//!
//! Holds the credential currently used to authenticate API calls and the
//! client identity (id + secret) used to authenticate OAuth2 calls. Exactly
//! one `Credential` is active at a time; setting a new one discards the
//! previous. The client identity lives beside the active credential rather
//! than inside it, so a client keeps its identity while a bearer session is
//! active and after that session is revoked.
//!
//! Header rendering is a pure function of the current state.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use common::Secret;
use transport::{HeaderMap, HeaderValue, header};
use tracing::warn;

use crate::constants::FORM_CONTENT_TYPE;
use crate::token::TokenResponse;

/// OAuth2 client identity issued by the developer portal.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<Secret<String>>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// `Basic <base64(client_id:client_secret)>`
    pub fn basic_authorization(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret.expose_str());
        format!("Basic {}", STANDARD.encode(raw))
    }
}

/// Tokens obtained from a grant exchange.
///
/// `expires_in` is the server-reported lifetime in seconds, relative to when
/// the response was received. No absolute deadline is derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSet {
    pub access_token: Secret<String>,
    pub refresh_token: Option<Secret<String>>,
    pub expires_in: Option<u64>,
}

impl TokenSet {
    pub fn new(access_token: impl Into<Secret<String>>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_in: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<Secret<String>>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = Some(seconds);
        self
    }
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: Secret::new(response.access_token),
            refresh_token: response.refresh_token.map(Secret::new),
            expires_in: response.expires_in,
        }
    }
}

/// The credential attached to ordinary API requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Credential {
    /// Anonymous access
    #[default]
    None,
    /// Read-only public access
    ApiKey(Secret<String>),
    /// The client application itself, with no session. Adds nothing to
    /// ordinary API requests.
    ClientBasic(ClientCredentials),
    /// A user, bot or server session
    Bearer(TokenSet),
}

impl Credential {
    /// Scheme name as used in the `Authorization` header, for logging.
    pub fn scheme(&self) -> &'static str {
        match self {
            Credential::None => "none",
            Credential::ApiKey(_) => "api_key",
            Credential::ClientBasic(_) => "basic",
            Credential::Bearer(_) => "bearer",
        }
    }
}

/// Active credential plus the retained client identity.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    client: Option<ClientCredentials>,
    active: Credential,
}

impl CredentialStore {
    /// Anonymous store: no identity, no credential.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_api_key(key: impl Into<Secret<String>>) -> Self {
        Self {
            client: None,
            active: Credential::ApiKey(key.into()),
        }
    }

    /// Store for an OAuth2 client; basic credentials start out active.
    pub fn with_client(client: ClientCredentials) -> Self {
        Self {
            active: Credential::ClientBasic(client.clone()),
            client: Some(client),
        }
    }

    pub fn with_bearer(tokens: TokenSet) -> Self {
        Self {
            client: None,
            active: Credential::Bearer(tokens),
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.active
    }

    pub fn client(&self) -> Option<&ClientCredentials> {
        self.client.as_ref()
    }

    /// Current bearer tokens, if a session is active.
    pub fn tokens(&self) -> Option<&TokenSet> {
        match &self.active {
            Credential::Bearer(tokens) => Some(tokens),
            _ => None,
        }
    }

    /// Replace the active credential.
    pub fn set(&mut self, credential: Credential) {
        self.active = credential;
    }

    /// Start a bearer session, discarding whatever was active.
    pub fn set_tokens(&mut self, tokens: TokenSet) {
        self.active = Credential::Bearer(tokens);
    }

    /// End the bearer session. Falls back to basic credentials when a client
    /// identity is held, otherwise to anonymous.
    pub fn clear_tokens(&mut self) {
        self.active = match &self.client {
            Some(client) => Credential::ClientBasic(client.clone()),
            None => Credential::None,
        };
    }

    /// Headers for ordinary API requests.
    ///
    /// At most one `Authorization` header: `ApiKey` or `Bearer`. Client basic
    /// credentials only go to the OAuth2 endpoints (see `oauth_headers`), so
    /// an idle client store sends nothing here.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = match &self.active {
            Credential::None | Credential::ClientBasic(_) => return headers,
            Credential::ApiKey(key) => format!("ApiKey {}", key.expose_str()),
            Credential::Bearer(tokens) => format!("Bearer {}", tokens.access_token.expose_str()),
        };
        insert_authorization(&mut headers, &value, self.active.scheme());
        headers
    }

    /// Headers for the OAuth2 token, introspect and revoke endpoints.
    ///
    /// Always authenticates as the client, independent of any bearer session.
    /// `None` when the store holds no client identity.
    pub fn oauth_headers(&self) -> Option<HeaderMap> {
        let client = self.client.as_ref()?;
        let mut headers = HeaderMap::new();
        insert_authorization(&mut headers, &client.basic_authorization(), "basic");
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(FORM_CONTENT_TYPE),
        );
        Some(headers)
    }
}

fn insert_authorization(headers: &mut HeaderMap, value: &str, scheme: &str) {
    match HeaderValue::from_str(value) {
        Ok(mut value) => {
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Err(e) => {
            warn!(scheme, error = %e, "credential is not a valid header value, sending request without it");
        }
    }
}
