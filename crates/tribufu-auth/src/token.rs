//! OAuth2 endpoint exchanges
//!
//! Handles the three OAuth2 endpoint interactions:
//! 1. Token exchange (every grant type, `TOKEN_PATH`)
//! 2. Token introspection (`INTROSPECT_PATH`)
//! 3. Refresh token revocation (`REVOKE_PATH`)
//!
//! All three POST a form body with the client's Basic credentials. These
//! functions report precise errors; `TokenManager` decides what the caller
//! gets to see.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use transport::{HeaderMap, Request, Response, Transport};

use crate::constants::{INTROSPECT_PATH, REVOKE_PATH, TOKEN_PATH};
use crate::error::{Error, Result};
use crate::grant::TokenRequest;

/// Response from the token endpoint for every grant.
///
/// `expires_in` is a delta in seconds from the response time. `token_type`
/// and `expires_in` are tolerated when the server omits them.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .field("state", &self.state)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Which token an introspection or revocation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenHint {
    AccessToken,
    RefreshToken,
}

/// Body for both introspection and revocation.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct IntrospectionRequest {
    pub token: String,
    pub token_type_hint: TokenHint,
}

impl IntrospectionRequest {
    pub fn new(token: impl Into<String>, token_type_hint: TokenHint) -> Self {
        Self {
            token: token.into(),
            token_type_hint,
        }
    }

    fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "token": self.token,
            "token_type_hint": self.token_type_hint,
        })
    }
}

impl fmt::Debug for IntrospectionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrospectionRequest")
            .field("token", &"[REDACTED]")
            .field("token_type_hint", &self.token_type_hint)
            .finish()
    }
}

/// Introspection result. Only `active` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntrospectionResponse {
    pub active: bool,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Expiration as a unix timestamp in seconds
    #[serde(default)]
    pub exp: Option<u64>,
}

/// POST a token request and decode the token response.
///
/// `subject` is appended to the URL as a single query parameter when given
/// (e.g. `("server_id", "42")` for server client-credential exchanges).
pub async fn exchange_token(
    transport: &dyn Transport,
    headers: HeaderMap,
    request: &TokenRequest,
    subject: Option<(&str, &str)>,
) -> Result<TokenResponse> {
    let mut outgoing = Request::post(TOKEN_PATH)
        .headers(headers)
        .form(request.to_value());
    if let Some((key, value)) = subject {
        outgoing = outgoing.query(key, value);
    }

    debug!(grant = %request.grant_type, "requesting token");
    let response = transport.request(outgoing).await?;
    ensure_ok(&response)?;

    response
        .json::<TokenResponse>()
        .map_err(|e| Error::Decode(format!("invalid token response: {e}")))
}

/// Ask the server whether `request.token` is active.
pub async fn introspect(
    transport: &dyn Transport,
    headers: HeaderMap,
    request: &IntrospectionRequest,
) -> Result<IntrospectionResponse> {
    let outgoing = Request::post(INTROSPECT_PATH)
        .headers(headers)
        .form(request.to_value());

    let response = transport.request(outgoing).await?;
    ensure_ok(&response)?;

    response
        .json::<IntrospectionResponse>()
        .map_err(|e| Error::Decode(format!("invalid introspection response: {e}")))
}

/// Revoke `request.token` server-side. Any 200 counts as revoked, whatever
/// the body.
pub async fn revoke(
    transport: &dyn Transport,
    headers: HeaderMap,
    request: &IntrospectionRequest,
) -> Result<()> {
    let outgoing = Request::post(REVOKE_PATH)
        .headers(headers)
        .form(request.to_value());

    let response = transport.request(outgoing).await?;
    ensure_ok(&response)
}

fn ensure_ok(response: &Response) -> Result<()> {
    if response.is_ok() {
        return Ok(());
    }
    let body = match &response.body {
        serde_json::Value::Null => String::from("<no body>"),
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    Err(Error::Status {
        status: response.status,
        body,
    })
}
