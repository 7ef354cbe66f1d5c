//! OAuth2 grant types and token request construction
//!
//! Every grant is sent to the same token endpoint; the grant type decides
//! which request fields carry the grant value and the subject:
//!
//! | grant                | code  | refresh_token | username | password | passkey |
//! |----------------------|-------|---------------|----------|----------|---------|
//! | `authorization_code` | value |               |          |          |         |
//! | `device_code`        | value |               |          |          |         |
//! | `refresh_token`      |       | value         |          |          |         |
//! | `password`           |       |               | subject  | value    |         |
//! | `passkey`            |       |               | subject  |          | value   |
//! | `client_credentials` |       |               |          |          |         |
//!
//! Fields outside a grant's row are omitted from the encoded body.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::credentials::ClientCredentials;

/// OAuth2 grant type, serialized as its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    ClientCredentials,
    DeviceCode,
    Password,
    Passkey,
    RefreshToken,
}

impl GrantType {
    pub const ALL: [GrantType; 6] = [
        GrantType::AuthorizationCode,
        GrantType::ClientCredentials,
        GrantType::DeviceCode,
        GrantType::Password,
        GrantType::Passkey,
        GrantType::RefreshToken,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::ClientCredentials => "client_credentials",
            GrantType::DeviceCode => "device_code",
            GrantType::Password => "password",
            GrantType::Passkey => "passkey",
            GrantType::RefreshToken => "refresh_token",
        }
    }

    /// Whether the grant identifies a user through `username`.
    pub fn uses_subject(&self) -> bool {
        matches!(self, GrantType::Password | GrantType::Passkey)
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a token endpoint request.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub grant_type: GrantType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passkey: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

impl TokenRequest {
    /// Build the request for `grant`, placing `grant_value` and
    /// `subject_value` according to the grant table.
    pub fn new(
        grant: GrantType,
        grant_value: Option<&str>,
        subject_value: Option<&str>,
        client: &ClientCredentials,
    ) -> Self {
        let value = grant_value.map(str::to_owned);
        let mut request = Self {
            grant_type: grant,
            code: None,
            refresh_token: None,
            username: None,
            password: None,
            passkey: None,
            client_id: client.client_id.clone(),
            client_secret: client.client_secret.expose_str().to_owned(),
            redirect_uri: None,
        };

        match grant {
            GrantType::AuthorizationCode | GrantType::DeviceCode => request.code = value,
            GrantType::RefreshToken => request.refresh_token = value,
            GrantType::Password => request.password = value,
            GrantType::Passkey => request.passkey = value,
            GrantType::ClientCredentials => {}
        }

        if grant.uses_subject() {
            request.username = subject_value.map(str::to_owned);
        }

        request
    }

    /// The grant value this request carries, read back from the field the
    /// grant type assigns it to.
    pub fn grant_value(&self) -> Option<&str> {
        match self.grant_type {
            GrantType::AuthorizationCode | GrantType::DeviceCode => self.code.as_deref(),
            GrantType::RefreshToken => self.refresh_token.as_deref(),
            GrantType::Password => self.password.as_deref(),
            GrantType::Passkey => self.passkey.as_deref(),
            GrantType::ClientCredentials => None,
        }
    }

    /// The user this request authenticates, for subject-bearing grants.
    pub fn subject_value(&self) -> Option<&str> {
        if self.grant_type.uses_subject() {
            self.username.as_deref()
        } else {
            None
        }
    }

    /// Encode as a flat JSON object for the form body.
    pub fn to_value(&self) -> serde_json::Value {
        // Plain strings and a unit enum: serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |field: &Option<String>| field.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("TokenRequest")
            .field("grant_type", &self.grant_type)
            .field("code", &redacted(&self.code))
            .field("refresh_token", &redacted(&self.refresh_token))
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .field("passkey", &redacted(&self.passkey))
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClientCredentials {
        ClientCredentials::new("client-1", "s3cret")
    }

    /// Names of the optional grant fields present in the encoded body.
    fn populated(request: &TokenRequest) -> Vec<&'static str> {
        let value = request.to_value();
        ["code", "refresh_token", "username", "password", "passkey", "redirect_uri"]
            .into_iter()
            .filter(|field| value.get(field).is_some())
            .collect()
    }

    #[test]
    fn grant_type_wire_names() {
        for grant in GrantType::ALL {
            let encoded = serde_json::to_value(grant).unwrap();
            assert_eq!(encoded, grant.as_str());
            assert_eq!(grant.to_string(), grant.as_str());
        }
    }

    #[test]
    fn authorization_code_populates_code_only() {
        let request = TokenRequest::new(GrantType::AuthorizationCode, Some("c-1"), Some("ignored"), &client());
        assert_eq!(populated(&request), vec!["code"]);
        assert_eq!(request.code.as_deref(), Some("c-1"));
    }

    #[test]
    fn device_code_is_sent_as_code() {
        let request = TokenRequest::new(GrantType::DeviceCode, Some("dev-9"), None, &client());
        assert_eq!(populated(&request), vec!["code"]);
        assert_eq!(request.code.as_deref(), Some("dev-9"));
    }

    #[test]
    fn refresh_token_populates_refresh_token_only() {
        let request = TokenRequest::new(GrantType::RefreshToken, Some("RT1"), None, &client());
        assert_eq!(populated(&request), vec!["refresh_token"]);
    }

    #[test]
    fn password_populates_username_and_password() {
        let request = TokenRequest::new(GrantType::Password, Some("secret"), Some("alice"), &client());
        assert_eq!(populated(&request), vec!["username", "password"]);
        assert_eq!(request.username.as_deref(), Some("alice"));
        assert_eq!(request.password.as_deref(), Some("secret"));
    }

    #[test]
    fn passkey_populates_username_and_passkey() {
        let request = TokenRequest::new(GrantType::Passkey, Some("pk-assertion"), Some("alice"), &client());
        assert_eq!(populated(&request), vec!["username", "passkey"]);
    }

    #[test]
    fn client_credentials_populates_nothing() {
        let request = TokenRequest::new(GrantType::ClientCredentials, Some("ignored"), Some("42"), &client());
        assert!(populated(&request).is_empty());
    }

    #[test]
    fn client_identity_always_attached() {
        for grant in GrantType::ALL {
            let value = TokenRequest::new(grant, Some("v"), Some("s"), &client()).to_value();
            assert_eq!(value["grant_type"], grant.as_str());
            assert_eq!(value["client_id"], "client-1");
            assert_eq!(value["client_secret"], "s3cret");
        }
    }

    #[test]
    fn grant_and_subject_survive_encoding() {
        for grant in GrantType::ALL {
            let original = TokenRequest::new(grant, Some("value-1"), Some("subject-1"), &client());
            let decoded: TokenRequest = serde_json::from_value(original.to_value()).unwrap();

            assert_eq!(decoded.grant_type, grant);
            assert_eq!(decoded.grant_value(), original.grant_value());
            assert_eq!(decoded.subject_value(), original.subject_value());
            if grant != GrantType::ClientCredentials {
                assert_eq!(decoded.grant_value(), Some("value-1"), "{grant}");
            }
            if grant.uses_subject() {
                assert_eq!(decoded.subject_value(), Some("subject-1"), "{grant}");
            }
        }
    }

    #[test]
    fn debug_redacts_secrets() {
        let request = TokenRequest::new(GrantType::Password, Some("hunter2"), Some("alice"), &client());
        let debug = format!("{request:?}");
        assert!(!debug.contains("hunter2"), "leaked: {debug}");
        assert!(!debug.contains("s3cret"), "leaked: {debug}");
        assert!(debug.contains("alice"));
    }
}
