//! Tribufu OAuth2 endpoint paths
//!
//! Paths are relative to the transport's base URL. All three OAuth2 calls
//! authenticate as the client application (Basic), never as the user.

/// Token endpoint for every grant type
pub const TOKEN_PATH: &str = "/v1/oauth2/token";

/// Token introspection endpoint
pub const INTROSPECT_PATH: &str = "/v1/oauth2/introspect";

/// Refresh token revocation endpoint
pub const REVOKE_PATH: &str = "/v1/oauth2/revoke";

/// Profile of the user owning the current bearer token
pub const USERINFO_PATH: &str = "/v1/oauth2/userinfo";

/// Content type sent with OAuth2 requests
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
