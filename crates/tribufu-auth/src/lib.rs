//! Tribufu OAuth2 authentication library
//!
//! Provides the credential store used to authenticate API requests, the
//! OAuth2 wire types, and `TokenManager`, which acquires, refreshes,
//! introspects and revokes tokens for one client. This crate depends only on
//! the `Transport` trait, so it can be tested with a stub transport and no
//! network.
//!
//! Token flow:
//! 1. `TokenManager::new()` with the client id and secret (Basic identity)
//! 2. A login flow (`login`, `device_login`, `client_login`, ...) exchanges a
//!    grant at `TOKEN_PATH` and switches the store to Bearer
//! 3. `refresh()` rotates tokens with the stored refresh token
//! 4. `introspect_token()` / `is_token_valid()` check the access token
//! 5. `revoke_token()` revokes the refresh token and clears the session

pub mod constants;
pub mod credentials;
pub mod error;
pub mod grant;
pub mod jwt;
pub mod manager;
pub mod token;

pub use constants::*;
pub use credentials::{ClientCredentials, Credential, CredentialStore, TokenSet};
pub use error::{Error, Result};
pub use grant::{GrantType, TokenRequest};
pub use jwt::{TokenKind, TokenPayload, decode_payload};
pub use manager::TokenManager;
pub use token::{IntrospectionRequest, IntrospectionResponse, TokenHint, TokenResponse};
