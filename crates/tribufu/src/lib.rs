//! Client SDK for the Tribufu REST API
//!
//! Four wrappers cover the ways a program can authenticate:
//!
//! - `Api`: anonymous or API-key access to public resources
//! - `Client`: an OAuth2 client application with user/device/passkey logins
//! - `Bot`: a bot account holding a bot token
//! - `Server`: a game server logging in as itself
//!
//! All of them share one `Transport`. Build it once (usually with
//! `ApiOptions::from_env().transport()`) and pass clones of the `Arc` to each
//! wrapper:
//!
//! ```no_run
//! # async fn run() -> tribufu::Result<()> {
//! use tribufu::{Api, ApiOptions};
//!
//! let transport = ApiOptions::from_env().transport()?;
//! let api = Api::from_env_or_default(transport, None);
//! for server in api.resources().get_servers(1).await {
//!     println!("{}", server.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod bot;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod resources;
pub mod server;

#[cfg(test)]
mod test_support;

pub use api::Api;
pub use bot::Bot;
pub use client::Client;
pub use config::{ApiOptions, EnvCredentials};
pub use error::{Error, Result};
pub use resources::Resources;
pub use server::Server;

pub use common::Secret;
pub use transport;
pub use transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpTransport, Transport};
pub use tribufu_auth::{GrantType, IntrospectionResponse, TokenKind, TokenPayload, TokenResponse, decode_payload};
