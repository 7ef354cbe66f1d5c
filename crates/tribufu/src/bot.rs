//! Bot accounts
//!
//! A bot authenticates with a long-lived token issued from the developer
//! dashboard. The token is a JWT whose payload names the bot; it is checked
//! locally at construction and then sent as a Bearer token.

use std::sync::Arc;

use common::Secret;
use tracing::warn;
use transport::{HeaderMap, Transport};
use tribufu_auth::{CredentialStore, TokenKind, TokenSet, decode_payload};

use crate::config::EnvCredentials;
use crate::error::Result;
use crate::resources::Resources;

pub struct Bot {
    transport: Arc<dyn Transport>,
    store: CredentialStore,
    bot_id: String,
}

impl Bot {
    /// Fails unless `token` decodes to a bot payload carrying a `bot_id`.
    pub fn new(transport: Arc<dyn Transport>, token: impl Into<Secret<String>>) -> Result<Self> {
        let token = token.into();
        let payload = decode_payload(token.expose_str())?;

        if payload.kind != TokenKind::Bot {
            return Err(tribufu_auth::Error::InvalidToken(format!(
                "expected a bot token, got {:?}",
                payload.kind
            ))
            .into());
        }
        let Some(bot_id) = payload.bot_id else {
            return Err(tribufu_auth::Error::InvalidToken("bot token has no bot_id".into()).into());
        };

        Ok(Self {
            transport,
            store: CredentialStore::with_bearer(TokenSet::new(token)),
            bot_id,
        })
    }

    /// Bot from `<PREFIX>_BOT_TOKEN`. An unset variable and an invalid token
    /// both give `None`; the latter is logged.
    pub fn from_env(transport: Arc<dyn Transport>, prefix: Option<&str>) -> Option<Self> {
        let token = EnvCredentials::from_env(prefix).bot_token?;
        match Self::new(transport, token) {
            Ok(bot) => Some(bot),
            Err(e) => {
                warn!(error = %e, "ignoring bot token from environment");
                None
            }
        }
    }

    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    pub fn headers(&self) -> HeaderMap {
        self.store.headers()
    }

    pub fn resources(&self) -> Resources<'_> {
        Resources::new(self.transport.as_ref(), self.headers())
    }
}
