//! Game server identity
//!
//! A `Server` is a `Client` bound to one server record. It logs in with the
//! client credentials grant scoped to its `server_id`.

use std::sync::Arc;

use common::Secret;
use tracing::warn;
use transport::Transport;

use crate::client::Client;
use crate::config::EnvCredentials;
use crate::error::{Error, Result};
use crate::models::GameServer;

const SERVER_SUBJECT: &str = "server_id";

pub struct Server {
    client: Client,
    server_id: String,
}

impl Server {
    pub fn new(
        transport: Arc<dyn Transport>,
        server_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<Secret<String>>,
    ) -> Result<Self> {
        let server_id = server_id.into();
        if server_id.trim().is_empty() {
            return Err(Error::Config("server id is required".into()));
        }
        Ok(Self {
            client: Client::new(transport, client_id, client_secret)?,
            server_id,
        })
    }

    /// Server from `<PREFIX>_SERVER_ID`, `<PREFIX>_CLIENT_ID` and
    /// `<PREFIX>_CLIENT_SECRET`.
    pub fn from_env(transport: Arc<dyn Transport>, prefix: Option<&str>) -> Option<Self> {
        Self::from_credentials(transport, &EnvCredentials::from_env(prefix))
    }

    fn from_credentials(transport: Arc<dyn Transport>, env: &EnvCredentials) -> Option<Self> {
        let server_id = env.server_id.clone()?;
        let client = env.client()?;
        match Self::new(transport, server_id, client.client_id, client.client_secret) {
            Ok(server) => Some(server),
            Err(e) => {
                warn!(error = %e, "ignoring server credentials from environment");
                None
            }
        }
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Obtain a server session via `client_login("server_id", id)`.
    pub async fn login(&mut self) -> bool {
        self.client
            .client_login(Some(SERVER_SUBJECT), Some(self.server_id.as_str()))
            .await
    }

    /// This server's own record.
    pub async fn info(&self) -> Option<GameServer> {
        self.client
            .resources()
            .get_server_by_id(&self.server_id)
            .await
    }
}
