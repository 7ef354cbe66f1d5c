//! Typed access to Tribufu API resources
//!
//! `Resources` borrows a transport and snapshots the owner's authorization
//! headers, so every request it builds carries whatever credential was active
//! when it was created. Each accessor has a `try_` form returning `Result`;
//! the plain form logs the error and returns `None` (or an empty list).

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use transport::{HeaderMap, Request, Transport};

use crate::error::{Error, Result};
use crate::models::{Cluster, Game, GameServer, User};

pub const GAMES_PATH: &str = "/v1/packages";
pub const SERVERS_PATH: &str = "/v1/servers";
pub const CLUSTERS_PATH: &str = "/v1/clusters";
pub const USERS_PATH: &str = "/v1/users";

/// Request builder bound to one transport and one set of auth headers.
pub struct Resources<'a> {
    transport: &'a dyn Transport,
    headers: HeaderMap,
}

impl<'a> Resources<'a> {
    pub fn new(transport: &'a dyn Transport, headers: HeaderMap) -> Self {
        Self { transport, headers }
    }

    /// Send `request` with the bound headers and decode a 200 body as `T`.
    pub async fn try_send<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self
            .transport
            .request(request.headers(self.headers.clone()))
            .await?;

        if !response.is_ok() {
            let body = match &response.body {
                serde_json::Value::Null => "<no body>".to_owned(),
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(Error::Status {
                status: response.status,
                body,
            });
        }

        debug!(method = %method, path = %path, status = response.status, "resource request succeeded");
        Ok(response.json()?)
    }

    async fn send<T: DeserializeOwned>(&self, request: Request) -> Option<T> {
        let method = request.method.clone();
        let path = request.path.clone();
        match self.try_send(request).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(method = %method, path = %path, error = %e, "resource request failed");
                None
            }
        }
    }

    fn encode<B: Serialize>(body: &B) -> Option<serde_json::Value> {
        match serde_json::to_value(body) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "failed to encode request body");
                None
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.send(Request::get(path)).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Option<T> {
        let body = Self::encode(body)?;
        self.send(Request::post(path).json(body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Option<T> {
        let body = Self::encode(body)?;
        self.send(Request::put(path).json(body)).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Option<T> {
        let body = Self::encode(body)?;
        self.send(Request::patch(path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.send(Request::delete(path)).await
    }

    async fn list<T: DeserializeOwned>(&self, path: &str, page: u32) -> Vec<T> {
        let request = Request::get(path).query("page", page.to_string());
        self.send(request).await.unwrap_or_default()
    }

    pub async fn get_games(&self, page: u32) -> Vec<Game> {
        self.list(GAMES_PATH, page).await
    }

    pub async fn get_game_by_id(&self, id: &str) -> Option<Game> {
        self.get(&format!("{GAMES_PATH}/{id}")).await
    }

    pub async fn get_servers(&self, page: u32) -> Vec<GameServer> {
        self.list(SERVERS_PATH, page).await
    }

    /// Look a server up by numeric id, or by `host[:port]` address otherwise.
    pub async fn get_server(&self, id_or_address: &str) -> Option<GameServer> {
        if is_numeric_id(id_or_address) {
            self.get_server_by_id(id_or_address).await
        } else {
            self.get_server_by_address(id_or_address).await
        }
    }

    pub async fn get_server_by_id(&self, id: &str) -> Option<GameServer> {
        self.get(&format!("{SERVERS_PATH}/{id}")).await
    }

    pub async fn get_server_by_address(&self, address: &str) -> Option<GameServer> {
        self.get(&format!("{SERVERS_PATH}/address/{address}")).await
    }

    pub async fn get_clusters(&self, page: u32) -> Vec<Cluster> {
        self.list(CLUSTERS_PATH, page).await
    }

    pub async fn get_cluster_by_id(&self, id: &str) -> Option<Cluster> {
        self.get(&format!("{CLUSTERS_PATH}/{id}")).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Option<User> {
        self.get(&format!("{USERS_PATH}/{id}")).await
    }

    pub async fn get_user_by_uuid(&self, uuid: &str) -> Vec<User> {
        self.get_users_by("uuid", uuid).await
    }

    pub async fn get_user_by_name(&self, name: &str) -> Vec<User> {
        self.get_users_by("name", name).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Vec<User> {
        self.get_users_by("email", email).await
    }

    /// User search returns a list even for unique keys.
    async fn get_users_by(&self, key: &str, value: &str) -> Vec<User> {
        let request = Request::get(format!("{USERS_PATH}/")).query(key, value);
        self.send(request).await.unwrap_or_default()
    }

    pub async fn get_user_servers(&self, id: &str) -> Vec<GameServer> {
        self.get(&format!("{USERS_PATH}/{id}/servers"))
            .await
            .unwrap_or_default()
    }
}

fn is_numeric_id(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
