//! API resource models
//!
//! Field names follow the API's snake_case wire format. Almost everything is
//! optional: the API omits or nulls fields depending on visibility, and a
//! missing field should not make a whole listing undecodable.

use serde::{Deserialize, Serialize};

/// Kind of account behind a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    User,
    Bot,
    Org,
}

/// Reported state of a game server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    Offline,
    Online,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A game published on Tribufu (served from `/v1/packages`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Game {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub game_port: Option<u16>,
    pub query_port: Option<u16>,
    pub rcon_port: Option<u16>,
    pub server_count: Option<u64>,
    pub steam_app_id: Option<u64>,
    pub steam_server_app_id: Option<u64>,
    pub enable_servers: Option<bool>,
    pub icon_url: Option<String>,
    pub banner_url: Option<String>,
    pub capsule_image_url: Option<String>,
    pub library_image_url: Option<String>,
    pub slug: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameServer {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub game_port: Option<u16>,
    pub query_port: Option<u16>,
    pub game_id: Option<String>,
    pub game_icon_url: Option<String>,
    pub version: Option<String>,
    pub featured: Option<bool>,
    pub cluster_id: Option<String>,
    pub website_url: Option<String>,
    pub banner_url: Option<String>,
    pub owner_id: Option<String>,
    pub uptime: Option<f64>,
    pub status: ServerStatus,
    pub ping: Option<u32>,
    pub map: Option<String>,
    pub used_slots: Option<u32>,
    pub max_slots: Option<u32>,
    pub motd: Option<String>,
    pub players: Option<String>,
    pub last_online: Option<String>,
    pub country: Option<String>,
    pub steam: Option<bool>,
    pub discord_server_id: Option<String>,
    pub youtube_video_url: Option<String>,
    pub tags: Option<String>,
    pub comment_count: Option<u64>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

impl GameServer {
    /// `address:game_port` when both are known.
    pub fn endpoint(&self) -> Option<String> {
        match (&self.address, self.game_port) {
            (Some(address), Some(port)) => Some(format!("{address}:{port}")),
            _ => None,
        }
    }
}

/// Compact profile embedded in other resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniProfile {
    pub id: String,
    #[serde(default)]
    pub uuid: Option<String>,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<AccountType>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// A group of game servers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub package_id: Option<String>,
    pub website_url: Option<String>,
    pub banner_url: Option<String>,
    pub owner_id: Option<String>,
    pub owner: Option<MiniProfile>,
    pub discord_server_id: Option<String>,
    pub youtube_video_url: Option<String>,
    pub tags: Option<String>,
    pub comment_count: Option<u64>,
    pub server_count: Option<u64>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub uuid: Option<String>,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: Option<AccountType>,
    #[serde(default)]
    pub public_flags: Option<u64>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub experience: Option<f64>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub last_online: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}
