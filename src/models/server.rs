// src/models/server.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    #[serde(rename = "steamId")]
    pub steam_id: String,
    pub score: i32,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    #[serde(rename = "durationSeconds")]
    pub connected_seconds: f64,
    #[serde(rename = "durationFormatted")]
    pub connected_formatted: String,
}

/// One capture of the server, rebuilt from scratch on every trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    pub map: String,
    #[serde(rename = "players")]
    pub player_count: i32,
    #[serde(rename = "maxPlayers")]
    pub max_players: i32,
    #[serde(rename = "serverName")]
    pub server_name: String,
    #[serde(rename = "playerList")]
    pub players: Vec<PlayerRecord>,
}
