// src/handlers/snapshot.rs
use log::debug;
use crate::models::player::PlayerController;
use crate::models::server::{PlayerRecord, ServerSnapshot};
use crate::storage::GameState;
use crate::utils::format_duration;

pub const UNKNOWN_SERVER_NAME: &str = "Unknown";

/// Captures the current server state. Must run on the host's main context.
pub fn build_snapshot<S: GameState + ?Sized>(state: &S) -> ServerSnapshot {
    // One filtering pass feeds both the list and the count.
    let players: Vec<PlayerRecord> = state
        .players()
        .iter()
        .filter(|p| p.is_valid_player())
        .map(player_record)
        .collect();

    let snapshot = ServerSnapshot {
        map: state.map_name(),
        player_count: players.len() as i32,
        max_players: state.max_players(),
        server_name: state
            .convar("hostname")
            .unwrap_or_else(|| UNKNOWN_SERVER_NAME.to_string()),
        players,
    };

    debug!(
        "Built snapshot for {} with {}/{} players",
        snapshot.map, snapshot.player_count, snapshot.max_players
    );
    snapshot
}

fn player_record(player: &PlayerController) -> PlayerRecord {
    let stats = player.pawn.unwrap_or_default();
    PlayerRecord {
        name: player.name.clone(),
        steam_id: player.steam_id.to_string(),
        score: stats.score,
        kills: stats.kills,
        deaths: stats.deaths,
        assists: stats.assists,
        connected_seconds: player.connected_time,
        connected_formatted: format_duration(player.connected_time),
    }
}
