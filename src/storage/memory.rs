// src/storage/memory.rs
use dashmap::DashMap;
use parking_lot::RwLock;
use std::time::Instant;
use crate::config::Config;
use crate::models::player::{PawnStats, PlayerController};
use crate::storage::GameState;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerFlags {
    pub bot: bool,
    pub hltv: bool,
    pub replay: bool,
}

struct Connection {
    name: String,
    flags: PlayerFlags,
    pawn: Option<PawnStats>,
    connected_at: Instant,
}

/// In-process stand-in for the game host: roster keyed by steam id plus the
/// handful of server fields the snapshot reads.
pub struct MemoryGameState {
    players: DashMap<u64, Connection>,
    map_name: RwLock<String>,
    hostname: RwLock<Option<String>>,
    max_players: i32,
}

impl MemoryGameState {
    pub fn new(config: &Config) -> Self {
        Self {
            players: DashMap::new(),
            map_name: RwLock::new(config.map_name.clone()),
            hostname: RwLock::new(config.hostname.clone()),
            max_players: config.max_players,
        }
    }

    pub fn connect(&self, steam_id: u64, name: &str, flags: PlayerFlags) -> Result<(), String> {
        let existing_bot = self.players.get(&steam_id).map(|r| r.value().flags.bot);
        if let Some(was_bot) = existing_bot {
            if was_bot != flags.bot {
                return Err(format!("Steam id {} is already taken", steam_id));
            }
            // Reconnect keeps the slot but restarts the session clock.
            self.players.remove(&steam_id);
        } else if self.players.len() >= self.max_players.max(0) as usize {
            return Err(format!("Server is full ({} slots)", self.max_players));
        }

        self.players.insert(steam_id, Connection {
            name: name.to_string(),
            flags,
            pawn: Some(PawnStats::default()),
            connected_at: Instant::now(),
        });
        Ok(())
    }

    pub fn disconnect(&self, steam_id: u64) -> bool {
        self.players.remove(&steam_id).is_some()
    }

    pub fn set_pawn(&self, steam_id: u64, pawn: Option<PawnStats>) -> bool {
        match self.players.get_mut(&steam_id) {
            Some(mut entry) => {
                entry.pawn = pawn;
                true
            }
            None => false,
        }
    }

    pub fn change_level(&self, map_name: &str) {
        *self.map_name.write() = map_name.to_string();
        // Pawns are rebuilt by the next round.
        for mut entry in self.players.iter_mut() {
            entry.pawn = None;
        }
    }

    pub fn set_hostname(&self, hostname: Option<String>) {
        *self.hostname.write() = hostname;
    }
}

impl GameState for MemoryGameState {
    fn map_name(&self) -> String {
        self.map_name.read().clone()
    }

    fn max_players(&self) -> i32 {
        self.max_players
    }

    fn convar(&self, name: &str) -> Option<String> {
        match name {
            "hostname" => self.hostname.read().clone(),
            _ => None,
        }
    }

    fn players(&self) -> Vec<PlayerController> {
        self.players
            .iter()
            .map(|r| {
                let conn = r.value();
                PlayerController {
                    valid: true,
                    bot: conn.flags.bot,
                    hltv: conn.flags.hltv,
                    replay: conn.flags.replay,
                    name: conn.name.clone(),
                    steam_id: *r.key(),
                    pawn: conn.pawn,
                    connected_time: conn.connected_at.elapsed().as_secs_f64(),
                }
            })
            .collect()
    }
}
