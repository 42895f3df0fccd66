// src/models/player.rs

/// Per-round stats carried by a player's pawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PawnStats {
    pub score: i32,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
}

/// A connected participant as the host exposes it.
#[derive(Debug, Clone)]
pub struct PlayerController {
    pub valid: bool,
    pub bot: bool,
    pub hltv: bool,
    pub replay: bool,
    pub name: String,
    pub steam_id: u64,
    // None while the pawn is unbound (dead, between rounds, still loading)
    pub pawn: Option<PawnStats>,
    pub connected_time: f64,
}

impl PlayerController {
    pub fn is_valid_player(&self) -> bool {
        self.valid && !self.bot && !self.hltv && !self.replay
    }
}
