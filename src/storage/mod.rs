pub mod memory;

use crate::models::player::PlayerController;

/// Read side of the host game the snapshot is built from.
///
/// Implementations are queried from the host's main context only; nothing here
/// is expected to be called from the publish worker.
pub trait GameState {
    fn map_name(&self) -> String;
    fn max_players(&self) -> i32;
    /// Looks up a console variable such as `hostname`.
    fn convar(&self, name: &str) -> Option<String>;
    fn players(&self) -> Vec<PlayerController>;
}
