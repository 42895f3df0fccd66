// src/console.rs
use log::{info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use crate::config::ConfigHandle;
use crate::models::player::PawnStats;
use crate::plugin::StatusPlugin;
use crate::scheduler::TokioScheduler;
use crate::storage::memory::{MemoryGameState, PlayerFlags};
use crate::storage::GameState;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StatusOutput(Option<String>),
    StatusInterval(Option<String>),
    Hostname(Option<String>),
    ChangeLevel(String),
    RoundStart,
    Connect { name: String, steam_id: u64 },
    BotAdd(String),
    Disconnect(u64),
    Stats { steam_id: u64, stats: PawnStats },
    Publish,
    Quit,
}

/// Parses one console line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let command = match name {
        "sv_status_output" => Command::StatusOutput(arg),
        "sv_status_interval" => Command::StatusInterval(arg),
        "hostname" => Command::Hostname(arg),
        "changelevel" => Command::ChangeLevel(arg.ok_or("Usage: changelevel <map>")?),
        "round_start" => Command::RoundStart,
        "connect" => {
            let (player, id) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or("Usage: connect <name> <steamid>")?;
            let steam_id = id
                .parse()
                .map_err(|_| format!("Invalid steam id: {}", id))?;
            Command::Connect { name: player.trim().to_string(), steam_id }
        }
        "bot_add" => Command::BotAdd(arg.unwrap_or_else(|| "BOT".to_string())),
        "disconnect" => {
            let id = arg.ok_or("Usage: disconnect <steamid>")?;
            Command::Disconnect(id.parse().map_err(|_| format!("Invalid steam id: {}", id))?)
        }
        "stats" => {
            let usage = "Usage: stats <steamid> <score> <kills> <deaths> <assists>";
            let fields: Vec<&str> = rest.split_whitespace().collect();
            if fields.len() != 5 {
                return Err(usage.to_string());
            }
            let steam_id = fields[0].parse().map_err(|_| usage.to_string())?;
            let mut values = [0i32; 4];
            for (value, raw) in values.iter_mut().zip(&fields[1..]) {
                *value = raw.parse().map_err(|_| usage.to_string())?;
            }
            let [score, kills, deaths, assists] = values;
            Command::Stats { steam_id, stats: PawnStats { score, kills, deaths, assists } }
        }
        "publish" => Command::Publish,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(Some(command))
}

// Bots live above every real steam64 id (those stay below 2^60).
const BOT_ID_BASE: u64 = 1 << 62;

/// The pieces a running host owns, driven by console commands.
pub struct Host {
    pub state: Arc<MemoryGameState>,
    pub config: ConfigHandle,
    pub scheduler: TokioScheduler,
    pub plugin: Arc<StatusPlugin<MemoryGameState>>,
    next_bot_id: AtomicU64,
}

impl Host {
    pub fn new(state: Arc<MemoryGameState>, config: ConfigHandle) -> Self {
        let plugin = StatusPlugin::new(state.clone(), config.clone());
        Self {
            state,
            config,
            scheduler: TokioScheduler::new(),
            plugin,
            next_bot_id: AtomicU64::new(BOT_ID_BASE),
        }
    }

    pub fn start(&self) {
        self.plugin.load(&self.scheduler);
    }

    /// Returns false once the host should shut down.
    pub fn execute(&self, command: Command) -> bool {
        match command {
            Command::StatusOutput(None) => println!("sv_status_output = \"{}\"", self.config.output_path()),
            Command::StatusOutput(Some(path)) => self.config.set_status_output(&path),
            Command::StatusInterval(None) => println!("sv_status_interval = \"{}\"", self.config.status_interval()),
            Command::StatusInterval(Some(secs)) => self.config.set_status_interval(&secs),
            Command::Hostname(None) => println!(
                "hostname = \"{}\"",
                self.state.convar("hostname").unwrap_or_default()
            ),
            Command::Hostname(Some(name)) => self.state.set_hostname(Some(name)),
            Command::ChangeLevel(map) => {
                info!("Changing level to {}", map);
                self.scheduler.end_session();
                self.state.change_level(&map);
                self.plugin.on_map_start(&self.scheduler);
            }
            Command::RoundStart => self.scheduler.fire_round_start(),
            Command::Connect { name, steam_id } => {
                if let Err(e) = self.state.connect(steam_id, &name, PlayerFlags::default()) {
                    warn!("Rejected {}: {}", name, e);
                }
            }
            Command::BotAdd(name) => {
                let id = self.next_bot_id.fetch_add(1, Ordering::Relaxed);
                let flags = PlayerFlags { bot: true, ..PlayerFlags::default() };
                if let Err(e) = self.state.connect(id, &name, flags) {
                    warn!("Could not add bot {}: {}", name, e);
                }
            }
            Command::Disconnect(steam_id) => {
                if !self.state.disconnect(steam_id) {
                    println!("No player with steam id {}", steam_id);
                }
            }
            Command::Stats { steam_id, stats } => {
                if !self.state.set_pawn(steam_id, Some(stats)) {
                    println!("No player with steam id {}", steam_id);
                }
            }
            Command::Publish => {
                self.plugin.trigger_publish();
            }
            Command::Quit => return false,
        }
        true
    }
}
