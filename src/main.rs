// src/main.rs
mod config;
mod console;
mod handlers;
mod models;
mod plugin;
mod scheduler;
mod storage;
mod utils;

use std::sync::Arc;
use env_logger::Env;
use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use crate::config::{Config, ConfigHandle};
use crate::console::{parse_command, Host};
use crate::storage::memory::MemoryGameState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    dotenv::dotenv().ok();
    let config = Config::from_env();

    info!(
        "Starting {} on {} ({} slots), install dir {}",
        plugin::MODULE_NAME,
        config.map_name,
        config.max_players,
        config.install_dir.display()
    );

    let state = Arc::new(MemoryGameState::new(&config));
    let host = Host::new(state, ConfigHandle::new(config));
    host.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line,
                    None => break,
                };
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if !host.execute(command) {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => error!("{}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Shutting down, stopping {} timers", host.scheduler.active_timers());
    host.scheduler.end_session();
    Ok(())
}
