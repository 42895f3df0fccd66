// src/plugin.rs
use log::info;
use std::sync::Arc;
use tokio::task::JoinHandle;
use crate::config::ConfigHandle;
use crate::handlers::publish::Publisher;
use crate::handlers::snapshot::build_snapshot;
use crate::scheduler::Scheduler;
use crate::storage::GameState;

pub const MODULE_NAME: &str = "ServerStatus";
pub const MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Glue between the host's triggers and the snapshot/publish pipeline.
pub struct StatusPlugin<S> {
    state: Arc<S>,
    config: ConfigHandle,
    publisher: Publisher,
}

impl<S: GameState + Send + Sync + 'static> StatusPlugin<S> {
    pub fn new(state: Arc<S>, config: ConfigHandle) -> Arc<Self> {
        let publisher = Publisher::new(config.install_dir());
        Arc::new(Self { state, config, publisher })
    }

    /// Snapshots on the calling context, then hands the write to the
    /// blocking pool. Never waits for the write and never fails.
    pub fn trigger_publish(&self) -> JoinHandle<()> {
        let snapshot = build_snapshot(self.state.as_ref());
        self.publisher.dispatch(snapshot, self.config.output_path())
    }

    /// Registers the round-start hook and arms the first session timer.
    pub fn load(self: &Arc<Self>, scheduler: &dyn Scheduler) {
        let plugin = Arc::clone(self);
        scheduler.on_round_start(Arc::new(move || {
            plugin.trigger_publish();
        }));
        info!("{} {} loaded", MODULE_NAME, MODULE_VERSION);
        self.on_map_start(scheduler);
    }

    /// Timers die with the session, so every new map arms a fresh one with
    /// the interval as currently configured.
    pub fn on_map_start(self: &Arc<Self>, scheduler: &dyn Scheduler) {
        let period = self.config.update_interval();
        let plugin = Arc::clone(self);
        scheduler.add_repeating_timer(period, Arc::new(move || {
            plugin.trigger_publish();
        }));
        info!("{} publishing every {:?} to {}", MODULE_NAME, period, self.config.output_path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::server::ServerSnapshot;
    use crate::scheduler::{Callback, TokioScheduler};
    use crate::storage::memory::{MemoryGameState, PlayerFlags};
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingScheduler {
        timers: Mutex<Vec<(Duration, Callback)>>,
        round_hooks: Mutex<Vec<Callback>>,
    }

    impl Scheduler for RecordingScheduler {
        fn add_repeating_timer(&self, period: Duration, callback: Callback) {
            self.timers.lock().push((period, callback));
        }

        fn on_round_start(&self, callback: Callback) {
            self.round_hooks.lock().push(callback);
        }
    }

    fn setup(dir: &std::path::Path) -> (Arc<MemoryGameState>, ConfigHandle) {
        let config = Config {
            install_dir: dir.to_path_buf(),
            hostname: Some("Community #3".to_string()),
            ..Config::default()
        };
        let state = Arc::new(MemoryGameState::new(&config));
        (state, ConfigHandle::new(config))
    }

    #[tokio::test]
    async fn trigger_publish_writes_filtered_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, config) = setup(dir.path());
        state.connect(76561198000000001, "alice", PlayerFlags::default()).unwrap();
        state.connect(2, "BOT Ringo", PlayerFlags { bot: true, ..PlayerFlags::default() }).unwrap();
        state.set_pawn(76561198000000001, None);
        let plugin = StatusPlugin::new(state, config);

        plugin.trigger_publish().await.expect("publish task");

        let text = std::fs::read_to_string(dir.path().join("server_status/status.json")).expect("read");
        let snapshot: ServerSnapshot = serde_json::from_str(&text).expect("parse");
        assert_eq!(snapshot.server_name, "Community #3");
        assert_eq!(snapshot.player_count, 1);
        assert_eq!(snapshot.players[0].steam_id, "76561198000000001");
        assert_eq!(snapshot.players[0].score, 0);
    }

    #[tokio::test]
    async fn output_path_edits_apply_to_next_trigger() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, config) = setup(dir.path());
        let plugin = StatusPlugin::new(state, config.clone());

        config.set_status_output("web/status.json");
        plugin.trigger_publish().await.expect("publish task");

        assert!(dir.path().join("web/status.json").exists());
        assert!(!dir.path().join("server_status").exists());
    }

    #[tokio::test]
    async fn load_registers_hook_and_timer_with_current_interval() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, config) = setup(dir.path());
        let plugin = StatusPlugin::new(state, config.clone());
        let scheduler = RecordingScheduler::default();

        config.set_status_interval("-5");
        plugin.load(&scheduler);
        config.set_status_interval("10");
        plugin.on_map_start(&scheduler);

        let periods: Vec<_> = scheduler.timers.lock().iter().map(|(p, _)| *p).collect();
        assert_eq!(periods, [Duration::from_secs(30), Duration::from_secs(10)]);
        assert_eq!(scheduler.round_hooks.lock().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn round_start_hook_publishes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, config) = setup(dir.path());
        let plugin = StatusPlugin::new(state, config);
        let scheduler = RecordingScheduler::default();
        plugin.load(&scheduler);

        let hook = scheduler.round_hooks.lock()[0].clone();
        hook();

        let path = dir.path().join("server_status/status.json");
        for _ in 0..200 {
            if path.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let text = std::fs::read_to_string(&path).expect("status written by hook");
        assert!(serde_json::from_str::<ServerSnapshot>(&text).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn session_timer_writes_status_after_one_interval() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, config) = setup(dir.path());
        config.set_status_interval("5");
        let plugin = StatusPlugin::new(state, config);
        let scheduler = TokioScheduler::new();
        plugin.load(&scheduler);

        let path = dir.path().join("server_status/status.json");
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!path.exists());

        tokio::time::sleep(Duration::from_secs(2)).await;
        // The write itself runs on the blocking pool in real time.
        for _ in 0..500 {
            if path.exists() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let text = std::fs::read_to_string(&path).expect("status written by timer");
        let snapshot: ServerSnapshot = serde_json::from_str(&text).expect("parse");
        assert_eq!(snapshot.server_name, "Community #3");
        scheduler.end_session();
    }
}
