// src/handlers/publish.rs
use log::{debug, error};
use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use crate::models::server::ServerSnapshot;
use crate::utils::{resolve_output_path, PublishError};

const LOG_TAG: &str = "[ServerStatus]";

/// Writes snapshots to disk. Clones share one file lock, so overlapping
/// publishes never interleave inside the write region.
#[derive(Clone)]
pub struct Publisher {
    install_dir: PathBuf,
    file_lock: Arc<Mutex<()>>,
}

impl Publisher {
    pub fn new(install_dir: PathBuf) -> Self {
        Self {
            install_dir,
            file_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Serializes and writes one snapshot, replacing whatever the file held.
    pub fn publish(&self, snapshot: &ServerSnapshot, configured_path: &str) -> Result<PathBuf, PublishError> {
        let json = serde_json::to_string_pretty(snapshot)?;

        let target = resolve_output_path(&self.install_dir, configured_path);
        let file_name = match target.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return Err(PublishError::MissingFileName(target)),
        };
        let staging = target.with_file_name(format!(".{}.tmp", file_name));

        let _guard = self.file_lock.lock();

        if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.is_dir() {
                fs::create_dir_all(dir).map_err(|e| PublishError::CreateDir(dir.to_path_buf(), e))?;
            }
        }

        fs::write(&staging, json).map_err(|e| PublishError::Write(staging.clone(), e))?;
        fs::rename(&staging, &target).map_err(|e| PublishError::Write(target.clone(), e))?;

        Ok(target)
    }

    /// Runs `publish` on the blocking pool without making the caller wait.
    /// Every failure ends here as a log line; the returned handle never
    /// carries an error and may be dropped.
    pub fn dispatch(&self, snapshot: ServerSnapshot, configured_path: String) -> JoinHandle<()> {
        let publisher = self.clone();
        let task = tokio::task::spawn_blocking(move || {
            match publisher.publish(&snapshot, &configured_path) {
                Ok(path) => debug!(
                    "{} Wrote status for {} players to {}",
                    LOG_TAG,
                    snapshot.player_count,
                    path.display()
                ),
                Err(e) => error!("{} Failed to publish status: {}", LOG_TAG, e),
            }
        });

        tokio::spawn(async move {
            if let Err(e) = task.await {
                error!("{} Publish task aborted: {}", LOG_TAG, e);
            }
        })
    }
}
