// src/utils.rs
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum PublishError {
    Serialize(serde_json::Error),
    MissingFileName(PathBuf),
    CreateDir(PathBuf, io::Error),
    Write(PathBuf, io::Error),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize(e) => write!(f, "Failed to serialize status: {}", e),
            Self::MissingFileName(path) => write!(f, "Output path has no file name: {}", path.display()),
            Self::CreateDir(path, e) => write!(f, "Failed to create directory {}: {}", path.display(), e),
            Self::Write(path, e) => write!(f, "Failed to write {}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize(e) => Some(e),
            Self::CreateDir(_, e) | Self::Write(_, e) => Some(e),
            Self::MissingFileName(_) => None,
        }
    }
}

impl From<serde_json::Error> for PublishError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

/// Renders a session length as `HH:MM:SS`. Hours keep counting past 23.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };
    format!("{:02}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

/// Joins the configured path onto the install directory. An absolute
/// configured path replaces the base entirely.
pub fn resolve_output_path(install_dir: &Path, configured: &str) -> PathBuf {
    install_dir.join(configured)
}
