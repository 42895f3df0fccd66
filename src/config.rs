use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use parking_lot::RwLock;

pub const DEFAULT_STATUS_PATH: &str = "server_status/status.json";
pub const DEFAULT_INTERVAL_SECS: f32 = 30.0;

#[derive(Debug, Clone)]
pub struct Config {
    // Base directory every output path is resolved against
    pub install_dir: PathBuf,

    // Console-editable settings, kept as raw strings like the console stores them
    pub status_output: String,
    pub status_interval: String,

    // Initial host state
    pub hostname: Option<String>,
    pub map_name: String,
    pub max_players: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("."),
            status_output: DEFAULT_STATUS_PATH.to_string(),
            status_interval: DEFAULT_INTERVAL_SECS.to_string(),
            hostname: None,
            map_name: "de_dust2".to_string(),
            max_players: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            install_dir: env::var("SV_INSTALL_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.install_dir),

            status_output: env::var("SV_STATUS_OUTPUT")
                .ok()
                .unwrap_or(defaults.status_output),

            status_interval: env::var("SV_STATUS_INTERVAL")
                .ok()
                .unwrap_or(defaults.status_interval),

            hostname: env::var("SV_HOSTNAME").ok(),

            map_name: env::var("SV_MAP")
                .ok()
                .unwrap_or(defaults.map_name),

            max_players: env::var("SV_MAX_PLAYERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_players),
        }
    }

    pub fn output_path(&self) -> &str {
        if self.status_output.trim().is_empty() {
            DEFAULT_STATUS_PATH
        } else {
            &self.status_output
        }
    }

    pub fn update_interval(&self) -> Duration {
        // Sub-nanosecond values round down to zero, which no timer accepts.
        Duration::try_from_secs_f32(parse_interval(&self.status_interval))
            .ok()
            .filter(|period| !period.is_zero())
            .unwrap_or(Duration::from_secs(DEFAULT_INTERVAL_SECS as u64))
    }
}

/// Anything that is not a finite, positive number of seconds means the default.
pub fn parse_interval(raw: &str) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => secs,
        _ => DEFAULT_INTERVAL_SECS,
    }
}

/// Shared, live-editable view of the settings. The trigger layer reads it
/// again every time a timer is armed.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<Config>>,
}

impl ConfigHandle {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn install_dir(&self) -> PathBuf {
        self.inner.read().install_dir.clone()
    }

    pub fn output_path(&self) -> String {
        self.inner.read().output_path().to_string()
    }

    pub fn update_interval(&self) -> Duration {
        self.inner.read().update_interval()
    }

    pub fn status_interval(&self) -> String {
        self.inner.read().status_interval.clone()
    }

    pub fn set_status_output(&self, value: &str) {
        self.inner.write().status_output = value.to_string();
    }

    pub fn set_status_interval(&self, value: &str) {
        self.inner.write().status_interval = value.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_intervals_fall_back_to_default() {
        for raw in ["-5", "abc", "0", "", "NaN", "inf", "-0.0"] {
            assert_eq!(parse_interval(raw), DEFAULT_INTERVAL_SECS, "input {:?}", raw);
        }
    }

    #[test]
    fn positive_intervals_are_kept() {
        assert_eq!(parse_interval("12.5"), 12.5);
        assert_eq!(parse_interval(" 5 "), 5.0);
    }

    #[test]
    fn default_interval_renders_as_thirty_seconds() {
        let config = Config::default();
        assert_eq!(config.update_interval(), Duration::from_secs(30));
    }

    #[test]
    fn oversized_interval_does_not_overflow() {
        let config = Config {
            status_interval: "1e38".to_string(),
            ..Config::default()
        };
        assert_eq!(config.update_interval(), Duration::from_secs(30));
    }

    #[test]
    fn interval_rounding_to_zero_uses_default() {
        for raw in ["1e-10", "1e-30"] {
            let config = Config {
                status_interval: raw.to_string(),
                ..Config::default()
            };
            assert_eq!(config.update_interval(), Duration::from_secs(30), "input {:?}", raw);
        }
    }

    #[test]
    fn empty_output_path_uses_default() {
        let handle = ConfigHandle::new(Config::default());
        handle.set_status_output("  ");
        assert_eq!(handle.output_path(), DEFAULT_STATUS_PATH);
        handle.set_status_output("web/live.json");
        assert_eq!(handle.output_path(), "web/live.json");
    }

    #[test]
    fn interval_edits_are_visible_through_every_clone() {
        let handle = ConfigHandle::new(Config::default());
        let other = handle.clone();
        other.set_status_interval("2");
        assert_eq!(handle.update_interval(), Duration::from_secs(2));
        other.set_status_interval("abc");
        assert_eq!(handle.update_interval(), Duration::from_secs(30));
        assert_eq!(handle.status_interval(), "abc");
    }
}
