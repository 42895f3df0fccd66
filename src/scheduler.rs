// src/scheduler.rs
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// The host's event and timer facility, as far as the plugin needs it.
pub trait Scheduler {
    /// Repeats `callback` every `period` until the current session ends.
    fn add_repeating_timer(&self, period: Duration, callback: Callback);
    /// Calls `callback` once for every round start, across sessions.
    fn on_round_start(&self, callback: Callback);
}

#[derive(Default)]
pub struct TokioScheduler {
    round_start: Mutex<Vec<Callback>>,
    session_timers: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire_round_start(&self) {
        // Clone out so a hook may register further hooks without deadlocking.
        let hooks: Vec<Callback> = self.round_start.lock().clone();
        debug!("Round start, notifying {} hooks", hooks.len());
        for hook in hooks {
            hook();
        }
    }

    /// Map change: every timer armed during this session stops.
    pub fn end_session(&self) {
        let timers: Vec<JoinHandle<()>> = self.session_timers.lock().drain(..).collect();
        debug!("Session ended, stopping {} timers", timers.len());
        for timer in timers {
            timer.abort();
        }
    }

    pub fn active_timers(&self) -> usize {
        let mut timers = self.session_timers.lock();
        timers.retain(|t| !t.is_finished());
        timers.len()
    }
}

impl Scheduler for TokioScheduler {
    fn add_repeating_timer(&self, period: Duration, callback: Callback) {
        debug!("Arming repeating timer every {:?}", period);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                callback();
            }
        });
        self.session_timers.lock().push(handle);
    }

    fn on_round_start(&self, callback: Callback) {
        self.round_start.lock().push(callback);
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.end_session();
    }
}
