use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use super::engine::ReachabilityEngine;

/// Repeating trigger that drives the engine. Each tick runs one poll cycle
/// through the engine's overlap policy; the first tick fires immediately.
pub struct PollScheduler {
    engine: Arc<ReachabilityEngine>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl PollScheduler {
    pub fn new(engine: Arc<ReachabilityEngine>) -> Self {
        Self { engine, handle: None }
    }

    /// Begin firing every `period`. Replaces any previously installed timer.
    pub fn start(&mut self, period: Duration) {
        self.stop();
        info!(period = ?period, "starting poll scheduler");

        let engine = Arc::clone(&self.engine);
        self.handle = Some(tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                Arc::clone(&engine).tick().await;
            }
        }));
    }

    /// Atomically swap in a new period: the old timer is cancelled before
    /// the new one is installed, and the replacement fires right away.
    #[allow(dead_code)] // Consumer-facing interval change, exercised in tests
    pub fn reconfigure(&mut self, period: Duration) {
        info!(period = ?period, "reconfiguring poll scheduler");
        self.start(period);
    }

    /// Halt firing. Idempotent; a cycle already handed to the engine under
    /// `OverlapPolicy::Allow` finishes on its own.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
