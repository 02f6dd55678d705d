use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::probe::Probe;
use super::registry::{self, OverrideStore};
use super::types::{HostEntry, OverlapPolicy, PollSnapshot};
use crate::ssh_config;

/// Orchestrates one poll cycle: parse the configured files, merge them
/// through the registry, probe every enabled host concurrently, aggregate,
/// and publish the resulting snapshot.
///
/// The engine is the single writer of the published snapshot; readers take
/// immutable clones through the watch channel and can never observe a
/// partially updated cycle.
pub struct ReachabilityEngine {
    config_files: Vec<PathBuf>,
    overrides: Arc<dyn OverrideStore>,
    probe: Arc<dyn Probe>,
    overlap: OverlapPolicy,
    snapshot_tx: watch::Sender<PollSnapshot>,
    cycle_guard: tokio::sync::Mutex<()>,
}

impl ReachabilityEngine {
    pub fn new(
        config_files: Vec<PathBuf>,
        overrides: Arc<dyn OverrideStore>,
        probe: Arc<dyn Probe>,
        overlap: OverlapPolicy,
    ) -> Self {
        let (snapshot_tx, _rx) = watch::channel(PollSnapshot::not_initialized());
        Self {
            config_files,
            overrides,
            probe,
            overlap,
            snapshot_tx,
            cycle_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Latest published snapshot.
    #[allow(dead_code)] // Pull-style read for consumers that do not subscribe
    pub fn snapshot(&self) -> PollSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Receiver that yields every newly published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Record an enabled/disabled override for a host label. Takes effect on
    /// the next cycle; no immediate re-probe of that host.
    #[allow(dead_code)] // Consumer-facing mutation, exercised in tests
    pub fn set_enabled(&self, host: &str, enabled: bool) {
        self.overrides.set_enabled(host, enabled);
    }

    /// Scheduler entry point: run one cycle under the configured overlap
    /// policy. `Skip` drops the tick when the previous cycle is still in
    /// flight; `Allow` detaches the cycle so ticks stay on schedule even
    /// when cycles overlap.
    pub async fn tick(self: Arc<Self>) {
        match self.overlap {
            OverlapPolicy::Allow => {
                tokio::spawn(async move {
                    self.run_cycle().await;
                });
            }
            OverlapPolicy::Skip => {
                let Ok(_guard) = self.cycle_guard.try_lock() else {
                    warn!("previous poll cycle still in flight, skipping tick");
                    return;
                };
                self.run_cycle().await;
            }
        }
    }

    /// One full poll cycle. Also the manual "poll now" operation: callers
    /// invoking it directly bypass the overlap guard.
    ///
    /// Never fails: unreadable files are skipped with a warning, an empty
    /// host list degrades to the placeholder entry, and probe failures of
    /// any kind resolve to offline.
    pub async fn run_cycle(&self) -> PollSnapshot {
        let (parsed, failures) = ssh_config::parse_files(&self.config_files);
        for failure in &failures {
            warn!(error = %failure, "skipping unreadable config file");
        }

        let mut hosts = if parsed.is_empty() {
            warn!(files = self.config_files.len(), "no hosts found in any config");
            vec![HostEntry::placeholder()]
        } else {
            registry::merge(parsed, self.overrides.as_ref())
        };

        // Fan out one probe per enabled host; the await-all barrier bounds
        // the cycle by the probe timeout, not the sum over hosts. Disabled
        // entries are skipped and stay offline.
        let results = join_all(hosts.iter().map(|entry| {
            let probe = Arc::clone(&self.probe);
            async move {
                if entry.enabled { probe.probe(&entry.host_name, entry.port).await } else { false }
            }
        }))
        .await;

        for (entry, online) in hosts.iter_mut().zip(results) {
            if entry.enabled {
                entry.online = online;
            }
        }

        let snapshot = PollSnapshot::complete(hosts);
        info!(status = %snapshot.status, hosts = snapshot.hosts.len(), "poll cycle complete");
        for entry in &snapshot.hosts {
            debug!(host = %entry.host, online = entry.online, enabled = entry.enabled, "host state");
        }

        // Single atomic hand-off; readers never see a torn snapshot
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}
