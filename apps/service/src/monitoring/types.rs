use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host label substituted when no config file yields a single usable entry.
pub const PLACEHOLDER_HOST: &str = "No hosts found in any config";

/// Default port for SSH targets that do not specify one.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// One configured remote target with connection parameters and the
/// reachability state observed by the most recent poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    /// Config alias, unique key for enabled/disabled override lookups
    pub host: String,

    /// Actual DNS name or IP to connect to (falls back to `host`)
    pub host_name: String,

    /// Login user from the config, informational only
    pub user: Option<String>,

    /// Target port, 22 unless the config says otherwise
    pub port: u16,

    /// User-controlled; disabled hosts are never probed
    pub enabled: bool,

    /// Result of the most recent probe; false until one completes
    pub online: bool,

    /// Display cluster derived from `host_name`, not part of identity
    pub group: String,
}

impl HostEntry {
    pub fn new(host: String, host_name: String, user: Option<String>, port: u16) -> Self {
        Self { host, host_name, user, port, enabled: true, online: false, group: String::new() }
    }

    /// The single well-defined entry published when zero hosts were parsed.
    pub fn placeholder() -> Self {
        Self {
            host: PLACEHOLDER_HOST.to_string(),
            host_name: String::new(),
            user: None,
            port: 0,
            enabled: false,
            online: false,
            group: String::new(),
        }
    }
}

/// Aggregate reachability across all enabled hosts in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalStatus {
    /// No poll cycle has ever completed
    NotInitialized,
    AllOnline,
    SomeOnline,
    /// Every enabled host offline, or nothing enabled at all
    AllOffline,
}

impl GlobalStatus {
    /// Classify a host list. Disabled entries never take part; an empty
    /// enabled subset counts as the vacuous all-offline case.
    pub fn aggregate(entries: &[HostEntry]) -> Self {
        let enabled: Vec<&HostEntry> = entries.iter().filter(|entry| entry.enabled).collect();

        if enabled.is_empty() {
            GlobalStatus::AllOffline
        } else if enabled.iter().all(|entry| entry.online) {
            GlobalStatus::AllOnline
        } else if enabled.iter().all(|entry| !entry.online) {
            GlobalStatus::AllOffline
        } else {
            GlobalStatus::SomeOnline
        }
    }
}

impl std::fmt::Display for GlobalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobalStatus::NotInitialized => write!(f, "not initialized"),
            GlobalStatus::AllOnline => write!(f, "all online"),
            GlobalStatus::SomeOnline => write!(f, "some online"),
            GlobalStatus::AllOffline => write!(f, "all offline"),
        }
    }
}

/// Immutable result of one completed poll cycle. The engine replaces the
/// published snapshot wholesale; it is never mutated after publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollSnapshot {
    /// Hosts in config order with their observed state
    pub hosts: Vec<HostEntry>,

    /// When the cycle finished; `None` only for the pre-first-cycle value
    pub completed_at: Option<DateTime<Utc>>,

    /// Aggregate over the enabled subset of `hosts`
    pub status: GlobalStatus,
}

impl PollSnapshot {
    /// The value readers see before any cycle has run.
    pub fn not_initialized() -> Self {
        Self { hosts: Vec::new(), completed_at: None, status: GlobalStatus::NotInitialized }
    }

    /// Seal a finished cycle: derive the global status and stamp completion.
    pub fn complete(hosts: Vec<HostEntry>) -> Self {
        let status = GlobalStatus::aggregate(&hosts);
        Self { hosts, completed_at: Some(Utc::now()), status }
    }
}

/// Refresh period selectable by the user, addressed by a persisted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshInterval {
    FiveSeconds,
    TenSeconds,
    OneMinute,
    FiveMinutes,
}

impl RefreshInterval {
    /// Map a persisted index onto the fixed set; anything out of range
    /// falls back to the 10s default.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => RefreshInterval::FiveSeconds,
            1 => RefreshInterval::TenSeconds,
            2 => RefreshInterval::OneMinute,
            3 => RefreshInterval::FiveMinutes,
            _ => RefreshInterval::TenSeconds,
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            RefreshInterval::FiveSeconds => Duration::from_secs(5),
            RefreshInterval::TenSeconds => Duration::from_secs(10),
            RefreshInterval::OneMinute => Duration::from_secs(60),
            RefreshInterval::FiveMinutes => Duration::from_secs(300),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RefreshInterval::FiveSeconds => "5s",
            RefreshInterval::TenSeconds => "10s",
            RefreshInterval::OneMinute => "1m",
            RefreshInterval::FiveMinutes => "5m",
        }
    }
}

/// What a scheduler tick does when the previous cycle is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop the colliding tick; at most one cycle runs at a time
    #[default]
    Skip,
    /// Let cycles overlap, as the original menu-bar tool did
    Allow,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(host: &str, enabled: bool, online: bool) -> HostEntry {
        let mut entry = HostEntry::new(host.to_string(), host.to_string(), None, DEFAULT_SSH_PORT);
        entry.enabled = enabled;
        entry.online = online;
        entry
    }

    #[test]
    fn aggregate_all_online() {
        let hosts = [entry("a", true, true), entry("b", true, true)];
        assert_eq!(GlobalStatus::aggregate(&hosts), GlobalStatus::AllOnline);
    }

    #[test]
    fn aggregate_mixed() {
        let hosts = [entry("a", true, true), entry("b", true, false)];
        assert_eq!(GlobalStatus::aggregate(&hosts), GlobalStatus::SomeOnline);
    }

    #[test]
    fn aggregate_all_offline() {
        let hosts = [entry("a", true, false), entry("b", true, false)];
        assert_eq!(GlobalStatus::aggregate(&hosts), GlobalStatus::AllOffline);
    }

    #[test]
    fn aggregate_empty_enabled_subset_is_all_offline() {
        assert_eq!(GlobalStatus::aggregate(&[]), GlobalStatus::AllOffline);

        let disabled_only = [entry("a", false, false)];
        assert_eq!(GlobalStatus::aggregate(&disabled_only), GlobalStatus::AllOffline);
    }

    #[test]
    fn aggregate_ignores_disabled_hosts() {
        // The disabled offline host must not drag the status down
        let hosts = [entry("a", true, true), entry("b", false, false)];
        assert_eq!(GlobalStatus::aggregate(&hosts), GlobalStatus::AllOnline);
    }

    #[test]
    fn refresh_interval_index_round_trip() {
        assert_eq!(RefreshInterval::from_index(0).duration(), Duration::from_secs(5));
        assert_eq!(RefreshInterval::from_index(2).duration(), Duration::from_secs(60));
        assert_eq!(RefreshInterval::from_index(3).label(), "5m");
        // Out-of-range index falls back to the default
        assert_eq!(RefreshInterval::from_index(17), RefreshInterval::TenSeconds);
    }

    #[test]
    fn placeholder_is_disabled_and_offline() {
        let placeholder = HostEntry::placeholder();
        assert!(!placeholder.enabled);
        assert!(!placeholder.online);
        assert_eq!(placeholder.host, PLACEHOLDER_HOST);
    }
}
