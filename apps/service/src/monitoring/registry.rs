use std::collections::HashMap;
use std::sync::RwLock;

use super::types::HostEntry;

/// Injected `host -> enabled` lookup and writer.
///
/// The engine only depends on this contract; how the map is persisted is the
/// consumer's business. Hosts with no recorded override are enabled.
pub trait OverrideStore: Send + Sync {
    fn is_enabled(&self, host: &str) -> bool;
    fn set_enabled(&self, host: &str, enabled: bool);
}

/// In-memory override map, the default store for the daemon and tests.
#[derive(Debug, Default)]
pub struct MemoryOverrides {
    map: RwLock<HashMap<String, bool>>,
}

impl MemoryOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from a persisted list of disabled host labels.
    pub fn with_disabled(hosts: &[String]) -> Self {
        let map = hosts.iter().map(|host| (host.clone(), false)).collect();
        Self { map: RwLock::new(map) }
    }
}

impl OverrideStore for MemoryOverrides {
    fn is_enabled(&self, host: &str) -> bool {
        self.map.read().expect("override map poisoned").get(host).copied().unwrap_or(true)
    }

    fn set_enabled(&self, host: &str, enabled: bool) {
        self.map.write().expect("override map poisoned").insert(host.to_string(), enabled);
    }
}

/// Display cluster for a host name: the last two dot-separated components,
/// or the whole name when it has fewer than two.
pub fn display_group(host_name: &str) -> String {
    let components: Vec<&str> = host_name.split('.').filter(|part| !part.is_empty()).collect();
    if components.len() >= 2 {
        components[components.len() - 2..].join(".")
    } else {
        host_name.to_string()
    }
}

/// Insert an entry, replacing any earlier entry with the same label in
/// place. Keeps first-seen order while letting the later occurrence win.
pub fn upsert_last_wins(entries: &mut Vec<HostEntry>, entry: HostEntry) {
    match entries.iter_mut().find(|existing| existing.host == entry.host) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

/// Merge parsed entries across files and finalize them for probing: apply
/// last-wins dedup by label, the enabled overrides, and the display group.
/// Pure host-list bookkeeping, no I/O.
pub fn merge(parsed: Vec<HostEntry>, overrides: &dyn OverrideStore) -> Vec<HostEntry> {
    let mut merged: Vec<HostEntry> = Vec::with_capacity(parsed.len());
    for entry in parsed {
        upsert_last_wins(&mut merged, entry);
    }

    for entry in &mut merged {
        entry.enabled = overrides.is_enabled(&entry.host);
        // Group is computed regardless of enabled state
        entry.group = display_group(&entry.host_name);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::types::DEFAULT_SSH_PORT;

    fn entry(host: &str, host_name: &str) -> HostEntry {
        HostEntry::new(host.to_string(), host_name.to_string(), None, DEFAULT_SSH_PORT)
    }

    #[test]
    fn group_is_last_two_components() {
        assert_eq!(display_group("db1.prod.example.com"), "example.com");
        assert_eq!(display_group("web1.example.com"), "example.com");
    }

    #[test]
    fn group_of_short_names_is_the_name_itself() {
        assert_eq!(display_group("localhost"), "localhost");
        assert_eq!(display_group(""), "");
    }

    #[test]
    fn merge_applies_overrides_and_groups() {
        let overrides = MemoryOverrides::with_disabled(&["backup".to_string()]);
        let merged =
            merge(vec![entry("web", "web.example.com"), entry("backup", "backup.local")], &overrides);

        assert_eq!(merged.len(), 2);
        assert!(merged[0].enabled);
        assert_eq!(merged[0].group, "example.com");
        assert!(!merged[1].enabled);
        assert_eq!(merged[1].group, "backup.local");
    }

    #[test]
    fn merge_dedups_across_files_last_wins() {
        let first = entry("web", "old.example.com");
        let second = entry("web", "new.example.com");
        let merged = merge(vec![first, second], &MemoryOverrides::new());

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].host_name, "new.example.com");
    }

    #[test]
    fn overrides_default_to_enabled() {
        let overrides = MemoryOverrides::new();
        assert!(overrides.is_enabled("anything"));

        overrides.set_enabled("anything", false);
        assert!(!overrides.is_enabled("anything"));

        overrides.set_enabled("anything", true);
        assert!(overrides.is_enabled("anything"));
    }
}
