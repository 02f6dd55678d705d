use std::{env, fmt, fs, path};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::monitoring::registry::MemoryOverrides;
use crate::monitoring::types::{OverlapPolicy, RefreshInterval};

/// Persisted daemon settings: everything the engine needs and nothing more.
#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    /// SSH-client config files to ingest, in order
    #[serde(default = "default_config_files")]
    pub config_files: Vec<path::PathBuf>,

    /// Index into the fixed refresh set {5s, 10s, 1m, 5m}
    #[serde(default = "default_frequency_index")]
    pub frequency_index: usize,

    /// Per-probe connection deadline in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// What a scheduler tick does while a cycle is still running
    #[serde(default)]
    pub overlap: OverlapPolicy,

    /// Host labels whose entries start disabled (persisted override map)
    #[serde(default)]
    pub disabled_hosts: Vec<String>,
}

fn default_config_files() -> Vec<path::PathBuf> {
    match env::home_dir() {
        Some(home) => vec![home.join(".ssh/config")],
        None => Vec::new(),
    }
}

fn default_frequency_index() -> usize {
    1 // 10s
}

fn default_probe_timeout_secs() -> u64 {
    2
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default settings path ($XDG_CONFIG_HOME/sshpulse/config.toml or
/// $HOME/.config/...)
fn default_settings_path() -> Result<path::PathBuf, SettingsError> {
    let base = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(SettingsError::SettingsPathUnavailable);
    };

    Ok(base.join("sshpulse/config.toml"))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_files: default_config_files(),
            frequency_index: default_frequency_index(),
            probe_timeout_secs: default_probe_timeout_secs(),
            overlap: OverlapPolicy::default(),
            disabled_hosts: Vec::new(),
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current Settings:")?;
        for file in &self.config_files {
            writeln!(f, "  Config File: {}", file.display())?;
        }
        writeln!(f, "  Refresh: every {}", self.refresh_interval().label())?;
        writeln!(f, "  Probe Timeout: {}s", self.probe_timeout_secs)?;
        writeln!(f, "  Overlap Policy: {:?}", self.overlap)?;
        for host in &self.disabled_hosts {
            writeln!(f, "  Disabled Host: {host}")?;
        }
        Ok(())
    }
}

impl Settings {
    /// Load settings from a file, writing defaults first when absent.
    ///
    /// With no explicit path this uses ~/.config/sshpulse/config.toml (or the
    /// XDG equivalent), creating it on first run so users have something to
    /// edit.
    pub fn from_config(
        optional_path: Option<impl AsRef<path::Path>>,
    ) -> Result<Self, SettingsError> {
        let settings_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_settings_path()?
        };

        if settings_path.exists() {
            let raw = fs::read_to_string(&settings_path)
                .map_err(|source| SettingsError::Read { path: settings_path.clone(), source })?;
            toml::from_str(&raw)
                .map_err(|source| SettingsError::Parse { path: settings_path, source })
        } else {
            let settings = Self::default();
            settings.write_config(&settings_path)?;
            Ok(settings)
        }
    }

    /// Serialize and write the settings back to a file.
    pub fn write_config(&self, path: &path::Path) -> Result<(), SettingsError> {
        let serialized = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| SettingsError::Write { path: path.to_path_buf(), source })?;
        }

        fs::write(path, serialized)
            .map_err(|source| SettingsError::Write { path: path.to_path_buf(), source })
    }

    pub fn refresh_interval(&self) -> RefreshInterval {
        RefreshInterval::from_index(self.frequency_index)
    }

    pub fn probe_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.probe_timeout_secs)
    }

    /// Seed the engine's override store from the persisted disabled list.
    pub fn initial_overrides(&self) -> MemoryOverrides {
        MemoryOverrides::with_disabled(&self.disabled_hosts)
    }
}
