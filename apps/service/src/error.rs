use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

/// A configured config file could not be opened or read. Non-fatal: the
/// parser skips the file and keeps going with the others.
#[derive(Debug, Error)]
#[error("failed to read config file {}: {source}", .path.display())]
pub struct ConfigAccessError {
    pub path: PathBuf,
    #[source]
    pub source: IoError,
}

/// Failures around the daemon's own settings file. Fatal only at startup;
/// a running engine never returns these.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine a settings directory (no $XDG_CONFIG_HOME or home)")]
    SettingsPathUnavailable,
    #[error("failed to read settings from {}: {source}", .path.display())]
    Read { path: PathBuf, source: IoError },
    #[error("failed to parse settings at {}: {source}", .path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("failed to write settings to {}: {source}", .path.display())]
    Write { path: PathBuf, source: IoError },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
