//! Precedence resolution for runtime settings.
//!
//! ## Data Directory Precedence (highest to lowest)
//!
//! 1. `--data-dir` CLI flag
//! 2. `LAUNCHAUTH_DATA_DIR` environment variable
//! 3. Platform user data directory (`dirs::data_dir()`)
//!
//! ## Launcher Directory Name Precedence (highest to lowest)
//!
//! 1. `SS14_LAUNCHER_APPDATA_NAME` environment variable (empty counts as unset)
//! 2. `launcher`

use std::ffi::OsString;
use std::path::PathBuf;

use crate::launcher::{DEFAULT_LAUNCHER_DIR, session_store_path};
use crate::{Error, Result};

/// Environment variable overriding the base data directory.
pub const DATA_DIR_ENV: &str = "LAUNCHAUTH_DATA_DIR";

/// Environment variable naming the launcher's directory under the data directory.
pub const LAUNCHER_DIR_ENV: &str = "SS14_LAUNCHER_APPDATA_NAME";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// CLI overrides for settings resolution.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Data directory override from CLI flag
    pub data_dir: Option<PathBuf>,
}

impl SettingsOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set data directory override.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }
}

/// Fully resolved settings with source tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base directory the launcher directory lives under
    pub data_dir: Resolved<PathBuf>,
    /// Name of the launcher's directory
    pub launcher_dir_name: Resolved<String>,
}

impl Settings {
    /// Path of the launcher session store.
    pub fn session_store_path(&self) -> PathBuf {
        session_store_path(&self.data_dir.value, &self.launcher_dir_name.value)
    }
}

/// Resolve settings from CLI overrides and the process environment.
pub fn resolve_settings(overrides: &SettingsOverrides) -> Result<Settings> {
    resolve_settings_with(overrides, |name| std::env::var_os(name), dirs::data_dir())
}

/// Resolve settings with an explicit environment lookup and platform default.
pub fn resolve_settings_with<F>(
    overrides: &SettingsOverrides,
    mut lookup: F,
    platform_data_dir: Option<PathBuf>,
) -> Result<Settings>
where
    F: FnMut(&str) -> Option<OsString>,
{
    let data_dir = if let Some(ref dir) = overrides.data_dir {
        Resolved::new(dir.clone(), ValueSource::CliFlag)
    } else if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        Resolved::new(PathBuf::from(dir), ValueSource::EnvVar(DATA_DIR_ENV.to_string()))
    } else if let Some(dir) = platform_data_dir {
        Resolved::new(dir, ValueSource::Default)
    } else {
        return Err(Error::NoDataDir);
    };

    let launcher_dir_name = match lookup(LAUNCHER_DIR_ENV).filter(|v| !v.is_empty()) {
        Some(name) => Resolved::new(
            name.to_string_lossy().into_owned(),
            ValueSource::EnvVar(LAUNCHER_DIR_ENV.to_string()),
        ),
        None => Resolved::new(DEFAULT_LAUNCHER_DIR.to_string(), ValueSource::Default),
    };

    Ok(Settings {
        data_dir,
        launcher_dir_name,
    })
}
