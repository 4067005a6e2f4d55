//! @dose
//! purpose: Configuration file parsing for launch's config.toml. Holds the helper
//!     commands used by the freedesktop backend, the standard-input temp file settings,
//!     and extra application directories for the registry.
//!
//! when-editing:
//!     - !Config is loaded once at startup and passed through the call chain
//!     - !TMPDIR always wins over the configured temp_dir
//!     - Every key is optional; serde(default) fills the rest
//!
//! invariants:
//!     - Config::load returns the default config if the file doesn't exist
//!     - A malformed file is reported as a warning, never as a fatal error
//!
//! gotchas:
//!     - LAUNCH_CONFIG points at an alternate file (used by the end-to-end tests)
//!     - grace_secs = 0 removes the temp file right after dispatch

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "LAUNCH_CONFIG";

const DEFAULT_TEMP_DIR: &str = "/tmp";

/// Main configuration structure matching config.toml
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory for the standard-input temp file when TMPDIR is unset
    pub temp_dir: Option<PathBuf>,

    /// Command that opens an item with its default handler
    pub opener: String,

    /// Command that prints a document
    pub print_command: String,

    /// Standard-input temp file handling
    pub stdin: StdinConfig,

    /// Application registry settings
    pub registry: RegistryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_dir: None,
            opener: "xdg-open".to_string(),
            print_command: "lp".to_string(),
            stdin: StdinConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

/// Standard-input temp file configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StdinConfig {
    /// Seconds to keep the temp file after launching, so the application can open it
    pub grace_secs: u64,

    /// Detach from the terminal while waiting to remove the temp file
    pub detach: bool,
}

impl Default for StdinConfig {
    fn default() -> Self {
        Self {
            grace_secs: 60,
            detach: true,
        }
    }
}

impl StdinConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }
}

/// Application registry configuration
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Additional directories searched for desktop entries, after the XDG ones
    pub extra_dirs: Vec<PathBuf>,
}

impl Config {
    /// Load from $LAUNCH_CONFIG, or config.toml in the user's launch config directory
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        match env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::config_dir().map(|dir| dir.join("launch").join("config.toml")),
        }
    }

    pub fn load_from(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", config_path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", config_path.display(), e);
                Self::default()
            }
        }
    }

    /// Directory for the standard-input temp file: TMPDIR, then temp_dir, then /tmp
    pub fn temp_dir(&self) -> PathBuf {
        Self::resolve_temp_dir(env::var_os("TMPDIR").map(PathBuf::from), self.temp_dir.as_deref())
    }

    fn resolve_temp_dir(tmpdir: Option<PathBuf>, configured: Option<&Path>) -> PathBuf {
        tmpdir
            .filter(|dir| !dir.as_os_str().is_empty())
            .or_else(|| configured.map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMP_DIR))
    }
}
