//! Where tasklane keeps its files.
//!
//! | Purpose | Default (Linux) | Override |
//! |---------|-----------------|----------|
//! | Store | `~/.local/share/tasklane/` | `TASKLANE_DATA_DIR` |
//! | Logs | `~/.local/share/tasklane/logs/` | `TASKLANE_LOG_DIR` |

use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "TASKLANE_DATA_DIR";
pub const LOG_DIR_ENV: &str = "TASKLANE_LOG_DIR";

/// Used when the platform has no data directory.
const FALLBACK_DIR: &str = ".tasklane";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::resolve(|name| std::env::var_os(name).map(PathBuf::from))
    }

    /// Builds the config from `lookup`, which maps an environment variable name to its value.
    pub fn resolve(lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV).unwrap_or_else(default_data_dir);
        let log_dir = lookup(LOG_DIR_ENV).unwrap_or_else(|| data_dir.join("logs"));
        Self { data_dir, log_dir }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("tasklane"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
}
