//! Path utilities for determining data storage locations.
//!
//! Data lives in `$TASKFLOW_HOME` when that variable is set and non-empty,
//! otherwise in `~/.taskflow/`.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "TASKFLOW_HOME";

/// The base directory name under the user's home.
const DATA_DIR_NAME: &str = ".taskflow";

/// The key-value database filename.
pub const DATABASE_FILENAME: &str = "storage.sqlite3";

/// The configuration filename.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// The default log filename.
pub const LOG_FILENAME: &str = "taskflow.log";

/// Directory holding template overrides.
pub const TEMPLATES_DIR_NAME: &str = "templates";

/// Get the base data directory.
///
/// Returns `None` if `TASKFLOW_HOME` is unset and the home directory cannot
/// be determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(DATA_DIR_NAME)))
}

/// Default database path inside `dir`.
#[must_use]
pub fn db_path_in(dir: &Path) -> PathBuf {
    dir.join(DATABASE_FILENAME)
}

/// Config file path inside `dir`.
#[must_use]
pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}

/// Default log file path inside `dir`.
#[must_use]
pub fn log_path_in(dir: &Path) -> PathBuf {
    dir.join(LOG_FILENAME)
}
