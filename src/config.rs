//! Configuration management for taskflow.
//!
//! Settings live in `config.yaml` inside the data directory. Every field has
//! a default, so a missing file or a partial one is fine.

use crate::error::Result;
use crate::paths;
use crate::tasks::DEFAULT_MAX_BULK_CREATE;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TaskflowConfig {
    /// Key-value database path. Relative paths resolve against the data
    /// directory; `None` means `storage.sqlite3` there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,

    /// Log file path. `None` logs to stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Default log filter, overridden by `TASKFLOW_LOG`.
    pub log_level: String,

    /// Upper bound on tasks created by one range request.
    pub max_bulk_create: usize,

    /// Theme used when none is stored.
    pub default_theme: Theme,
}

impl Default for TaskflowConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            log_file: None,
            log_level: "warn".to_string(),
            max_bulk_create: DEFAULT_MAX_BULK_CREATE,
            default_theme: Theme::Light,
        }
    }
}

impl TaskflowConfig {
    /// Load config from a data directory, using defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(data_dir: &Path) -> Result<Self> {
        let config_path = paths::config_path_in(data_dir);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, data_dir: &Path) -> Result<()> {
        let config_path = paths::config_path_in(data_dir);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// The database path, resolved against `data_dir`.
    #[must_use]
    pub fn resolved_storage_path(&self, data_dir: &Path) -> PathBuf {
        self.storage_path
            .as_ref()
            .map_or_else(|| paths::db_path_in(data_dir), |p| data_dir.join(p))
    }

    /// The log file path, resolved against `data_dir`, if file logging is on.
    #[must_use]
    pub fn resolved_log_file(&self, data_dir: &Path) -> Option<PathBuf> {
        self.log_file.as_ref().map(|p| data_dir.join(p))
    }
}

/// Ensure a config file exists in `data_dir`, writing defaults if not.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or saved.
pub fn ensure_config_in(data_dir: &Path) -> Result<TaskflowConfig> {
    if paths::config_path_in(data_dir).exists() {
        return TaskflowConfig::load_from(data_dir);
    }
    let config = TaskflowConfig::default();
    config.save_to(data_dir)?;
    tracing::info!(dir = %data_dir.display(), "wrote default config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = TaskflowConfig::load_from(dir.path()).unwrap();
        assert_eq!(config, TaskflowConfig::default());
        assert_eq!(config.max_bulk_create, 500);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = TaskflowConfig {
            storage_path: Some(PathBuf::from("custom.sqlite3")),
            log_file: Some(PathBuf::from("logs/taskflow.log")),
            log_level: "debug".to_string(),
            max_bulk_create: 50,
            default_theme: Theme::Ocean,
        };
        config.save_to(dir.path()).unwrap();

        let loaded = TaskflowConfig::load_from(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::config_path_in(dir.path()), "default_theme: forest\n").unwrap();

        let config = TaskflowConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.default_theme, Theme::Forest);
        assert_eq!(config.max_bulk_create, DEFAULT_MAX_BULK_CREATE);
    }

    #[test]
    fn test_empty_config_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::config_path_in(dir.path()), "\n").unwrap();
        assert_eq!(TaskflowConfig::load_from(dir.path()).unwrap(), TaskflowConfig::default());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(paths::config_path_in(dir.path()), "default_theme: plaid\n").unwrap();
        assert!(TaskflowConfig::load_from(dir.path()).is_err());

        std::fs::write(paths::config_path_in(dir.path()), "max_bulk_create: [1, 2\n").unwrap();
        assert!(TaskflowConfig::load_from(dir.path()).is_err());
    }

    #[test]
    fn test_resolved_paths() {
        let dir = Path::new("/data");
        let mut config = TaskflowConfig::default();
        assert_eq!(config.resolved_storage_path(dir), PathBuf::from("/data/storage.sqlite3"));
        assert_eq!(config.resolved_log_file(dir), None);

        config.storage_path = Some(PathBuf::from("/elsewhere/db.sqlite3"));
        config.log_file = Some(PathBuf::from("taskflow.log"));
        assert_eq!(config.resolved_storage_path(dir), PathBuf::from("/elsewhere/db.sqlite3"));
        assert_eq!(config.resolved_log_file(dir), Some(PathBuf::from("/data/taskflow.log")));
    }

    #[test]
    fn test_ensure_config_writes_defaults_once() {
        let dir = TempDir::new().unwrap();
        let created = ensure_config_in(dir.path()).unwrap();
        assert!(paths::config_path_in(dir.path()).exists());

        let mut changed = created;
        changed.max_bulk_create = 7;
        changed.save_to(dir.path()).unwrap();

        assert_eq!(ensure_config_in(dir.path()).unwrap().max_bulk_create, 7);
    }
}
