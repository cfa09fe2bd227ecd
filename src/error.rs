//! Error types for `taskflow`.

use crate::tasks::ValidationError;

/// Errors that can occur in the task store and its surrounding plumbing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `SQLite` database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A template error occurred.
    #[error("Template error: {0}")]
    Template(String),

    /// Input was rejected by a store operation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
