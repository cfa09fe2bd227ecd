//! # `taskflow`
//!
//! A task collection with list and board projections, local key-value
//! persistence and a small set of named commands for external actors.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod persistence;
pub mod report;
pub mod storage;
pub mod tasks;
pub mod templates;
pub mod testing;
pub mod theme;
pub mod traits;
pub mod workspace;

#[cfg(feature = "cli")]
pub mod cli;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
