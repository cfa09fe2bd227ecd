//! Tracing setup.
//!
//! Logs go to stderr by default, or to an append-only file when one is
//! configured. A log file over 1 MiB is moved to `*.log.old` at startup. The
//! filter comes from `TASKFLOW_LOG` and falls back to the configured level.
//!
//! The bridge binary speaks on stdout, so nothing here ever writes there.

use std::fs::{self, OpenOptions};
use std::panic;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "TASKFLOW_LOG";

/// Maximum log file size before rotation (1MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Longest filter directive accepted from the environment.
const MAX_FILTER_LEN: usize = 4096;

/// Build the filter from `TASKFLOW_LOG`, else `default_level`, else `warn`.
fn build_filter(default_level: &str) -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > MAX_FILTER_LEN {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .or_else(|| EnvFilter::try_new(default_level).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Move `path` aside if it has grown past the size limit.
fn rotate_if_large(path: &Path) {
    let too_big = fs::metadata(path).is_ok_and(|m| m.len() > MAX_LOG_SIZE);
    if too_big {
        let _ = fs::rename(path, path.with_extension("log.old"));
    }
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed.
///
/// # Errors
///
/// Returns an error if the log file or its directory cannot be created.
pub fn init(default_level: &str, log_file: Option<&Path>) -> std::io::Result<bool> {
    let filter = build_filter(default_level);

    let installed = if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        rotate_if_large(path);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(filter)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(version = crate::VERSION, "logging initialized");
    }
    Ok(installed)
}

/// Extract a readable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

/// Install a panic hook that reports panics through `tracing::error!`.
///
/// The previous hook still runs afterwards.
#[allow(deprecated)] // PanicInfo is deprecated but PanicHookInfo requires Rust 1.81+
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info: &panic::PanicInfo<'_>| {
        let location = info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()),
        );
        tracing::error!(%location, message = %panic_message(info.payload()), "panic");
        original_hook(info);
    }));
}
