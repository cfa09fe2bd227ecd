//! Core traits for testability and abstraction.

use crate::error::Result;
use chrono::{DateTime, SubsecRound, Utc};

/// A text key-value store, the local-storage seam.
///
/// Values are opaque text blobs; callers own their encoding.
pub trait KeyValueStore: std::fmt::Debug {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Source of the current time.
///
/// This trait abstracts the wall clock so timestamps are deterministic in tests.
pub trait Clock: std::fmt::Debug {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, truncated to millisecond precision.
///
/// Persisted timestamps carry milliseconds, so anything finer would not
/// survive a save/load round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_system_clock_has_millisecond_precision() {
        let now = SystemClock.now();
        assert_eq!(now.nanosecond() % 1_000_000, 0);
    }
}
