//! Testing utilities.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.

use crate::traits::Clock;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// A manually driven clock.
///
/// Clones share the same instant, so a test can keep one handle and move
/// time forward after handing a boxed clone to a store.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    /// A clock stopped at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Rc::new(Cell::new(now)) }
    }

    /// A clock stopped at `millis` milliseconds after the Unix epoch.
    #[must_use]
    pub fn at_millis(millis: i64) -> Self {
        Self::new(Utc.timestamp_millis_opt(millis).single().unwrap_or_default())
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// A boxed handle sharing this clock's instant.
    #[must_use]
    pub fn boxed(&self) -> Box<dyn Clock> {
        Box::new(self.clone())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
