//! Time source for the catalog.
//!
//! Dates are calendar dates in UTC. Due dates, overdue sweeps and record ids
//! all read the clock through [`Clock`] so that tests and reproducible runs
//! can pin "today".

use std::sync::{Arc, Mutex, PoisonError};
use time::{Date, Duration, OffsetDateTime};

pub type ClockHandle = Arc<dyn Clock>;

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    fn today(&self) -> Date {
        self.now().date()
    }
}

/// Wall-clock time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to.
///
/// Not gated behind `#[cfg(test)]` so that other crates can use it in their
/// tests too.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<OffsetDateTime>,
}
impl FixedClock {
    pub fn new(now: OffsetDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Midnight UTC on the given date.
    pub fn on(date: Date) -> Self {
        Self::new(date.midnight().assume_utc())
    }

    pub fn set(&self, now: OffsetDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
