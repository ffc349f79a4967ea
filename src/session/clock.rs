//! Wall-clock abstraction.
//!
//! The session reads time only through `Clock`, so tests can drive it with
//! a `ManualClock` instead of sleeping.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::core::Timestamp;

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The system clock.
///
/// Reads the wall clock once, at construction, and measures from there with
/// a monotonic `Instant`. Wall-clock adjustments afterwards never move it
/// backwards.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    epoch_ms: Timestamp,
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Timestamp)
            .unwrap_or(0);
        Self {
            epoch_ms,
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        self.epoch_ms
            .saturating_add(self.origin.elapsed().as_millis() as Timestamp)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep a handle while the
/// session owns another.
///
/// ```
/// use memory_match::session::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// let handle = clock.clone();
/// handle.advance(250);
/// assert_eq!(clock.now(), 1_250);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Move time forward by `millis`.
    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }

    /// Jump to an absolute time.
    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}
