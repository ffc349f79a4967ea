//! Elapsed-time coordinator.
//!
//! Elapsed time is always derived from the captured start instant minus the
//! total time spent paused, never by adding up ticks, so late or skipped
//! polls cannot drift the clock.

use serde::{Deserialize, Serialize};

use crate::core::{Seconds, Timestamp};

/// Start/pause/resume/reset stopwatch that reports whole seconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    started_at: Option<Timestamp>,
    paused_at: Option<Timestamp>,
    paused_total: u64,
    /// Instants before the last resume read as the moment play resumed.
    resumed_at: Option<Timestamp>,
    last_emitted: Option<Seconds>,
}

impl GameTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from zero at `now`.
    pub fn start(&mut self, now: Timestamp) {
        *self = Self {
            started_at: Some(now),
            ..Self::default()
        };
    }

    /// Start so that `elapsed` seconds have already passed at `now`.
    ///
    /// Used when resuming a restored session.
    pub fn start_at_elapsed(&mut self, now: Timestamp, elapsed: Seconds) {
        *self = Self {
            started_at: Some(now.saturating_sub(u64::from(elapsed) * 1000)),
            last_emitted: Some(elapsed),
            ..Self::default()
        };
    }

    /// Freeze elapsed time at `now`.
    pub fn pause(&mut self, now: Timestamp) {
        if self.is_running() {
            self.paused_at = Some(now);
        }
    }

    /// Continue counting, excluding the time since `pause`.
    pub fn resume(&mut self, now: Timestamp) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_sub(paused_at);
            self.resumed_at = Some(now);
        }
    }

    /// Forget every tracked instant.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Started and not paused.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.paused_at.is_none()
    }

    /// Whole seconds elapsed at `now`, excluding paused time.
    #[must_use]
    pub fn elapsed(&self, now: Timestamp) -> Seconds {
        (self.elapsed_ms(now) / 1000) as Seconds
    }

    /// Game-clock milliseconds at `now`, excluding paused time.
    ///
    /// An instant that fell inside a finished pause reads as the moment the
    /// pause began, so work that came due while paused is timed at the
    /// point play stopped.
    #[must_use]
    pub fn elapsed_ms(&self, now: Timestamp) -> u64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let until = self
            .paused_at
            .unwrap_or(now)
            .max(self.resumed_at.unwrap_or(started_at));
        until
            .saturating_sub(started_at)
            .saturating_sub(self.paused_total)
    }

    /// The elapsed seconds if a new whole second has passed since the last
    /// emitted value, otherwise `None`. Never emits while paused.
    pub fn poll(&mut self, now: Timestamp) -> Option<Seconds> {
        if !self.is_running() {
            return None;
        }
        let elapsed = self.elapsed(now);
        if self.last_emitted.is_some_and(|last| last >= elapsed) {
            return None;
        }
        if self.last_emitted.is_none() && elapsed == 0 {
            return None;
        }
        self.last_emitted = Some(elapsed);
        Some(elapsed)
    }
}
