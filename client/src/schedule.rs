//! Sync timer and clock abstraction.
//!
//! The timer is a plain deadline: arming it replaces whatever was scheduled,
//! cancelling clears it. Whoever owns it decides when to look at the clock,
//! so tests can move a [`ManualClock`] forward instead of sleeping.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock following the tokio runtime clock.
///
/// Under a paused tokio runtime this advances with `tokio::time`, so the
/// event loop's sleeps and the timer agree.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

/// One-shot periodic sync timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl SyncTimer {
    /// Create a disarmed timer.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule the next sync one interval after `now`, replacing any
    /// previous deadline.
    ///
    /// An interval too large to represent leaves the timer disarmed.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = now.checked_add(self.interval);
        if self.deadline.is_none() {
            tracing::warn!(interval_secs = self.interval.as_secs(), "Sync interval out of range");
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has been reached.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left until the deadline; `None` when disarmed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
