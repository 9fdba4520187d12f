use std::{cell::Cell, time::Instant};

use log::warn;

/// Monotonic time source, in seconds.
///
/// Snapshot timestamps and interpolation are expressed in seconds as `f64`;
/// the origin is arbitrary but must never move backwards.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Seconds elapsed since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, seconds: f64) {
        if seconds < 0.0 {
            warn!("ManualClock cannot move backwards, ignoring advance by {}", seconds);
            return;
        }
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
