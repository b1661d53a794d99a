//! Simulated time - the looping demo timeline and the tick cadence.
//!
//! The engine never owns a wall clock. The render loop (or a test) holds a
//! [`TimeSource`] and the engine derives its calendar year from elapsed
//! simulated days.

use serde::{Deserialize, Serialize};

/// Calendar year at zero elapsed days.
pub const EPOCH_YEAR: f64 = 2020.0;
/// Mean days per calendar year.
pub const DAYS_PER_YEAR: f64 = 365.25;
/// Minimum simulated days between gated ticks - a coarse monthly cadence.
pub const TICK_INTERVAL_DAYS: f64 = 30.0;
/// Length of the looping 2020-2030 demo timeline, in days.
pub const TIMELINE_DAYS: f64 = 4018.0;
/// Default speedup: one simulated year per real second.
pub const DEFAULT_MULTIPLIER: f64 = 31_536_000.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Calendar year for an elapsed-day count.
pub fn year_for(elapsed_days: f64) -> f64 {
    EPOCH_YEAR + elapsed_days / DAYS_PER_YEAR
}

/// Source of elapsed simulated time.
pub trait TimeSource {
    /// Simulated days elapsed since the timeline epoch.
    fn elapsed_days(&self) -> f64;
}

/// Demo timeline clock: starts at 2020-01-01, runs at a configurable
/// number of simulated seconds per real second, and loops back to the
/// epoch when it passes the end of 2030.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimClock {
    elapsed_seconds: f64,
    multiplier: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::with_multiplier(DEFAULT_MULTIPLIER)
    }

    pub fn with_multiplier(multiplier: f64) -> Self {
        Self {
            elapsed_seconds: 0.0,
            multiplier: multiplier.max(0.0),
        }
    }

    /// Advance by `real_dt` wall-clock seconds.
    pub fn advance(&mut self, real_dt: f64) {
        let timeline_seconds = TIMELINE_DAYS * SECONDS_PER_DAY;
        self.elapsed_seconds =
            (self.elapsed_seconds + real_dt.max(0.0) * self.multiplier).rem_euclid(timeline_seconds);
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: f64) {
        self.multiplier = multiplier.max(0.0);
    }

    pub fn year(&self) -> f64 {
        year_for(self.elapsed_days())
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SimClock {
    fn elapsed_days(&self) -> f64 {
        self.elapsed_seconds / SECONDS_PER_DAY
    }
}

/// Fixed time source for tests and scripted scenarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub f64);

impl TimeSource for FixedClock {
    fn elapsed_days(&self) -> f64 {
        self.0
    }
}
