//! Critical-event reporting through an injected observer.
//!
//! Boundaries past the critical level are reported with a small per-tick
//! probability - operator visibility only, never an input to the dynamics.
//! The observer indirection keeps the engine free of output side effects
//! and lets tests substitute a recording sink.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryId;
use crate::dynamics::{self, tuning};
use crate::state::SimulationState;

/// A boundary flagged as critical during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalEvent {
    pub boundary: BoundaryId,
    pub state: f64,
    pub year: f64,
}

/// Sink for critical-event notifications.
pub trait CriticalObserver {
    fn on_critical(&mut self, event: &CriticalEvent);
}

/// Default observer - reports through the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl CriticalObserver for LogObserver {
    fn on_critical(&mut self, event: &CriticalEvent) {
        log::warn!("{} CRITICAL: {:.2}", event.boundary, event.state);
    }
}

/// Observer that keeps every event; used by tests and the harness.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<CriticalEvent>,
}

impl CriticalObserver for RecordingObserver {
    fn on_critical(&mut self, event: &CriticalEvent) {
        self.events.push(*event);
    }
}

/// Roll the per-tick report for each boundary past the critical level.
/// Each fires independently with `CRITICAL_EVENT_CHANCE` probability.
pub fn roll_criticals(
    state: &SimulationState,
    year: f64,
    rng: &mut impl Rng,
    observer: &mut dyn CriticalObserver,
) {
    for id in dynamics::critical_boundaries(state) {
        if rng.gen_bool(tuning::CRITICAL_EVENT_CHANCE) {
            observer.on_critical(&CriticalEvent {
                boundary: id,
                state: state.boundary(id).state,
                year,
            });
        }
    }
}
