//! Boundary dynamics - the two-phase tick arithmetic.
//!
//! Each tick advances the nine boundaries in two strictly ordered passes:
//! every pressure is smoothed first, then every state is updated. State
//! updates read the pressure smoothed in the same tick, never a stale one.

use crate::boundary::BoundaryId;
use crate::state::{Knobs, SimulationState};

/// Tuning constants for the stock-and-flow update.
pub mod tuning {
    /// Smoothing factor applied to the incoming raw pressure each tick.
    pub const PRESSURE_INERTIA: f64 = 0.05;
    /// State change per unit of pressure above the effective threshold.
    pub const STATE_RESPONSE: f64 = 0.01;
    /// State relief per unit of policy strength, per tick.
    pub const POLICY_RELIEF: f64 = 0.02;
    /// Pressure level above which a boundary degrades. Deliberately lower
    /// than the nominal `Boundary::threshold` of 1.0 so transgression is
    /// observable at moderate knob settings.
    pub const EFFECTIVE_THRESHOLD: f64 = 0.5;
    /// State level above which a boundary counts as critical.
    pub const CRITICAL_STATE: f64 = 0.9;
    /// Per-tick chance of reporting each critical boundary.
    pub const CRITICAL_EVENT_CHANCE: f64 = 0.01;
}

/// Knob-weighted instantaneous pressure on `id`, before smoothing.
/// Zero for boundaries with no drivers.
pub fn raw_pressure(id: BoundaryId, knobs: &Knobs) -> f64 {
    id.driver_weights()
        .iter()
        .map(|&(driver, weight)| weight * knobs.get(driver))
        .sum()
}

/// Phase 1: smooth every boundary's pressure toward its raw value.
///
/// Driverless boundaries have raw pressure 0, so their smoothed pressure
/// decays by `PRESSURE_INERTIA` per tick.
pub fn update_pressures(state: &mut SimulationState) {
    for id in BoundaryId::ALL {
        let raw = raw_pressure(id, &state.knobs);
        let b = state.boundary_mut(id);
        let smoothed = (1.0 - tuning::PRESSURE_INERTIA) * b.pressure + tuning::PRESSURE_INERTIA * raw;
        b.pressure = smoothed.clamp(0.0, 1.0);
    }
}

/// Phase 2: apply the stock-flow delta to every boundary's state.
pub fn update_states(state: &mut SimulationState) {
    for id in BoundaryId::ALL {
        let policy = state.policies.for_boundary(id);
        let b = state.boundary_mut(id);
        let delta = tuning::STATE_RESPONSE * (b.pressure - tuning::EFFECTIVE_THRESHOLD)
            - tuning::POLICY_RELIEF * policy;
        b.state = (b.state + delta).clamp(0.0, 1.0);
    }
}

/// One full step: all pressures, then all states.
pub fn step(state: &mut SimulationState) {
    update_pressures(state);
    update_states(state);
}

/// Boundaries currently past the critical state level.
pub fn critical_boundaries(state: &SimulationState) -> Vec<BoundaryId> {
    BoundaryId::ALL
        .into_iter()
        .filter(|&id| state.boundary(id).state > tuning::CRITICAL_STATE)
        .collect()
}
