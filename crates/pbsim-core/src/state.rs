//! Simulation state - boundaries, scenario knobs, policy interventions.

use serde::{Deserialize, Serialize};

use crate::boundary::{Boundary, BoundaryId, Driver};

/// Scenario driver intensities, nominally 0-1.
///
/// The engine does not clamp these; the UI layer owns input ranges. Only
/// boundary `state`/`pressure` are clamped, after every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knobs {
    pub fossil: f64,
    pub ag: f64,
    pub urban: f64,
    pub industry: f64,
}

impl Default for Knobs {
    fn default() -> Self {
        Self {
            fossil: 0.5,
            ag: 0.7,
            urban: 0.4,
            industry: 0.5,
        }
    }
}

impl Knobs {
    pub fn get(&self, driver: Driver) -> f64 {
        match driver {
            Driver::Fossil => self.fossil,
            Driver::Ag => self.ag,
            Driver::Urban => self.urban,
            Driver::Industry => self.industry,
        }
    }

    pub fn get_mut(&mut self, driver: Driver) -> &mut f64 {
        match driver {
            Driver::Fossil => &mut self.fossil,
            Driver::Ag => &mut self.ag,
            Driver::Urban => &mut self.urban,
            Driver::Industry => &mut self.industry,
        }
    }

    /// Drive every knob to the same value (chaos mode uses 1.0).
    pub fn set_all(&mut self, value: f64) {
        for driver in Driver::ALL {
            *self.get_mut(driver) = value;
        }
    }
}

/// Mitigation intervention strengths, nominally 0-1, for the two
/// boundaries that have a policy slider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Policies {
    pub climate: f64,
    pub nitrogen: f64,
}

impl Policies {
    /// Policy strength applied to `id`; boundaries without a slider get 0.
    pub fn for_boundary(&self, id: BoundaryId) -> f64 {
        match id {
            BoundaryId::Climate => self.climate,
            BoundaryId::Nitrogen => self.nitrogen,
            _ => 0.0,
        }
    }
}

/// The complete mutable simulation state.
///
/// Constructed once at startup and mutated in place by every tick and by
/// knob/policy edits. Callers hold and pass the handle; there is no
/// ambient instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    boundaries: [Boundary; BoundaryId::COUNT],
    pub knobs: Knobs,
    pub policies: Policies,
}

impl SimulationState {
    pub fn new() -> Self {
        Self {
            boundaries: BoundaryId::ALL.map(BoundaryId::initial),
            knobs: Knobs::default(),
            policies: Policies::default(),
        }
    }

    pub fn boundary(&self, id: BoundaryId) -> &Boundary {
        &self.boundaries[id.index()]
    }

    pub fn boundary_mut(&mut self, id: BoundaryId) -> &mut Boundary {
        &mut self.boundaries[id.index()]
    }

    /// All boundaries in fixed display order.
    pub fn iter(&self) -> impl Iterator<Item = (BoundaryId, &Boundary)> {
        BoundaryId::ALL
            .into_iter()
            .map(move |id| (id, &self.boundaries[id.index()]))
    }

    /// Mean degradation across all nine boundaries.
    pub fn average_state(&self) -> f64 {
        let sum: f64 = self.boundaries.iter().map(|b| b.state).sum();
        sum / BoundaryId::COUNT as f64
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_knobs_and_policies() {
        let state = SimulationState::new();
        assert_eq!(state.knobs.fossil, 0.5);
        assert_eq!(state.knobs.ag, 0.7);
        assert_eq!(state.knobs.urban, 0.4);
        assert_eq!(state.knobs.industry, 0.5);
        assert_eq!(state.policies.climate, 0.0);
        assert_eq!(state.policies.nitrogen, 0.0);
    }

    #[test]
    fn test_knob_accessors() {
        let mut knobs = Knobs::default();
        assert_eq!(knobs.get(Driver::Ag), 0.7);

        *knobs.get_mut(Driver::Urban) = 0.9;
        assert_eq!(knobs.urban, 0.9);

        knobs.set_all(1.0);
        for driver in Driver::ALL {
            assert_eq!(knobs.get(driver), 1.0);
        }
    }

    #[test]
    fn test_policy_lookup_defaults_to_zero() {
        let policies = Policies {
            climate: 0.5,
            nitrogen: 0.25,
        };
        assert_eq!(policies.for_boundary(BoundaryId::Climate), 0.5);
        assert_eq!(policies.for_boundary(BoundaryId::Nitrogen), 0.25);
        assert_eq!(policies.for_boundary(BoundaryId::Ozone), 0.0);
        assert_eq!(policies.for_boundary(BoundaryId::Land), 0.0);
    }

    #[test]
    fn test_average_state_of_initial_table() {
        let state = SimulationState::new();
        let expected = (0.3 + 0.7 + 0.4 + 0.5 + 0.8 + 0.6 + 0.4 + 0.1 + 0.3) / 9.0;
        assert!((state.average_state() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_iter_order_matches_all() {
        let state = SimulationState::new();
        let ids: Vec<BoundaryId> = state.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, BoundaryId::ALL.to_vec());
    }
}
