//! Boundary identities, driver tables, and initial conditions.

use serde::{Deserialize, Serialize};

/// Nominal transgression threshold carried by every boundary.
///
/// Stored and serialized for all nine boundaries but never read by the
/// state update, which works against `dynamics::tuning::EFFECTIVE_THRESHOLD`.
pub const NOMINAL_THRESHOLD: f64 = 1.0;

/// One of the nine tracked Earth-system boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryId {
    Climate,
    Biodiversity,
    Land,
    Freshwater,
    Nitrogen,
    Phosphorus,
    Ocean,
    Ozone,
    Novel,
}

/// A macro driver whose intensity is set by a scenario knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Fossil,
    Ag,
    Urban,
    Industry,
}

impl BoundaryId {
    /// All nine boundaries, in display order.
    pub const ALL: [BoundaryId; 9] = [
        BoundaryId::Climate,
        BoundaryId::Biodiversity,
        BoundaryId::Land,
        BoundaryId::Freshwater,
        BoundaryId::Nitrogen,
        BoundaryId::Phosphorus,
        BoundaryId::Ocean,
        BoundaryId::Ozone,
        BoundaryId::Novel,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            BoundaryId::Climate => "climate",
            BoundaryId::Biodiversity => "biodiversity",
            BoundaryId::Land => "land",
            BoundaryId::Freshwater => "freshwater",
            BoundaryId::Nitrogen => "nitrogen",
            BoundaryId::Phosphorus => "phosphorus",
            BoundaryId::Ocean => "ocean",
            BoundaryId::Ozone => "ozone",
            BoundaryId::Novel => "novel",
        }
    }

    /// The drivers contributing to this boundary's pressure, paired with
    /// their weights. One table per boundary keeps the pairing aligned.
    pub fn driver_weights(self) -> &'static [(Driver, f64)] {
        match self {
            BoundaryId::Climate => &[(Driver::Fossil, 0.8), (Driver::Ag, 0.2)],
            BoundaryId::Biodiversity => &[(Driver::Ag, 0.3), (Driver::Urban, 0.2)],
            BoundaryId::Land => &[(Driver::Ag, 0.6)],
            BoundaryId::Freshwater => &[(Driver::Ag, 0.7)],
            BoundaryId::Nitrogen => &[(Driver::Ag, 0.9)],
            BoundaryId::Phosphorus => &[(Driver::Ag, 0.8)],
            BoundaryId::Ocean => &[(Driver::Fossil, 0.3)],
            BoundaryId::Ozone => &[],
            BoundaryId::Novel => &[(Driver::Industry, 0.8)],
        }
    }

    /// Starting conditions for this boundary.
    pub fn initial(self) -> Boundary {
        let (state, pressure) = match self {
            BoundaryId::Climate => (0.3, 0.6),
            BoundaryId::Biodiversity => (0.7, 0.9),
            BoundaryId::Land => (0.4, 0.7),
            BoundaryId::Freshwater => (0.5, 0.8),
            BoundaryId::Nitrogen => (0.8, 0.95),
            BoundaryId::Phosphorus => (0.6, 0.7),
            BoundaryId::Ocean => (0.4, 0.6),
            BoundaryId::Ozone => (0.1, 0.2),
            BoundaryId::Novel => (0.3, 0.4),
        };
        Boundary {
            state,
            pressure,
            threshold: NOMINAL_THRESHOLD,
        }
    }
}

impl std::fmt::Display for BoundaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Driver {
    pub const ALL: [Driver; 4] = [Driver::Fossil, Driver::Ag, Driver::Urban, Driver::Industry];

    pub fn name(self) -> &'static str {
        match self {
            Driver::Fossil => "fossil",
            Driver::Ag => "ag",
            Driver::Urban => "urban",
            Driver::Industry => "industry",
        }
    }

    /// Human-readable control label, as shown on the knob panel.
    pub fn label(self) -> &'static str {
        match self {
            Driver::Fossil => "Fossil Fuel",
            Driver::Ag => "Agriculture",
            Driver::Urban => "Urbanization",
            Driver::Industry => "Industrialization",
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Stock-and-flow record for a single boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Degradation level: 0 = healthy, 1 = fully transgressed.
    pub state: f64,
    /// Exponentially smoothed driving pressure.
    pub pressure: f64,
    /// Nominal threshold, fixed at [`NOMINAL_THRESHOLD`].
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nine_boundaries() {
        assert_eq!(BoundaryId::COUNT, 9);
        for (i, id) in BoundaryId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_initial_table() {
        let nitrogen = BoundaryId::Nitrogen.initial();
        assert_eq!(nitrogen.state, 0.8);
        assert_eq!(nitrogen.pressure, 0.95);
        assert_eq!(nitrogen.threshold, 1.0);

        let ozone = BoundaryId::Ozone.initial();
        assert_eq!(ozone.state, 0.1);
        assert_eq!(ozone.pressure, 0.2);
    }

    #[test]
    fn test_ozone_has_no_drivers() {
        assert!(BoundaryId::Ozone.driver_weights().is_empty());
    }

    #[test]
    fn test_driver_weights_in_range() {
        for id in BoundaryId::ALL {
            for &(_, weight) in id.driver_weights() {
                assert!(weight > 0.0 && weight <= 1.0, "{} weight out of range", id);
            }
        }
    }

    #[test]
    fn test_names_round_trip_through_serde() {
        let json = serde_json::to_string(&BoundaryId::Freshwater).unwrap();
        assert_eq!(json, "\"freshwater\"");
        let back: BoundaryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BoundaryId::Freshwater);

        assert_eq!(serde_json::to_string(&Driver::Ag).unwrap(), "\"ag\"");
    }
}
