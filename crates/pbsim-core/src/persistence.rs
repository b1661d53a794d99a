//! Save/Load functionality for persisting simulation state
//!
//! Uses bincode for binary serialization. The whole `SimulationState`
//! serializes directly, so a save file is the version header plus time
//! bookkeeping plus the state itself.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::state::SimulationState;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the simulation
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Elapsed simulated days at save time
    pub elapsed_days: f64,
    /// Ticks run since construction
    pub ticks: u64,
    /// Boundaries, knobs, policies
    pub state: SimulationState,
}

/// Result of loading a simulation
pub struct LoadedSimulation {
    pub state: SimulationState,
    pub elapsed_days: f64,
    pub ticks: u64,
}

/// Save the simulation to a writer
pub fn save_simulation<W: Write>(
    writer: W,
    state: &SimulationState,
    elapsed_days: f64,
    ticks: u64,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        elapsed_days,
        ticks,
        state: state.clone(),
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a simulation from a reader
pub fn load_simulation<R: Read>(reader: R) -> Result<LoadedSimulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    Ok(LoadedSimulation {
        state: save_data.state,
        elapsed_days: save_data.elapsed_days,
        ticks: save_data.ticks,
    })
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryId;

    #[test]
    fn test_save_load_roundtrip() {
        let mut state = SimulationState::new();
        state.knobs.ag = 0.93;
        state.policies.nitrogen = 0.4;
        state.boundary_mut(BoundaryId::Ocean).state = 0.612345;

        let mut buffer = Vec::new();
        save_simulation(&mut buffer, &state, 123.5, 4).expect("save failed");

        let loaded = load_simulation(&buffer[..]).expect("load failed");
        assert_eq!(loaded.state, state);
        assert_eq!(loaded.elapsed_days, 123.5);
        assert_eq!(loaded.ticks, 4);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let bad = SaveData {
            version: 99,
            elapsed_days: 0.0,
            ticks: 0,
            state: SimulationState::new(),
        };
        let bytes = bincode::serialize(&bad).unwrap();

        match load_simulation(&bytes[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, 1);
                assert_eq!(found, 99);
            }
            other => panic!("expected version mismatch, got {:?}", other.is_ok()),
        }
    }
}
