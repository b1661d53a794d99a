//! pbsim Core - Planetary Boundaries Simulation Engine
//!
//! A stock-and-flow simulation of nine Earth-system boundaries, driven by
//! four scenario knobs and two policy sliders. The engine owns only the
//! numbers: a display layer (globe renderer, HUD, particle effects) reads a
//! [`snapshot`] after each tick and applies it however it likes.
//!
//! # Architecture
//!
//! - **State**: nine boundary records plus knobs and policies, held by a
//!   single explicitly-constructed [`state::SimulationState`] - no globals,
//!   callers hold the handle.
//! - **Dynamics**: each tick smooths every boundary's pressure from its
//!   knob-weighted drivers, then applies the stock-flow state delta. The
//!   two passes are strictly ordered; state updates read the pressure
//!   smoothed in the same tick.
//! - **Time**: the engine is cadence-agnostic. A [`clock::TimeSource`]
//!   supplies elapsed simulated days and [`engine::SimulationEngine::advance`]
//!   gates ticks to one per 30 simulated days.
//!
//! # Example
//!
//! ```rust,no_run
//! use pbsim_core::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut engine = SimulationEngine::new();
//! let mut clock = SimClock::new();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! loop {
//!     clock.advance(1.0 / 60.0); // 60 FPS render loop
//!     if engine.advance(&clock, &mut rng) {
//!         let snapshot = pbsim_core::snapshot::capture(&engine.state, engine.year());
//!         // hand `snapshot` to the display layer
//!     }
//! }
//! ```

pub mod boundary;
pub mod clock;
pub mod dynamics;
pub mod engine;
pub mod events;
pub mod persistence;
pub mod scenario;
pub mod snapshot;
pub mod state;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::boundary::{Boundary, BoundaryId, Driver};
    pub use crate::clock::{FixedClock, SimClock, TimeSource};
    pub use crate::engine::SimulationEngine;
    pub use crate::state::{Knobs, Policies, SimulationState};
}
