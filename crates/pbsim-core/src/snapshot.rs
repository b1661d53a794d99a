//! Renderer read model - everything the display layer needs after a tick.
//!
//! The engine never touches a scene graph. After each gated tick the
//! display layer captures a [`Snapshot`] (HUD bar fills, globe tint,
//! imagery adjustments) and feeds its particle system from
//! [`HotspotEmitters`] commands. All of it is plain data; applying it is
//! the renderer's problem.

use serde::{Deserialize, Serialize};

use crate::boundary::{Boundary, BoundaryId};
use crate::state::SimulationState;

/// 8-bit RGB triple for HUD elements.
pub type Rgb = (u8, u8, u8);

/// Straight-alpha RGBA color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Healthy endpoint of the globe tint ramp (#2ed573 at 10% alpha).
const TINT_HEALTHY: Rgba = Rgba::new(46.0 / 255.0, 213.0 / 255.0, 115.0 / 255.0, 0.1);
/// Transgressed endpoint of the globe tint ramp (#ff4757 at 60% alpha).
const TINT_TRANSGRESSED: Rgba = Rgba::new(1.0, 71.0 / 255.0, 87.0 / 255.0, 0.6);

/// Per-boundary display readout.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BoundaryReadout {
    pub id: BoundaryId,
    pub state: f64,
    pub pressure: f64,
    /// HUD bar fill, 0-100.
    pub fill_percent: f64,
    /// Green-to-red bar color.
    pub bar_color: Rgb,
}

/// Saturation/hue offsets applied to the base imagery as biodiversity
/// degrades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageryAdjustment {
    pub saturation: f64,
    pub hue: f64,
}

/// Timeline trend marker - mean of the three headline boundaries.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendMarker {
    pub average: f64,
    pub color: Rgb,
}

/// Full display-facing view of the simulation after a tick.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub year: f64,
    pub boundaries: Vec<BoundaryReadout>,
    pub average_state: f64,
    pub globe_tint: Rgba,
    pub imagery: ImageryAdjustment,
    /// Opacity for the building overlay, fading as land degrades.
    pub building_alpha: f64,
    pub trend: TrendMarker,
}

/// Green-to-red HUD bar color for a fill percentage.
pub fn bar_color(fill_percent: f64) -> Rgb {
    let r = (fill_percent * 2.55).floor().clamp(0.0, 255.0) as u8;
    let g = (255.0 - fill_percent * 2.55).floor().clamp(0.0, 255.0) as u8;
    (r, g, 0)
}

/// Display readout for one boundary.
pub fn readout(id: BoundaryId, b: &Boundary) -> BoundaryReadout {
    let fill_percent = b.state * 100.0;
    BoundaryReadout {
        id,
        state: b.state,
        pressure: b.pressure,
        fill_percent,
        bar_color: bar_color(fill_percent),
    }
}

/// Globe tint for a mean degradation level.
pub fn globe_tint(average_state: f64) -> Rgba {
    TINT_HEALTHY.lerp(TINT_TRANSGRESSED, average_state)
}

pub fn imagery_adjustment(state: &SimulationState) -> ImageryAdjustment {
    let bio = state.boundary(BoundaryId::Biodiversity).state;
    ImageryAdjustment {
        saturation: (1.0 - bio * 0.9).max(0.0),
        hue: bio * -0.3,
    }
}

pub fn building_alpha(state: &SimulationState) -> f64 {
    1.0 - state.boundary(BoundaryId::Land).state * 0.7
}

/// Trend marker over climate, biodiversity, and land.
pub fn trend_marker(state: &SimulationState) -> TrendMarker {
    let average = (state.boundary(BoundaryId::Climate).state
        + state.boundary(BoundaryId::Biodiversity).state
        + state.boundary(BoundaryId::Land).state)
        / 3.0;
    TrendMarker {
        average,
        color: hsl_to_rgb(0.3 - average * 0.3, 1.0, 0.5),
    }
}

/// Capture the full display view of the current state.
pub fn capture(state: &SimulationState, year: f64) -> Snapshot {
    Snapshot {
        year,
        boundaries: state.iter().map(|(id, b)| readout(id, b)).collect(),
        average_state: state.average_state(),
        globe_tint: globe_tint(state.average_state()),
        imagery: imagery_adjustment(state),
        building_alpha: building_alpha(state),
        trend: trend_marker(state),
    }
}

/// Pick-style description of one boundary, as shown on click.
pub fn describe(state: &SimulationState, id: BoundaryId) -> String {
    let b = state.boundary(id);
    format!(
        "{}:\nState: {:.2}\nPressure: {:.2}",
        id.name().to_uppercase(),
        b.state,
        b.pressure
    )
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h * 6.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    (
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}

/// Particle hotspot tied to one boundary.
#[derive(Debug, Clone, Copy)]
pub struct Hotspot {
    pub boundary: BoundaryId,
    /// Emitter position: degrees longitude/latitude, height in meters.
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
    /// State level that starts the emitter.
    pub trigger: f64,
}

/// The four emitting hotspots of the demo scene.
pub const HOTSPOTS: [Hotspot; 4] = [
    Hotspot {
        boundary: BoundaryId::Nitrogen,
        longitude: -10.0,
        latitude: 45.0,
        height: 10_000.0,
        trigger: 0.6,
    },
    Hotspot {
        boundary: BoundaryId::Climate,
        longitude: 0.0,
        latitude: 80.0,
        height: 10_000.0,
        trigger: 0.7,
    },
    Hotspot {
        boundary: BoundaryId::Biodiversity,
        longitude: -60.0,
        latitude: 0.0,
        height: 10_000.0,
        trigger: 0.8,
    },
    Hotspot {
        boundary: BoundaryId::Land,
        longitude: 60.0,
        latitude: 45.0,
        height: 10_000.0,
        trigger: 0.5,
    },
];

/// An emitter stops once state falls this far below its trigger.
const TRIGGER_HYSTERESIS: f64 = 0.1;
/// Particles per second per unit of boundary state.
const EMISSION_SCALE: f64 = 100.0;

/// Instruction for the external particle system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmitterCommand {
    Start { hotspot: usize, rate: f64 },
    SetRate { hotspot: usize, rate: f64 },
    Stop { hotspot: usize },
}

/// Tracks which hotspot emitters are live and issues start/stop/rate
/// commands as boundary states cross their triggers.
#[derive(Debug, Clone, Default)]
pub struct HotspotEmitters {
    active: [bool; HOTSPOTS.len()],
}

impl HotspotEmitters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, hotspot: usize) -> bool {
        self.active[hotspot]
    }

    pub fn update(&mut self, state: &SimulationState) -> Vec<EmitterCommand> {
        let mut commands = Vec::new();
        for (i, hotspot) in HOTSPOTS.iter().enumerate() {
            let level = state.boundary(hotspot.boundary).state;
            let rate = level * EMISSION_SCALE;

            if level > hotspot.trigger && !self.active[i] {
                self.active[i] = true;
                commands.push(EmitterCommand::Start { hotspot: i, rate });
            } else if level < hotspot.trigger - TRIGGER_HYSTERESIS && self.active[i] {
                self.active[i] = false;
                commands.push(EmitterCommand::Stop { hotspot: i });
            } else if self.active[i] {
                commands.push(EmitterCommand::SetRate { hotspot: i, rate });
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_color_endpoints() {
        assert_eq!(bar_color(0.0), (0, 255, 0));
        assert_eq!(bar_color(100.0), (255, 0, 0));
        assert_eq!(bar_color(50.0), (127, 127, 0));
    }

    #[test]
    fn test_globe_tint_endpoints() {
        assert_eq!(globe_tint(0.0), TINT_HEALTHY);

        let worst = globe_tint(1.0);
        assert!((worst.r - TINT_TRANSGRESSED.r).abs() < 1e-12);
        assert!((worst.g - TINT_TRANSGRESSED.g).abs() < 1e-12);
        assert!((worst.b - TINT_TRANSGRESSED.b).abs() < 1e-12);
        assert!((worst.a - TINT_TRANSGRESSED.a).abs() < 1e-12);

        let mid = globe_tint(0.5);
        assert!(mid.a > 0.1 && mid.a < 0.6);
    }

    #[test]
    fn test_imagery_tracks_biodiversity() {
        let state = SimulationState::new(); // biodiversity 0.7
        let adj = imagery_adjustment(&state);
        assert!((adj.saturation - 0.37).abs() < 1e-12);
        assert!((adj.hue + 0.21).abs() < 1e-12);
    }

    #[test]
    fn test_building_alpha_tracks_land() {
        let state = SimulationState::new(); // land 0.4
        assert!((building_alpha(&state) - 0.72).abs() < 1e-12);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), (0, 0, 255));
    }

    #[test]
    fn test_capture_lists_all_boundaries() {
        let state = SimulationState::new();
        let snapshot = capture(&state, 2020.0);
        assert_eq!(snapshot.boundaries.len(), BoundaryId::COUNT);
        assert_eq!(snapshot.boundaries[0].id, BoundaryId::Climate);
        assert!((snapshot.boundaries[4].fill_percent - 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_describe_format() {
        let state = SimulationState::new();
        let text = describe(&state, BoundaryId::Nitrogen);
        assert_eq!(text, "NITROGEN:\nState: 0.80\nPressure: 0.95");
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let state = SimulationState::new();
        let snapshot = capture(&state, 2025.5);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"year\":2025.5"));
        assert!(json.contains("\"id\":\"nitrogen\""));
    }

    #[test]
    fn test_emitter_starts_above_trigger() {
        let state = SimulationState::new(); // nitrogen 0.8 > 0.6, others below
        let mut emitters = HotspotEmitters::new();
        let commands = emitters.update(&state);

        assert_eq!(commands.len(), 1);
        match commands[0] {
            EmitterCommand::Start { hotspot, rate } => {
                assert_eq!(HOTSPOTS[hotspot].boundary, BoundaryId::Nitrogen);
                assert!((rate - 80.0).abs() < 1e-12);
            }
            other => panic!("expected Start, got {:?}", other),
        }
        assert!(emitters.is_active(0));
    }

    #[test]
    fn test_emitter_hysteresis() {
        let mut state = SimulationState::new();
        let mut emitters = HotspotEmitters::new();
        emitters.update(&state);

        // Just below the trigger but above trigger - 0.1: stays active
        state.boundary_mut(BoundaryId::Nitrogen).state = 0.55;
        let commands = emitters.update(&state);
        assert!(matches!(commands[0], EmitterCommand::SetRate { .. }));
        assert!(emitters.is_active(0));

        // Below the hysteresis band: stops
        state.boundary_mut(BoundaryId::Nitrogen).state = 0.45;
        let commands = emitters.update(&state);
        assert!(matches!(commands[0], EmitterCommand::Stop { hotspot: 0 }));
        assert!(!emitters.is_active(0));
    }
}
