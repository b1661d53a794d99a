//! pbsim Headless Simulation Harness
//!
//! Validates boundary dynamics and display read-model data without a globe
//! renderer. Runs entirely in-process with no rendering and no networking.
//!
//! Usage:
//!   cargo run -p pbsim-simtest
//!   cargo run -p pbsim-simtest -- --verbose

use pbsim_core::boundary::{BoundaryId, Driver};
use pbsim_core::clock::FixedClock;
use pbsim_core::engine::SimulationEngine;
use pbsim_core::events::RecordingObserver;
use pbsim_core::scenario::{run_nitrogen_stress, RECOVERY_TICKS, STRESS_TICKS};
use pbsim_core::snapshot::{self, EmitterCommand, HotspotEmitters, HOTSPOTS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

#[derive(Debug, Serialize)]
struct ScenarioSummary {
    after_stress: f64,
    after_policy: f64,
    stress_ticks: usize,
    recovery_ticks: usize,
}

fn quiet_engine() -> SimulationEngine {
    SimulationEngine::with_observer(Box::new(RecordingObserver::default()))
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== pbsim Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Initial state table
    results.extend(validate_initial_state(verbose));

    // 2. Clamping under randomized inputs
    results.extend(validate_clamping(verbose));

    // 3. Ozone pressure decay (closed form)
    results.extend(validate_ozone_decay(verbose));

    // 4. Nitrogen stress & policy recovery scenario
    results.extend(validate_stress_scenario(verbose));

    // 5. Chaos mode
    results.extend(validate_chaos(verbose));

    // 6. Seeded determinism
    results.extend(validate_determinism(verbose));

    // 7. Display read model
    results.extend(validate_display_model(verbose));

    // 8. Save/load roundtrip
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Initial State ────────────────────────────────────────────────────

fn validate_initial_state(_verbose: bool) -> Vec<TestResult> {
    println!("--- Initial State ---");
    let mut results = Vec::new();

    let engine = quiet_engine();
    let expected: [(BoundaryId, f64, f64); 9] = [
        (BoundaryId::Climate, 0.3, 0.6),
        (BoundaryId::Biodiversity, 0.7, 0.9),
        (BoundaryId::Land, 0.4, 0.7),
        (BoundaryId::Freshwater, 0.5, 0.8),
        (BoundaryId::Nitrogen, 0.8, 0.95),
        (BoundaryId::Phosphorus, 0.6, 0.7),
        (BoundaryId::Ocean, 0.4, 0.6),
        (BoundaryId::Ozone, 0.1, 0.2),
        (BoundaryId::Novel, 0.3, 0.4),
    ];

    let mut table_ok = true;
    let mut mismatch = String::new();
    for (id, state, pressure) in expected {
        let b = engine.state.boundary(id);
        if b.state != state || b.pressure != pressure || b.threshold != 1.0 {
            table_ok = false;
            mismatch = format!("{} = ({}, {}, {})", id, b.state, b.pressure, b.threshold);
            break;
        }
    }
    results.push(check(
        "initial_table",
        table_ok,
        if table_ok {
            "all nine boundaries match".into()
        } else {
            mismatch
        },
    ));

    let k = &engine.state.knobs;
    results.push(check(
        "initial_knobs",
        k.fossil == 0.5 && k.ag == 0.7 && k.urban == 0.4 && k.industry == 0.5,
        format!(
            "fossil={} ag={} urban={} industry={}",
            k.fossil, k.ag, k.urban, k.industry
        ),
    ));

    let p = &engine.state.policies;
    results.push(check(
        "initial_policies",
        p.climate == 0.0 && p.nitrogen == 0.0,
        format!("climate={} nitrogen={}", p.climate, p.nitrogen),
    ));

    let ozone_empty = BoundaryId::Ozone.driver_weights().is_empty();
    let driven = BoundaryId::ALL
        .iter()
        .filter(|id| !id.driver_weights().is_empty())
        .count();
    results.push(check(
        "driver_tables",
        ozone_empty && driven == 8,
        format!("{} driven boundaries, ozone driverless", driven),
    ));

    results
}

// ── 2. Clamping ─────────────────────────────────────────────────────────

fn validate_clamping(_verbose: bool) -> Vec<TestResult> {
    println!("--- Clamping ---");
    let mut results = Vec::new();

    let mut engine = quiet_engine();
    let mut rng = StdRng::seed_from_u64(201);
    let mut in_range = true;

    for _ in 0..200 {
        for driver in Driver::ALL {
            *engine.state.knobs.get_mut(driver) = rng.gen_range(-0.5..1.5);
        }
        engine.state.policies.climate = rng.gen_range(0.0..1.0);
        engine.state.policies.nitrogen = rng.gen_range(0.0..1.0);
        engine.tick(&mut rng);

        for (_, b) in engine.state.iter() {
            if !(0.0..=1.0).contains(&b.state) || !(0.0..=1.0).contains(&b.pressure) {
                in_range = false;
            }
        }
    }

    results.push(check(
        "state_pressure_in_unit_interval",
        in_range,
        "200 ticks with out-of-range knobs".into(),
    ));
    results
}

// ── 3. Ozone Decay ──────────────────────────────────────────────────────

fn validate_ozone_decay(verbose: bool) -> Vec<TestResult> {
    println!("--- Ozone Decay ---");
    let mut results = Vec::new();

    let mut engine = quiet_engine();
    let mut rng = StdRng::seed_from_u64(202);
    let ticks = 24;
    for _ in 0..ticks {
        engine.tick(&mut rng);
    }

    let expected = 0.2 * 0.95_f64.powi(ticks);
    let actual = engine.state.boundary(BoundaryId::Ozone).pressure;
    if verbose {
        println!("  ozone pressure after {} ticks: {:.6}", ticks, actual);
    }

    results.push(check(
        "ozone_decay_closed_form",
        (actual - expected).abs() < 1e-9,
        format!("{:.6} vs expected {:.6}", actual, expected),
    ));
    results
}

// ── 4. Stress Scenario ──────────────────────────────────────────────────

fn validate_stress_scenario(verbose: bool) -> Vec<TestResult> {
    println!("--- Stress Scenario ---");
    let mut results = Vec::new();

    let mut engine = quiet_engine();
    let mut rng = StdRng::seed_from_u64(203);
    let original_ag = engine.state.knobs.ag;

    let report = run_nitrogen_stress(&mut engine, &mut rng);

    let summary = ScenarioSummary {
        after_stress: report.after_stress,
        after_policy: report.after_policy,
        stress_ticks: STRESS_TICKS,
        recovery_ticks: RECOVERY_TICKS,
    };
    if verbose {
        println!(
            "  {}",
            serde_json::to_string(&summary).unwrap_or_default()
        );
    }

    results.push(check(
        "stress_transgresses_nitrogen",
        report.after_stress >= 0.95,
        format!("nitrogen {:.4} after {} ticks", report.after_stress, STRESS_TICKS),
    ));
    results.push(check(
        "policy_recovers_nitrogen",
        report.after_policy < report.after_stress,
        format!("nitrogen {:.4} after {} policy ticks", report.after_policy, RECOVERY_TICKS),
    ));
    results.push(check(
        "controls_restored",
        engine.state.knobs.ag == original_ag && engine.state.policies.nitrogen == 0.0,
        "ag knob and nitrogen policy back to originals".into(),
    ));
    results
}

// ── 5. Chaos Mode ───────────────────────────────────────────────────────

fn validate_chaos(_verbose: bool) -> Vec<TestResult> {
    println!("--- Chaos Mode ---");
    let mut results = Vec::new();

    let mut engine = quiet_engine();
    let mut rng = StdRng::seed_from_u64(204);
    engine.chaos(&mut rng);

    let maxed = Driver::ALL
        .iter()
        .all(|&d| engine.state.knobs.get(d) == 1.0);
    results.push(check("chaos_maxes_knobs", maxed, "all four knobs at 1.0".into()));
    results.push(check(
        "chaos_runs_one_tick",
        engine.ticks() == 1,
        format!("{} ticks", engine.ticks()),
    ));

    // nitrogen pressure pulled toward its raw value 0.9
    let p = engine.state.boundary(BoundaryId::Nitrogen).pressure;
    results.push(check(
        "chaos_tick_applied",
        (p - 0.9475).abs() < 1e-9,
        format!("nitrogen pressure {:.4}", p),
    ));
    results
}

// ── 6. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(_verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let mut a = quiet_engine();
    let mut b = quiet_engine();
    let mut rng_a = StdRng::seed_from_u64(205);
    let mut rng_b = StdRng::seed_from_u64(205);

    run_nitrogen_stress(&mut a, &mut rng_a);
    run_nitrogen_stress(&mut b, &mut rng_b);

    results.push(check(
        "identical_seeds_identical_states",
        a.state == b.state,
        "two scenario runs compared field by field".into(),
    ));
    results
}

// ── 7. Display Read Model ───────────────────────────────────────────────

fn validate_display_model(verbose: bool) -> Vec<TestResult> {
    println!("--- Display Read Model ---");
    let mut results = Vec::new();

    let engine = quiet_engine();
    let snap = snapshot::capture(&engine.state, engine.year());

    if verbose {
        println!("  {}", serde_json::to_string_pretty(&snap).unwrap_or_default());
    }

    results.push(check(
        "snapshot_lists_nine_boundaries",
        snap.boundaries.len() == 9,
        format!("{} readouts", snap.boundaries.len()),
    ));

    let nitrogen = &snap.boundaries[BoundaryId::Nitrogen.index()];
    results.push(check(
        "bar_fill_tracks_state",
        (nitrogen.fill_percent - 80.0).abs() < 1e-9,
        format!("nitrogen fill {:.1}%", nitrogen.fill_percent),
    ));

    results.push(check(
        "bar_color_endpoints",
        snapshot::bar_color(0.0) == (0, 255, 0) && snapshot::bar_color(100.0) == (255, 0, 0),
        "green at 0%, red at 100%".into(),
    ));

    let tint_ok = snap.globe_tint.a >= 0.1 && snap.globe_tint.a <= 0.6;
    results.push(check(
        "globe_tint_alpha_in_ramp",
        tint_ok,
        format!("alpha {:.3}", snap.globe_tint.a),
    ));

    let text = snapshot::describe(&engine.state, BoundaryId::Nitrogen);
    results.push(check(
        "describe_text",
        text == "NITROGEN:\nState: 0.80\nPressure: 0.95",
        text.replace('\n', " / "),
    ));

    let mut emitters = HotspotEmitters::new();
    let commands = emitters.update(&engine.state);
    let nitrogen_started = commands.iter().any(|c| {
        matches!(c, EmitterCommand::Start { hotspot, .. }
            if HOTSPOTS[*hotspot].boundary == BoundaryId::Nitrogen)
    });
    results.push(check(
        "nitrogen_emitter_starts",
        nitrogen_started && commands.len() == 1,
        format!("{} emitter commands on initial state", commands.len()),
    ));

    results
}

// ── 8. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let mut engine = quiet_engine();
    let mut rng = StdRng::seed_from_u64(206);
    engine.state.knobs.ag = 1.0;
    for month in 0..6 {
        engine.advance(&FixedClock(month as f64 * 30.44), &mut rng);
    }

    let mut buffer = Vec::new();
    let saved = engine.save(&mut buffer).is_ok();
    results.push(check(
        "save_succeeds",
        saved,
        format!("{} bytes", buffer.len()),
    ));

    let mut restored = quiet_engine();
    let loaded = restored.load(&buffer[..]).is_ok();
    results.push(check(
        "load_restores_state",
        loaded && restored.state == engine.state && restored.ticks() == engine.ticks(),
        format!("{} ticks preserved", restored.ticks()),
    ));

    results
}
