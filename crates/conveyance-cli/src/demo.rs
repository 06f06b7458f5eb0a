// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Demo conveyor line used by `conveyance run`.
//!
//! The line is a straight belt along +X, a right-hand quarter curve and a
//! second straight heading -Z, all above a static floor. Bodies start in
//! five lanes on the first belt; every tenth one is a spawn source that is
//! realized a quarter of the way through the run.

use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use conveyance_core::geom::{Aabb, Pose, Vec3};
use conveyance_core::{
    CarriedUnit, CurvedConveyor, Drive, LayerMask, RigidBody, SceneIndex, StepReport,
    StraightConveyor, SurfaceId, TransportBody, TransportConfig, TransportSystem, UnitId,
};
use tracing::{debug, info};

const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
const BELT_HEIGHT: f32 = 0.5;
const BELT_WIDTH: f32 = 0.6;
const LANES: usize = 5;
const SLOTS_PER_LANE: usize = 39;
const SPAWN_SOURCE_EVERY: usize = 10;

/// Knobs for one demo run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Bodies to place on the first belt.
    pub bodies: usize,
    /// Fixed ticks to run.
    pub ticks: u64,
    /// Seconds per tick.
    pub dt: f32,
    /// Drive speed in drive units per second.
    pub speed: f64,
    /// Step bodies on the calling thread instead of the rayon pool.
    pub sequential: bool,
}

/// A surface of the demo line and how many bodies ended on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRow {
    /// Surface id in the scene.
    pub id: SurfaceId,
    /// Human label.
    pub label: &'static str,
    /// Final drive position.
    pub drive: f64,
    /// Bodies guided by this surface after the last tick.
    pub bodies: usize,
}

/// Totals of one demo run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Options the run used.
    pub options: RunOptions,
    /// Cumulative counts over all ticks.
    pub totals: StepReport,
    /// Report of the last tick.
    pub last: StepReport,
    /// Per-surface occupancy after the last tick.
    pub surfaces: Vec<SurfaceRow>,
    /// Wall time spent stepping bodies.
    pub step_time: Duration,
}

impl RunSummary {
    /// Mean wall time of one system step.
    pub fn mean_step(&self) -> Duration {
        match u32::try_from(self.options.ticks) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.step_time / n,
            Err(_) => Duration::ZERO,
        }
    }
}

/// Builds the demo line. Returns the scene and its surfaces in travel order.
pub fn demo_line(speed: f64) -> (SceneIndex, Vec<(SurfaceId, &'static str)>) {
    let mut scene = SceneIndex::new();
    let infeed = scene
        .add_surface(
            StraightConveyor::new(
                Vec3::new(0.0, BELT_HEIGHT, 0.0),
                Vec3::new(4.0, BELT_HEIGHT, 0.0),
                BELT_WIDTH,
            )
            .with_drive(Drive::new(speed)),
        )
        .0;
    let curve = scene
        .add_surface(
            CurvedConveyor::new(Vec3::new(4.0, BELT_HEIGHT, -1.0), 1.0, BELT_WIDTH, 0.0, 90.0)
                .with_drive(Drive::new(speed)),
        )
        .0;
    let outfeed = scene
        .add_surface(
            StraightConveyor::new(
                Vec3::new(5.0, BELT_HEIGHT, -1.0),
                Vec3::new(5.0, BELT_HEIGHT, -4.0),
                BELT_WIDTH,
            )
            .with_drive(Drive::new(speed)),
        )
        .0;
    scene.add_static(
        Aabb::new(Vec3::new(-20.0, -0.1, -20.0), Vec3::new(20.0, 0.0, 20.0)),
        LayerMask::STATIC,
    );
    (
        scene,
        vec![(infeed, "infeed"), (curve, "curve"), (outfeed, "outfeed")],
    )
}

/// Start position of body `i`: lanes across the infeed, slots along it.
#[allow(clippy::cast_precision_loss)]
fn start_position(i: usize) -> Vec3 {
    let lane = i % LANES;
    let slot = (i / LANES) % SLOTS_PER_LANE;
    let z = (lane as f32 - 2.0) * 0.1;
    let x = 0.1 + slot as f32 * 0.1;
    Vec3::new(x, BELT_HEIGHT, z)
}

/// Runs the demo and returns its totals.
pub fn run(config: &TransportConfig, options: RunOptions) -> Result<RunSummary> {
    ensure!(
        options.dt.is_finite() && options.dt > 0.0,
        "--dt must be positive, got {}",
        options.dt
    );
    ensure!(
        options.speed.is_finite(),
        "--speed must be finite, got {}",
        options.speed
    );

    let (mut scene, surfaces) = demo_line(options.speed);
    let mut units = Vec::with_capacity(options.bodies);
    let mut system = TransportSystem::new();
    for i in 0..options.bodies {
        let id = UnitId(i as u64);
        let name = format!("unit-{i}");
        units.push(if i % SPAWN_SOURCE_EVERY == SPAWN_SOURCE_EVERY - 1 {
            CarriedUnit::spawn_source(id, name)
        } else {
            CarriedUnit::new(id, name)
        });
    }
    for (i, unit) in units.iter_mut().enumerate() {
        let body = TransportBody::builder(config)
            .with_rigid_body(RigidBody::new(Pose::at(start_position(i))))
            .with_unit(unit)
            .build()?;
        system.push(body);
    }
    info!(
        bodies = system.len(),
        ticks = options.ticks,
        sequential = options.sequential,
        "starting demo run"
    );

    let realize_at = options.ticks / 4;
    let mut totals = StepReport::default();
    let mut last = StepReport::default();
    let mut step_time = Duration::ZERO;
    for t in 0..options.ticks {
        if t == realize_at {
            let mut realized = 0usize;
            for unit in units.iter_mut().filter(|u| u.is_spawn_source()) {
                unit.realize_spawn();
                realized += 1;
            }
            debug!(tick = t, realized, "spawn sources realized");
        }
        let started = Instant::now();
        last = if options.sequential {
            system.step(&scene)
        } else {
            system.step_parallel(&scene)
        };
        step_time += started.elapsed();
        totals = totals.merge(last);
        system.integrate(options.dt, GRAVITY);
        scene.advance(f64::from(options.dt));
    }

    let surfaces = surfaces
        .into_iter()
        .map(|(id, label)| SurfaceRow {
            id,
            label,
            drive: scene.surface_ref(id).map_or(0.0, |s| s.drive().position()),
            bodies: system
                .bodies()
                .iter()
                .filter(|b| b.state().surface() == Some(id))
                .count(),
        })
        .collect();

    let summary = RunSummary {
        options,
        totals,
        last,
        surfaces,
        step_time,
    };
    info!(
        entered = summary.totals.entered,
        left = summary.totals.left,
        carried = summary.last.carried(),
        mean_step_us = summary.mean_step().as_micros(),
        "demo run finished"
    );
    Ok(summary)
}

/// Renders the summary as two plain-text tables.
pub fn render(summary: &RunSummary) -> (Table, Table) {
    let mode = if summary.options.sequential {
        "sequential"
    } else {
        "parallel"
    };
    let mut totals = Table::new();
    totals
        .load_preset(UTF8_FULL)
        .set_header(vec!["metric", "value"]);
    let rows: [(&str, String); 10] = [
        ("bodies", summary.options.bodies.to_string()),
        ("ticks", summary.options.ticks.to_string()),
        ("mode", mode.to_owned()),
        ("entered", summary.totals.entered.to_string()),
        ("left", summary.totals.left.to_string()),
        ("exempt ticks", summary.totals.exempt.to_string()),
        ("carried at end", summary.last.carried().to_string()),
        (
            "free at end",
            (summary.last.free + summary.last.left).to_string(),
        ),
        ("pinned at end", summary.last.pinned.to_string()),
        (
            "mean step",
            format!("{} µs", summary.mean_step().as_micros()),
        ),
    ];
    for (name, value) in rows {
        totals.add_row(vec![
            Cell::new(name),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }

    let mut surfaces = Table::new();
    surfaces
        .load_preset(UTF8_FULL)
        .set_header(vec!["surface", "id", "drive", "bodies"]);
    for row in &summary.surfaces {
        surfaces.add_row(vec![
            Cell::new(row.label),
            Cell::new(row.id.0).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", row.drive)).set_alignment(CellAlignment::Right),
            Cell::new(row.bodies).set_alignment(CellAlignment::Right),
        ]);
    }
    (totals, surfaces)
}
