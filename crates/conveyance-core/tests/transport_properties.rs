// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Property tests: Guided-iff, physics mode coupling and drift-free motion.

use conveyance_core::geom::{Tick, Vec3};
use conveyance_core::{
    DriveMover, FixedStep, ObjectId, PhysicsMode, RigidBodyHandle, TransportConfig,
};
use conveyance_dry_tests::{body_at, free_unit, LineSurface, ScriptedScene};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Event {
    Hit(u32),
    Miss,
    Pin(bool),
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        6 => (0u32..5).prop_map(Event::Hit),
        2 => Just(Event::Miss),
        1 => any::<bool>().prop_map(Event::Pin),
    ]
}

/// Objects 1 and 3 carry guiding surfaces, 2 a non-guiding one, 0 and 4
/// nothing.
fn scene() -> ScriptedScene {
    let mut scene = ScriptedScene::new();
    let a = scene.add_surface(LineSurface::along_x());
    let mut b = LineSurface::new(Vec3::new(0.0, 0.0, 2.0), Vec3::UNIT_X);
    b.set_guiding(false);
    let b = scene.add_surface(b);
    let c = scene.add_surface(LineSurface::new(Vec3::ZERO, Vec3::UNIT_Z));
    scene.bind(ObjectId(1), a);
    scene.bind(ObjectId(2), b);
    scene.bind(ObjectId(3), c);
    scene
}

fn guides(object: u32) -> bool {
    matches!(object, 1 | 3)
}

proptest! {
    #[test]
    fn guided_iff_last_edge_resolved_to_guiding_surface(
        events in prop::collection::vec(event(), 1..120)
    ) {
        let mut scene = scene();
        let mut unit = free_unit(1);
        let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::ZERO);

        let mut last_hit: Option<u32> = None;
        let mut guided = false;
        let mut pinned = false;
        let mut script: Option<u32> = None;

        for (t, ev) in events.iter().enumerate() {
            match *ev {
                Event::Hit(o) => {
                    scene.hit(ObjectId(o), 0.05);
                    script = Some(o);
                }
                Event::Miss => {
                    scene.clear_hits();
                    script = None;
                }
                Event::Pin(p) => {
                    unit.set_pinned(p);
                    pinned = p;
                }
            }
            body.fixed_step(&scene, Tick::new(t as u64));

            if pinned {
                guided = false;
                last_hit = None;
            } else {
                match script {
                    None => {
                        guided = false;
                        last_hit = None;
                    }
                    Some(o) if last_hit != Some(o) => {
                        last_hit = Some(o);
                        guided = guides(o);
                    }
                    Some(_) => {}
                }
            }

            prop_assert_eq!(body.is_guided(), guided, "tick {} after {:?}", t, ev);
            let kinematic = body.rigid().mode() == PhysicsMode::Kinematic;
            prop_assert_eq!(kinematic, guided);
        }
    }

    #[test]
    fn mover_displacements_telescope(
        d0 in 0.0f64..1.0e9,
        deltas in prop::collection::vec(-50.0f64..500.0, 1..300),
        scale in prop_oneof![Just(1.0f64), Just(1000.0f64), 0.5f64..5000.0],
    ) {
        let mover = DriveMover::new(scale);
        let mut last = d0;
        let mut sum = 0.0f64;
        let mut magnitude = 0.0f64;
        for d in &deltas {
            let next = last + d;
            let step = f64::from(mover.displacement(last, next));
            sum += step;
            magnitude += step.abs();
            last = next;
        }
        let expected = (last - d0) / scale;
        // Only the per-step f32 narrowing may contribute error.
        let bound = 1e-6 * magnitude + 1e-9;
        prop_assert!((sum - expected).abs() <= bound, "sum {} expected {}", sum, expected);
    }

    #[test]
    fn guided_body_travel_matches_total_drive_delta(
        d0 in 0.0f64..1.0e7,
        deltas in prop::collection::vec(0.0f64..200.0, 1..150),
    ) {
        let mut scene = ScriptedScene::new();
        let mut line = LineSurface::along_x();
        line.set_drive(d0);
        let id = scene.add_surface(line);
        scene.bind(ObjectId(1), id);
        scene.hit(ObjectId(1), 0.05);

        let mut unit = free_unit(1);
        let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::ZERO);
        body.fixed_step(&scene, Tick::ZERO);
        let start = body.rigid().pose().position().x();

        for (t, d) in deltas.iter().enumerate() {
            if let Some(s) = scene.surface_mut(id) {
                s.advance_drive(*d);
            }
            body.fixed_step(&scene, Tick::new(t as u64 + 1));
        }
        let total: f64 = deltas.iter().sum();
        let travelled = f64::from(body.rigid().pose().position().x() - start);
        let expected = total / 1000.0;
        let bound = 1e-5 * deltas.len() as f64 * (1.0 + expected.abs());
        prop_assert!((travelled - expected).abs() <= bound, "{} vs {}", travelled, expected);
    }
}
