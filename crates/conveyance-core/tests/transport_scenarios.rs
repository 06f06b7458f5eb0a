// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! End-to-end behaviour of a single transport body against a scripted scene.

use conveyance_core::geom::{Pose, Quat, Tick, Vec3};
use conveyance_core::{
    AngleOffset, CarriedUnit, FixedStep, GizmoColor, LeaveReason, ObjectId, PhysicsMode,
    RigidBody, RigidBodyHandle, StepOutcome, SurfaceProbe, TransportBody, TransportConfig,
    TransportError, UnitId,
};
use conveyance_dry_tests::{
    body_at, free_unit, sample, DrawCall, LineSurface, RecordingDraw, ScriptedScene,
};

const BELT: ObjectId = ObjectId(1);

fn belt_scene() -> (ScriptedScene, conveyance_core::SurfaceId) {
    let mut scene = ScriptedScene::new();
    let id = scene.add_surface(LineSurface::along_x());
    scene.bind(BELT, id);
    (scene, id)
}

fn close(a: Vec3, b: Vec3) -> bool {
    a.distance(&b) < 1e-5
}

#[test]
fn scenario_enter_move_leave() {
    let (mut scene, id) = belt_scene();
    let mut unit = free_unit(1);
    let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::new(0.0, 0.05, 0.2));

    scene.hit(BELT, 0.1);
    assert_eq!(body.fixed_step(&scene, Tick::new(0)), StepOutcome::Entered(id));
    assert_eq!(body.rigid().mode(), PhysicsMode::Kinematic);
    // Entry tick moves by zero drive delta: only snapped onto the path.
    assert!(close(body.rigid().pose().position(), Vec3::ZERO));

    scene.surface_mut(id).unwrap().advance_drive(500.0);
    assert_eq!(body.fixed_step(&scene, Tick::new(1)), StepOutcome::Guided(id));
    assert!(close(body.rigid().pose().position(), Vec3::new(0.5, 0.0, 0.0)));
    assert!(close(body.rigid().pose().forward(), Vec3::UNIT_X));

    scene.clear_hits();
    assert_eq!(
        body.fixed_step(&scene, Tick::new(2)),
        StepOutcome::Left(LeaveReason::NoHit)
    );
    assert_eq!(body.rigid().mode(), PhysicsMode::Dynamic);
    assert!(!body.is_guided());

    // The drive keeps running but the body is no longer written.
    let released = body.rigid().pose();
    scene.surface_mut(id).unwrap().advance_drive(500.0);
    assert_eq!(body.fixed_step(&scene, Tick::new(3)), StepOutcome::Free);
    assert_eq!(body.rigid().pose(), released);
}

#[test]
fn scenario_nearest_of_two_hits_wins() {
    let (mut scene, id) = belt_scene();
    scene.set_hits(&[sample(9, 0.3), sample(BELT.0, 0.1)]);

    let mut probe = SurfaceProbe::from_config(&TransportConfig::default());
    let hit = probe.probe(&scene, Vec3::ZERO).unwrap();
    assert_eq!(hit.object, BELT);
    assert_eq!(hit.distance, 0.1);

    let mut unit = free_unit(1);
    let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::ZERO);
    assert_eq!(body.fixed_step(&scene, Tick::ZERO), StepOutcome::Entered(id));
}

#[test]
fn scenario_unchanged_hit_queries_capability_once() {
    let (mut scene, id) = belt_scene();
    let mut unit = free_unit(1);
    let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::ZERO);
    scene.hit(BELT, 0.05);

    for t in 0..100 {
        let outcome = body.fixed_step(&scene, Tick::new(t));
        assert!(matches!(
            outcome,
            StepOutcome::Entered(_) | StepOutcome::Guided(_)
        ));
    }
    assert_eq!(scene.raycast_count(), 100);
    assert_eq!(scene.lookup_count(), 1);
    assert_eq!(scene.line(id).unwrap().guiding_calls(), 1);
}

#[test]
fn pinned_body_stays_free_and_reevaluates_after_unpin() {
    let (mut scene, id) = belt_scene();
    let mut unit = free_unit(1);
    let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::ZERO);
    scene.hit(BELT, 0.05);
    body.fixed_step(&scene, Tick::new(0));
    assert!(body.is_guided());

    unit.set_pinned(true);
    assert!(body.is_pinned());
    for t in 1..5 {
        assert_eq!(body.fixed_step(&scene, Tick::new(t)), StepOutcome::Pinned);
        assert!(!body.is_guided());
        assert_eq!(body.rigid().mode(), PhysicsMode::Dynamic);
    }
    // The probe is skipped while pinned.
    assert_eq!(scene.raycast_count(), 1);

    unit.set_pinned(false);
    assert_eq!(body.fixed_step(&scene, Tick::new(5)), StepOutcome::Entered(id));
    assert_eq!(scene.lookup_count(), 2);
}

#[test]
fn detached_body_stops_following_its_unit() {
    let config = TransportConfig::default();
    let mut unit = free_unit(4);
    let first = body_at(&config, &mut unit, Vec3::ZERO);
    assert_eq!(unit.listener_count(), 1);

    assert!(first.detach(&mut unit));
    assert!(!first.detach(&mut unit));
    let second = body_at(&config, &mut unit, Vec3::ZERO);
    assert_eq!(unit.listener_count(), 1);
    assert_ne!(first.subscription(), second.subscription());

    unit.set_pinned(true);
    assert!(second.is_pinned());
    assert!(!first.is_pinned());
}

#[test]
fn dropped_body_leaves_an_inert_listener() {
    let config = TransportConfig::default();
    let mut unit = free_unit(5);
    drop(body_at(&config, &mut unit, Vec3::ZERO));
    unit.set_pinned(true);
    unit.set_pinned(false);
    let body = body_at(&config, &mut unit, Vec3::ZERO);
    unit.set_pinned(true);
    assert!(body.is_pinned());
}

#[test]
fn spawn_source_is_exempt_until_realized() {
    let (mut scene, id) = belt_scene();
    scene.hit(BELT, 0.05);
    let mut unit = CarriedUnit::spawn_source(UnitId(7), "spawner");
    let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::ZERO);

    assert!(body.is_spawn_exempt());
    for t in 0..3 {
        assert_eq!(body.fixed_step(&scene, Tick::new(t)), StepOutcome::Exempt);
    }
    assert_eq!(scene.raycast_count(), 0);

    // Pinning does not lift the exemption.
    unit.set_pinned(true);
    unit.set_pinned(false);
    assert_eq!(body.fixed_step(&scene, Tick::new(3)), StepOutcome::Exempt);

    unit.realize_spawn();
    assert!(!body.is_spawn_exempt());
    assert_eq!(body.fixed_step(&scene, Tick::new(4)), StepOutcome::Entered(id));
}

#[test]
fn destroyed_surface_releases_body() {
    let (mut scene, id) = belt_scene();
    let mut unit = free_unit(1);
    let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::ZERO);
    scene.hit(BELT, 0.05);
    body.fixed_step(&scene, Tick::new(0));

    assert!(scene.remove_surface(id).is_some());
    assert_eq!(
        body.fixed_step(&scene, Tick::new(1)),
        StepOutcome::Left(LeaveReason::SurfaceGone)
    );
    assert_eq!(body.rigid().mode(), PhysicsMode::Dynamic);
    // The stale binding is re-evaluated as a fresh edge and finds nothing.
    assert_eq!(
        body.fixed_step(&scene, Tick::new(2)),
        StepOutcome::Left(LeaveReason::NoCapability)
    );
    assert!(!body.is_guided());
}

#[test]
fn handover_to_second_surface_rebaselines() {
    let (mut scene, first) = belt_scene();
    let mut far = LineSurface::new(Vec3::new(0.0, 0.0, 1.0), Vec3::UNIT_X);
    far.set_drive(5000.0);
    let second = scene.add_surface(far);
    scene.bind(ObjectId(2), second);

    let mut unit = free_unit(1);
    let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::ZERO);
    scene.hit(BELT, 0.05);
    body.fixed_step(&scene, Tick::new(0));
    scene.surface_mut(first).unwrap().advance_drive(250.0);
    body.fixed_step(&scene, Tick::new(1));
    let before = body.rigid().pose().position();

    scene.hit(ObjectId(2), 0.05);
    assert_eq!(
        body.fixed_step(&scene, Tick::new(2)),
        StepOutcome::Entered(second)
    );
    assert_eq!(body.state().surface(), Some(second));
    // Only moved sideways onto the new path; no jump from the second drive.
    let after = body.rigid().pose().position();
    assert!(close(after, Vec3::new(before.x(), 0.0, 1.0)), "{after:?}");

    scene.surface_mut(second).unwrap().advance_drive(100.0);
    body.fixed_step(&scene, Tick::new(3));
    assert!((body.rigid().pose().position().x() - (before.x() + 0.1)).abs() < 1e-5);
}

#[test]
fn same_object_on_non_guiding_surface_is_left_defensively() {
    let (mut scene, id) = belt_scene();
    scene.surface_mut(id).unwrap().set_guiding(false);
    let mut unit = free_unit(1);
    let mut body = body_at(&TransportConfig::default(), &mut unit, Vec3::ZERO);
    scene.hit(BELT, 0.05);
    assert_eq!(
        body.fixed_step(&scene, Tick::ZERO),
        StepOutcome::Left(LeaveReason::NotGuiding)
    );
    // Turning guidance on later is not noticed while the hit is unchanged.
    scene.surface_mut(id).unwrap().set_guiding(true);
    assert_eq!(body.fixed_step(&scene, Tick::new(1)), StepOutcome::Free);
}

#[test]
fn snap_on_entry_rounds_heading_to_quarter_turns() {
    let (mut scene, _) = belt_scene();
    scene.hit(BELT, 0.05);
    let mut unit = free_unit(1);
    // Facing 170° about +Y from +Z: 80° past the belt's +X heading.
    let rigid = RigidBody::new(Pose::new(
        Vec3::ZERO,
        Quat::from_axis_angle_deg(Vec3::UP, 170.0),
    ));
    let mut body = TransportBody::builder(&TransportConfig::default())
        .with_rigid_body(rigid)
        .with_unit(&mut unit)
        .with_angle_offset(AngleOffset::SnapOnEntry)
        .build()
        .unwrap();

    body.fixed_step(&scene, Tick::ZERO);
    assert_eq!(body.offset_deg(), 90.0);
    assert!(close(body.rigid().pose().forward(), Vec3::new(0.0, 0.0, -1.0)));
}

#[test]
fn fixed_offset_is_applied_while_guided() {
    let (mut scene, _) = belt_scene();
    scene.hit(BELT, 0.05);
    let mut unit = free_unit(1);
    let mut body = TransportBody::builder(&TransportConfig::default())
        .with_rigid_body(RigidBody::default())
        .with_unit(&mut unit)
        .with_angle_offset(AngleOffset::Fixed(180.0))
        .build()
        .unwrap();
    body.fixed_step(&scene, Tick::ZERO);
    assert!(close(body.rigid().pose().forward(), Vec3::new(-1.0, 0.0, 0.0)));
}

#[test]
fn builder_reports_missing_collaborators() {
    let config = TransportConfig::default();
    let mut unit = free_unit(1);
    let no_rigid = TransportBody::<RigidBody>::builder(&config)
        .with_unit(&mut unit)
        .build();
    assert_eq!(no_rigid.err(), Some(TransportError::MissingRigidBody));

    let no_unit = TransportBody::builder(&config)
        .with_rigid_body(RigidBody::default())
        .build();
    assert_eq!(no_unit.err(), Some(TransportError::MissingUnit));

    let bad = TransportConfig {
        ray_length: -1.0,
        ..TransportConfig::default()
    };
    let invalid = TransportBody::builder(&bad)
        .with_rigid_body(RigidBody::default())
        .with_unit(&mut unit)
        .build();
    assert!(matches!(invalid, Err(TransportError::InvalidConfig(_))));
}

#[test]
fn debug_hooks_are_silent_unless_enabled() {
    let (mut scene, id) = belt_scene();
    scene.hit(BELT, 0.05);

    let mut quiet_unit = free_unit(1);
    let mut quiet = body_at(&TransportConfig::default(), &mut quiet_unit, Vec3::ZERO);
    quiet.fixed_step(&scene, Tick::ZERO);
    let mut draw = RecordingDraw::new();
    quiet.debug_draw(&scene, &mut draw);
    assert!(draw.calls.is_empty());
    assert!(quiet.debug_info().is_none());

    let loud_config = TransportConfig {
        debug: true,
        ..TransportConfig::default()
    };
    let mut loud_unit = free_unit(2);
    let mut loud = body_at(&loud_config, &mut loud_unit, Vec3::ZERO);
    loud.fixed_step(&scene, Tick::ZERO);
    loud.debug_draw(&scene, &mut draw);
    assert_eq!(draw.count(GizmoColor::Green), 2);
    assert_eq!(draw.count(GizmoColor::Yellow), 2);
    assert_eq!(draw.count(GizmoColor::Blue), 1);
    assert_eq!(draw.count(GizmoColor::Red), 0);
    // Path direction and forward axis both start at the body.
    let lines: Vec<_> = draw
        .calls
        .iter()
        .filter_map(|c| match *c {
            DrawCall::Line { from, to, color } if color != GizmoColor::Green => {
                Some((from, to))
            }
            _ => None,
        })
        .collect();
    assert_eq!(lines.len(), 2);
    let at = loud.rigid().pose().position();
    for (from, to) in lines {
        assert!(close(from, at));
        assert!(close(to, at.add(&Vec3::UNIT_X.scale(0.2))));
    }
    let info = loud.debug_info().unwrap();
    assert_eq!(info.surface, Some(id));
    assert_eq!(info.current_hit, Some(BELT));
    assert_eq!(info.last_hit, Some(BELT));
}
