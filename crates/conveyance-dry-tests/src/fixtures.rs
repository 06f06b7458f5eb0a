// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Construction shorthands shared by integration tests.

use conveyance_core::geom::{Pose, Vec3};
use conveyance_core::{
    CarriedUnit, ObjectId, RaycastSample, RigidBody, TransportBody, TransportConfig, UnitId,
};

/// A raycast sample on `object` at `distance`, hit point at the origin.
pub fn sample(object: u32, distance: f32) -> RaycastSample {
    RaycastSample {
        object: ObjectId(object),
        point: Vec3::ZERO,
        distance,
    }
}

/// An ordinary (non spawn-source) unit.
pub fn free_unit(id: u64) -> CarriedUnit {
    CarriedUnit::new(UnitId(id), format!("unit-{id}"))
}

/// A body resting at `position`, wired to `unit`.
///
/// # Panics
/// Panics if `config` fails validation.
#[allow(clippy::expect_used)]
pub fn body_at(config: &TransportConfig, unit: &mut CarriedUnit, position: Vec3) -> TransportBody {
    TransportBody::builder(config)
        .with_rigid_body(RigidBody::new(Pose::at(position)))
        .with_unit(unit)
        .build()
        .expect("test body config must be valid")
}
