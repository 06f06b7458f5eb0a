// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for Conveyance.

This crate provides:
- Deterministic float32 math (`Vec3`, `Quat`) with orientation helpers.
- Axis-aligned bounding boxes (`Aabb`) and rays (`Ray`) with a slab test.
- Rigid poses (`Pose`) written by kinematic controllers.
- A discrete fixed-step tick newtype (`Tick`).

Design notes:
- Deterministic: no ambient RNG, no platform-dependent fused operations.
- Float32 throughout; values represent metres in world space, Y up.
- Rustdoc is treated as part of the contract; public items are documented.
"]

/// Deterministic scalar, vector and quaternion math.
pub mod math;
/// Time-aware utilities for fixed-step simulation.
pub mod temporal;
/// Foundational geometric types.
pub mod types;

pub use math::{Quat, Vec3};
pub use temporal::tick::Tick;
pub use types::aabb::Aabb;
pub use types::pose::Pose;
pub use types::ray::Ray;
