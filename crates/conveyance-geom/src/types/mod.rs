// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by the transport core (AABB, ray, pose).
//!
//! Determinism notes:
//! - Containment and slab tests are inclusive on faces so a body resting
//!   exactly on a collider's top face still reports a hit.
//! - All math is plain `f32` without fused multiply-add.

#[doc = "Axis-aligned bounding boxes (world space)."]
pub mod aabb;
#[doc = "Rigid poses (position + orientation)."]
pub mod pose;
#[doc = "Rays and ray/shape intersection tests."]
pub mod ray;
