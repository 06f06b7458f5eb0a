// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic math helpers covering scalar utilities, vectors and
//! quaternions.
//!
//! All operations round to `f32`. The world is Y-up and right-handed; a body's
//! local forward axis is `+Z`.

use std::f32::consts::TAU;

mod quat;
mod vec3;

pub use quat::Quat;
pub use vec3::Vec3;

/// Global epsilon used by math routines when detecting degenerate values.
pub const EPSILON: f32 = 1e-6;

/// Converts degrees to radians with float32 precision.
pub fn deg_to_rad(value: f32) -> f32 {
    value * (TAU / 360.0)
}

/// Converts radians to degrees with float32 precision.
pub fn rad_to_deg(value: f32) -> f32 {
    value * (360.0 / TAU)
}

/// Rounds an angle in degrees to the nearest multiple of 90°.
pub fn snap_quarter_turn(degrees: f32) -> f32 {
    (degrees / 90.0).round() * 90.0
}
