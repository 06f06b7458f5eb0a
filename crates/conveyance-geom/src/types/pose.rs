// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Quat, Vec3};

/// Rigid pose: world-space position plus orientation.
///
/// Conventions:
/// - `position` in metres (world space).
/// - `rotation` as a unit quaternion; the body's local forward is `+Z`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    position: Vec3,
    rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Identity pose (origin, no rotation).
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::identity(),
        }
    }

    /// Creates a pose from components.
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` with identity rotation.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self::new(position, Quat::identity())
    }

    /// Position component.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Rotation component.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// World-space forward axis.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation.forward()
    }

    /// Returns a copy with `position` replaced.
    #[must_use]
    pub fn with_position(&self, position: Vec3) -> Self {
        Self::new(position, self.rotation)
    }
}
