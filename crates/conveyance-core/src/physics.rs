// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Physics mode switch: the rigid-body port transport bodies drive.

use conveyance_geom::Pose;

/// Whether a rigid body is integrated by physics or posed directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum PhysicsMode {
    /// Forces and gravity integrate the body.
    #[default]
    Dynamic,
    /// The body is posed directly; integration is bypassed.
    Kinematic,
}

/// Handle to the physics body a transport body controls.
///
/// Both mode switches are idempotent: calling one repeatedly has the same
/// effect as calling it once.
pub trait RigidBodyHandle {
    /// Current world pose.
    fn pose(&self) -> Pose;

    /// Current mode.
    fn mode(&self) -> PhysicsMode;

    /// Switches to kinematic control and zeroes linear velocity.
    ///
    /// Returns `true` when the mode actually changed.
    fn disable_physics(&mut self) -> bool;

    /// Restores free dynamics.
    ///
    /// Returns `true` when the mode actually changed.
    fn enable_physics(&mut self) -> bool;

    /// Writes a pose directly, bypassing integration.
    fn move_kinematic(&mut self, pose: Pose);
}
