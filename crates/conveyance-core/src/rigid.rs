// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Default point-mass rigid body used when no host physics engine is plugged in.

use conveyance_geom::{Pose, Vec3};

use crate::physics::{PhysicsMode, RigidBodyHandle};

/// Minimal point-mass rigid body with explicit Euler integration.
///
/// Stands in for a host physics engine; it carries just enough state to
/// exercise the mode switch and to let free bodies fall onto belts.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pose: Pose,
    velocity: Vec3,
    mode: PhysicsMode,
}

impl RigidBody {
    /// A resting dynamic body at `pose`.
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            velocity: Vec3::ZERO,
            mode: PhysicsMode::Dynamic,
        }
    }

    /// Linear velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Overrides linear velocity (ignored while kinematic).
    pub fn set_velocity(&mut self, velocity: Vec3) {
        if self.mode == PhysicsMode::Dynamic {
            self.velocity = velocity;
        }
    }

    /// Integrates one step of `dt` seconds under `gravity`.
    ///
    /// Kinematic bodies are left untouched.
    pub fn integrate(&mut self, dt: f32, gravity: Vec3) {
        if self.mode == PhysicsMode::Kinematic {
            return;
        }
        self.velocity = self.velocity.add(&gravity.scale(dt));
        let position = self.pose.position().add(&self.velocity.scale(dt));
        self.pose = self.pose.with_position(position);
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(Pose::identity())
    }
}

impl RigidBodyHandle for RigidBody {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn mode(&self) -> PhysicsMode {
        self.mode
    }

    fn disable_physics(&mut self) -> bool {
        self.velocity = Vec3::ZERO;
        if self.mode == PhysicsMode::Kinematic {
            return false;
        }
        self.mode = PhysicsMode::Kinematic;
        true
    }

    fn enable_physics(&mut self) -> bool {
        if self.mode == PhysicsMode::Dynamic {
            return false;
        }
        self.mode = PhysicsMode::Dynamic;
        true
    }

    fn move_kinematic(&mut self, pose: Pose) {
        self.pose = pose;
    }
}
