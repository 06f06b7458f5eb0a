// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drive-synchronized kinematic mover.
//!
//! Distance travelled is derived from the drive, never from elapsed time:
//! each tick contributes `(drive - last_drive) / length_scale`, so the sum
//! over any run telescopes to the total drive delta and cannot drift.

use conveyance_geom::{Pose, Quat, Vec3};

use crate::state::GuidedState;
use crate::surface::GuidedSurface;

/// Converts drive progress into poses along a guided surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DriveMover {
    length_scale: f64,
}

impl DriveMover {
    /// Creates a mover for drives counting `length_scale` units per world
    /// unit.
    pub fn new(length_scale: f64) -> Self {
        Self { length_scale }
    }

    /// Drive units per world unit.
    pub fn length_scale(&self) -> f64 {
        self.length_scale
    }

    /// World-space distance covered between two drive readings.
    ///
    /// The subtraction happens in f64 before narrowing, so large absolute
    /// drive positions do not lose the per-tick delta.
    #[allow(clippy::cast_possible_truncation)]
    pub fn displacement(&self, last_drive: f64, drive: f64) -> f32 {
        ((drive - last_drive) / self.length_scale) as f32
    }

    /// Computes this tick's pose and advances the drive baseline.
    ///
    /// `offset_deg` rotates the body about world up relative to the surface
    /// direction.
    pub fn advance(
        &self,
        guided: &mut GuidedState,
        surface: &dyn GuidedSurface,
        position: Vec3,
        offset_deg: f32,
    ) -> Pose {
        let point = surface.closest_point(position);
        let normal = surface.closest_direction(position);
        let rotation = Quat::look_rotation(normal, Vec3::UP)
            .multiply(&Quat::from_axis_angle_deg(Vec3::UP, offset_deg));
        let drive = surface.drive_position();
        let delta = self.displacement(guided.last_drive, drive);
        guided.last_drive = drive;
        Pose::new(point.add(&normal.scale(delta)), rotation)
    }
}

impl Default for DriveMover {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SurfaceId;

    struct Line {
        drive: f64,
    }

    impl GuidedSurface for Line {
        fn is_guiding(&self) -> bool {
            true
        }
        fn closest_point(&self, position: Vec3) -> Vec3 {
            Vec3::new(position.x(), 0.0, 0.0)
        }
        fn closest_direction(&self, _position: Vec3) -> Vec3 {
            Vec3::UNIT_X
        }
        fn drive_position(&self) -> f64 {
            self.drive
        }
    }

    #[test]
    fn moves_by_scaled_drive_delta() {
        let mover = DriveMover::default();
        let mut g = GuidedState {
            surface: SurfaceId(0),
            last_drive: 1000.0,
        };
        let line = Line { drive: 1250.0 };
        let pose = mover.advance(&mut g, &line, Vec3::new(2.0, 0.1, 0.3), 0.0);
        assert!(pose.position().distance(&Vec3::new(2.25, 0.0, 0.0)) < 1e-5);
        assert_eq!(g.last_drive, 1250.0);
    }

    #[test]
    fn unchanged_drive_snaps_to_path_only() {
        let mover = DriveMover::new(1.0);
        let mut g = GuidedState {
            surface: SurfaceId(0),
            last_drive: 5.0,
        };
        let pose = mover.advance(&mut g, &Line { drive: 5.0 }, Vec3::new(1.0, 0.2, 0.4), 0.0);
        assert_eq!(pose.position(), Vec3::new(1.0, 0.0, 0.0));
        assert!(pose.forward().distance(&Vec3::UNIT_X) < 1e-5);
    }

    #[test]
    fn offset_turns_body_about_up() {
        let mover = DriveMover::new(1.0);
        let mut g = GuidedState {
            surface: SurfaceId(0),
            last_drive: 0.0,
        };
        let pose = mover.advance(&mut g, &Line { drive: 0.0 }, Vec3::ZERO, 90.0);
        // Facing +X, a quarter turn about +Y faces -Z.
        assert!(pose.forward().distance(&Vec3::new(0.0, 0.0, -1.0)) < 1e-5);
    }

    #[test]
    fn large_drive_positions_keep_small_deltas() {
        let mover = DriveMover::default();
        assert!((mover.displacement(1.0e12, 1.0e12 + 1.0) - 0.001).abs() < 1e-9);
    }
}
