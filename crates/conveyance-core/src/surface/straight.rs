// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Straight belts between two points.

use conveyance_geom::math::EPSILON;
use conveyance_geom::{Aabb, Vec3};

use crate::scene::index::ColliderShape;
use crate::surface::{Drive, GuidedSurface};

/// Default belt thickness below the top face, in metres.
pub const DEFAULT_BELT_THICKNESS: f32 = 0.05;

/// Straight belt whose top-face centre line runs from `start` to `end`.
///
/// Guided bodies are pulled onto the centre line and pushed towards `end` by
/// the drive.
#[derive(Debug, Clone, PartialEq)]
pub struct StraightConveyor {
    start: Vec3,
    end: Vec3,
    width: f32,
    thickness: f32,
    guiding: bool,
    drive: Drive,
}

impl StraightConveyor {
    /// Creates a guiding belt with a stopped drive.
    pub fn new(start: Vec3, end: Vec3, width: f32) -> Self {
        Self {
            start,
            end,
            width: width.abs(),
            thickness: DEFAULT_BELT_THICKNESS,
            guiding: true,
            drive: Drive::stopped(),
        }
    }

    /// Replaces the drive.
    #[must_use]
    pub fn with_drive(mut self, drive: Drive) -> Self {
        self.drive = drive;
        self
    }

    /// Sets the belt thickness below the top face.
    #[must_use]
    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness.abs();
        self
    }

    /// Start of the centre line.
    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// End of the centre line.
    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// Belt length along the centre line.
    pub fn length(&self) -> f32 {
        self.end.distance(&self.start)
    }

    /// Unit transport direction (`+Z` for a degenerate belt).
    pub fn direction(&self) -> Vec3 {
        let d = self.end.sub(&self.start).normalize();
        if d == Vec3::ZERO {
            Vec3::UNIT_Z
        } else {
            d
        }
    }

    /// The drive powering the belt.
    pub fn drive(&self) -> &Drive {
        &self.drive
    }

    /// Mutable access to the drive.
    pub fn drive_mut(&mut self) -> &mut Drive {
        &mut self.drive
    }

    /// Switches guidance on or off.
    pub fn set_guiding(&mut self, guiding: bool) {
        self.guiding = guiding;
    }

    /// World-space bounds of the belt body (top face down to `thickness`).
    pub fn bounds(&self) -> Aabb {
        let dir = self.direction();
        let lateral = Vec3::UP.cross(&dir).normalize().scale(self.width * 0.5);
        let drop = Vec3::new(0.0, -self.thickness, 0.0);
        let corners = [
            self.start.add(&lateral),
            self.start.sub(&lateral),
            self.end.add(&lateral),
            self.end.sub(&lateral),
        ];
        corners.iter().fold(
            Aabb::new(self.start.add(&drop), self.start),
            |acc, c| {
                acc.union(&Aabb::new(*c, *c))
                    .union(&Aabb::new(c.add(&drop), c.add(&drop)))
            },
        )
    }

    /// Collider used by the scene for probe queries.
    pub fn collider_shape(&self) -> ColliderShape {
        ColliderShape::Box(self.bounds())
    }
}

impl GuidedSurface for StraightConveyor {
    fn is_guiding(&self) -> bool {
        self.guiding
    }

    fn closest_point(&self, position: Vec3) -> Vec3 {
        let d = self.end.sub(&self.start);
        let len_sq = d.length_squared();
        if len_sq <= EPSILON {
            return self.start;
        }
        let t = (position.sub(&self.start).dot(&d) / len_sq).clamp(0.0, 1.0);
        self.start.add(&d.scale(t))
    }

    fn closest_direction(&self, _position: Vec3) -> Vec3 {
        self.direction()
    }

    fn drive_position(&self) -> f64 {
        self.drive.position()
    }
}
