// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Vec3, EPSILON};
use crate::types::aabb::Aabb;

/// Half-line used by spatial queries.
///
/// `direction` is normalised on construction; a degenerate direction yields a
/// ray that never hits anything.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Creates a ray from an origin and a direction (normalised here).
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray origin.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction (zero for a degenerate ray).
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin.add(&self.direction.scale(t))
    }

    /// Slab test against an AABB.
    ///
    /// Returns the entry distance in `[0, max_distance]`, or `None` on a miss.
    /// A ray starting inside the box reports distance `0.0`.
    #[must_use]
    pub fn cast_aabb(&self, aabb: &Aabb, max_distance: f32) -> Option<f32> {
        if self.direction == Vec3::ZERO || max_distance < 0.0 {
            return None;
        }
        let origin = self.origin.to_array();
        let dir = self.direction.to_array();
        let lo = aabb.min().to_array();
        let hi = aabb.max().to_array();

        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;
        for i in 0..3 {
            if dir[i].abs() < EPSILON {
                // Parallel to this slab: must already be between its planes.
                if origin[i] < lo[i] || origin[i] > hi[i] {
                    return None;
                }
            } else {
                let inv = 1.0 / dir[i];
                let t1 = (lo[i] - origin[i]) * inv;
                let t2 = (hi[i] - origin[i]) * inv;
                let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
                t_min = t_min.max(near);
                t_max = t_max.min(far);
                if t_min > t_max {
                    return None;
                }
            }
        }
        Some(t_min)
    }

    /// Intersects the horizontal plane `y = height`.
    ///
    /// Returns the distance in `[0, max_distance]`, or `None` when the ray is
    /// parallel to the plane, points away from it, or stops short.
    #[must_use]
    pub fn cast_horizontal_plane(&self, height: f32, max_distance: f32) -> Option<f32> {
        let dy = self.direction.y();
        if dy.abs() < EPSILON {
            return None;
        }
        let t = (height - self.origin.y()) / dy;
        (0.0..=max_distance).contains(&t).then_some(t)
    }
}
