// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::Vec3;

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Values are `f32` and represent metres in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Constructs an AABB from its minimum and maximum corners.
    ///
    /// # Panics
    /// Panics if any component of `min` is greater than its counterpart in `max`.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        let a = min.to_array();
        let b = max.to_array();
        assert!(
            a[0] <= b[0] && a[1] <= b[1] && a[2] <= b[2],
            "invalid AABB: min > max"
        );
        Self { min, max }
    }

    /// Returns the minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Returns `true` if `p` lies inside or on the box.
    #[must_use]
    pub fn contains_point(&self, p: &Vec3) -> bool {
        let lo = self.min.to_array();
        let hi = self.max.to_array();
        let v = p.to_array();
        (0..3).all(|i| v[i] >= lo[i] && v[i] <= hi[i])
    }

    /// Returns the union of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let a = self.min.to_array();
        let b = self.max.to_array();
        let c = other.min.to_array();
        let d = other.max.to_array();
        Self {
            min: Vec3::new(a[0].min(c[0]), a[1].min(c[1]), a[2].min(c[2])),
            max: Vec3::new(b[0].max(d[0]), b[1].max(d[1]), b[2].max(d[2])),
        }
    }
}
