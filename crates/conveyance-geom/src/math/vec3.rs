// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{rad_to_deg, EPSILON};

/// Deterministic 3D vector used throughout the transport core.
///
/// * Components encode world-space metres and may represent either points or
///   directions depending on the calling context.
/// * Arithmetic uses `f32`; no fused multiply-add is used so results are
///   identical across targets.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    data: [f32; 3],
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit vector pointing along the positive X axis.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit vector pointing along the positive Y axis (world up).
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit vector pointing along the positive Z axis (local forward).
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    /// World up axis.
    pub const UP: Self = Self::UNIT_Y;

    /// World down axis.
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);

    /// Creates a vector from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { data: [x, y, z] }
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f32; 3] {
        self.data
    }

    /// X component.
    pub fn x(&self) -> f32 {
        self.data[0]
    }

    /// Y component.
    pub fn y(&self) -> f32 {
        self.data[1]
    }

    /// Z component.
    pub fn z(&self) -> f32 {
        self.data[2]
    }

    pub(crate) fn component(&self, idx: usize) -> f32 {
        self.data[idx]
    }

    /// Adds two vectors.
    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.component(0) + other.component(0),
            self.component(1) + other.component(1),
            self.component(2) + other.component(2),
        )
    }

    /// Subtracts another vector.
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            self.component(0) - other.component(0),
            self.component(1) - other.component(1),
            self.component(2) - other.component(2),
        )
    }

    /// Scales the vector by a scalar.
    pub fn scale(&self, scalar: f32) -> Self {
        Self::new(
            self.component(0) * scalar,
            self.component(1) * scalar,
            self.component(2) * scalar,
        )
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Self) -> f32 {
        self.component(0) * other.component(0)
            + self.component(1) * other.component(1)
            + self.component(2) * other.component(2)
    }

    /// Cross product with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        let ax = self.component(0);
        let ay = self.component(1);
        let az = self.component(2);
        let bx = other.component(0);
        let by = other.component(1);
        let bz = other.component(2);
        Self::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Vector length (magnitude).
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Squared magnitude of the vector.
    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Distance between two points.
    pub fn distance(&self, other: &Self) -> f32 {
        self.sub(other).length()
    }

    /// Normalises the vector, returning the zero vector if length ≤ `EPSILON`.
    ///
    /// Degenerate inputs normalise to zero so callers can detect them
    /// deterministically.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len <= EPSILON {
            return Self::ZERO;
        }
        self.scale(1.0 / len)
    }

    /// Removes the component along `axis` (assumed unit length).
    pub fn reject(&self, axis: &Self) -> Self {
        self.sub(&axis.scale(self.dot(axis)))
    }

    /// Signed angle in degrees from `self` to `other` measured around `axis`.
    ///
    /// Both vectors are projected onto the plane orthogonal to `axis` first.
    /// Positive angles follow the right-hand rule about `axis`. Returns `0.0`
    /// when either projection is degenerate.
    pub fn signed_angle(&self, other: &Self, axis: &Self) -> f32 {
        let axis = axis.normalize();
        let a = self.reject(&axis).normalize();
        let b = other.reject(&axis).normalize();
        if a == Self::ZERO || b == Self::ZERO {
            return 0.0;
        }
        let sin = axis.dot(&a.cross(&b));
        let cos = a.dot(&b);
        rad_to_deg(sin.atan2(cos))
    }

    /// Returns `true` when all components are finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|c| c.is_finite())
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(value: [f32; 3]) -> Self {
        Self { data: value }
    }
}
