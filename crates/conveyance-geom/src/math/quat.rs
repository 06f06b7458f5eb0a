// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{deg_to_rad, Vec3, EPSILON};

/// Quaternion stored as `(x, y, z, w)` with deterministic float32 rounding.
///
/// * All angles passed to constructors are radians unless the method name
///   says otherwise.
/// * Rotations act on column vectors: `a.multiply(&b)` applies `b` first and
///   then `a`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    data: [f32; 4],
}

impl Quat {
    /// Creates a quaternion from components.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// Returns the quaternion as an array.
    pub fn to_array(self) -> [f32; 4] {
        self.data
    }

    fn component(&self, idx: usize) -> f32 {
        self.data[idx]
    }

    /// Returns the identity quaternion.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Constructs a quaternion from a rotation axis and angle in radians.
    ///
    /// Returns the identity quaternion when the axis length is ≤ `EPSILON`.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let len_sq = axis.length_squared();
        if len_sq <= EPSILON * EPSILON {
            return Self::identity();
        }
        let norm_axis = axis.scale(1.0 / len_sq.sqrt());
        let (sin_half, cos_half) = (angle * 0.5).sin_cos();
        let scaled = norm_axis.scale(sin_half);
        Self::new(
            scaled.component(0),
            scaled.component(1),
            scaled.component(2),
            cos_half,
        )
    }

    /// Same as [`Quat::from_axis_angle`] with the angle given in degrees.
    pub fn from_axis_angle_deg(axis: Vec3, degrees: f32) -> Self {
        Self::from_axis_angle(axis, deg_to_rad(degrees))
    }

    /// Builds the rotation whose local `+Z` points along `forward` and whose
    /// local `+Y` is as close to `up` as possible.
    ///
    /// When `forward` is degenerate the identity is returned. When `forward`
    /// is parallel to `up`, `+X` is used as the secondary reference so the
    /// result stays well defined.
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let z = forward.normalize();
        if z == Vec3::ZERO {
            return Self::identity();
        }
        let mut x = up.cross(&z).normalize();
        if x == Vec3::ZERO {
            x = Vec3::UNIT_X.reject(&z).normalize();
            if x == Vec3::ZERO {
                x = Vec3::UNIT_Z.reject(&z).normalize();
            }
        }
        let y = z.cross(&x);
        Self::from_basis(x, y, z)
    }

    /// Converts an orthonormal basis (the rotated local axes) into a unit
    /// quaternion.
    fn from_basis(x: Vec3, y: Vec3, z: Vec3) -> Self {
        let (m00, m01, m02) = (x.x(), y.x(), z.x());
        let (m10, m11, m12) = (x.y(), y.y(), z.y());
        let (m20, m21, m22) = (x.z(), y.z(), z.z());
        let trace = m00 + m11 + m22;
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        };
        q.normalize()
    }

    /// Hamilton product of two quaternions (`self * other`).
    ///
    /// Operand order matters: the composed rotation applies `other` first and
    /// then `self`.
    pub fn multiply(&self, other: &Self) -> Self {
        let ax = self.component(0);
        let ay = self.component(1);
        let az = self.component(2);
        let aw = self.component(3);

        let bx = other.component(0);
        let by = other.component(1);
        let bz = other.component(2);
        let bw = other.component(3);

        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// Normalises the quaternion; returns identity when norm is ~0.
    pub fn normalize(&self) -> Self {
        let len = (self.component(0) * self.component(0)
            + self.component(1) * self.component(1)
            + self.component(2) * self.component(2)
            + self.component(3) * self.component(3))
        .sqrt();
        if len <= EPSILON {
            return Self::identity();
        }
        let inv = 1.0 / len;
        Self::new(
            self.component(0) * inv,
            self.component(1) * inv,
            self.component(2) * inv,
            self.component(3) * inv,
        )
    }

    /// Rotates a vector by this (unit) quaternion.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        let q = Vec3::new(self.component(0), self.component(1), self.component(2));
        let w = self.component(3);
        let t = q.cross(v).scale(2.0);
        v.add(&t.scale(w)).add(&q.cross(&t))
    }

    /// The rotated local forward axis (`+Z`).
    pub fn forward(&self) -> Vec3 {
        self.rotate(&Vec3::UNIT_Z)
    }
}

impl From<[f32; 4]> for Quat {
    fn from(value: [f32; 4]) -> Self {
        Self { data: value }
    }
}
