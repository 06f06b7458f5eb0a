// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Curved belts: a circular arc of the top face, driven along its length.

use conveyance_geom::{Quat, Vec3};

use crate::scene::index::ColliderShape;
use crate::surface::straight::DEFAULT_BELT_THICKNESS;
use crate::surface::{Drive, GuidedSurface};

/// Horizontal unit heading at `degrees` about +Y, measured from +Z.
pub(crate) fn heading(degrees: f32) -> Vec3 {
    Quat::from_axis_angle_deg(Vec3::UP, degrees).rotate(&Vec3::UNIT_Z)
}

/// Offset in degrees of `p` along an arc starting at `start_deg` and
/// sweeping `sweep_deg` (sign gives the direction), or `None` when `p` lies
/// outside the swept sector.
pub(crate) fn arc_offset(center: Vec3, start_deg: f32, sweep_deg: f32, p: Vec3) -> Option<f32> {
    let radial = p.sub(&center).reject(&Vec3::UP);
    if radial.normalize() == Vec3::ZERO {
        return None;
    }
    let a = heading(start_deg).signed_angle(&radial, &Vec3::UP);
    let rel = if sweep_deg >= 0.0 {
        a.rem_euclid(360.0)
    } else {
        (-a).rem_euclid(360.0)
    };
    (rel <= sweep_deg.abs()).then_some(rel)
}

/// Curved belt whose top-face centre line is a circular arc around `center`.
///
/// Angles are in degrees about +Y measured from +Z. A positive sweep turns
/// right-handed about +Y, i.e. from +Z towards +X.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvedConveyor {
    center: Vec3,
    radius: f32,
    width: f32,
    start_deg: f32,
    sweep_deg: f32,
    thickness: f32,
    guiding: bool,
    drive: Drive,
}

impl CurvedConveyor {
    /// Creates a guiding curve with a stopped drive.
    ///
    /// `center.y` is the height of the top face.
    pub fn new(center: Vec3, radius: f32, width: f32, start_deg: f32, sweep_deg: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
            width: width.abs(),
            start_deg,
            sweep_deg,
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

    /// Centre of the arc at top-face height.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Radius of the centre line.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Point on the centre line at the start of the sweep.
    pub fn entry_point(&self) -> Vec3 {
        self.point_at(self.start_deg)
    }

    /// Point on the centre line at the end of the sweep.
    pub fn exit_point(&self) -> Vec3 {
        self.point_at(self.start_deg + self.sweep_deg)
    }

    /// The drive powering the curve.
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

    /// Collider used by the scene for probe queries: the annular sector of
    /// the top face.
    pub fn collider_shape(&self) -> ColliderShape {
        let half = self.width * 0.5;
        ColliderShape::ArcBand {
            center: self.center,
            inner: (self.radius - half).max(0.0),
            outer: self.radius + half,
            start_deg: self.start_deg,
            sweep_deg: self.sweep_deg,
            thickness: self.thickness,
        }
    }

    fn point_at(&self, degrees: f32) -> Vec3 {
        self.center.add(&heading(degrees).scale(self.radius))
    }

    fn direction_sign(&self) -> f32 {
        if self.sweep_deg >= 0.0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Angle of the closest point on the arc, clamped to the swept range.
    fn clamped_angle(&self, position: Vec3) -> f32 {
        let radial = position.sub(&self.center).reject(&Vec3::UP);
        if radial.normalize() == Vec3::ZERO {
            return self.start_deg;
        }
        let sign = self.direction_sign();
        let a = heading(self.start_deg).signed_angle(&radial, &Vec3::UP);
        let span = self.sweep_deg.abs();
        let mut rel = (a * sign).rem_euclid(360.0);
        if rel > span {
            // Outside the sector: snap to whichever end is angularly nearer.
            rel = if rel - span < 360.0 - rel { span } else { 0.0 };
        }
        self.start_deg + rel * sign
    }
}

impl GuidedSurface for CurvedConveyor {
    fn is_guiding(&self) -> bool {
        self.guiding
    }

    fn closest_point(&self, position: Vec3) -> Vec3 {
        self.point_at(self.clamped_angle(position))
    }

    fn closest_direction(&self, position: Vec3) -> Vec3 {
        heading(self.clamped_angle(position) + 90.0 * self.direction_sign())
    }

    fn drive_position(&self) -> f64 {
        self.drive.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter() -> CurvedConveyor {
        // Starts on +Z, sweeps a quarter turn towards +X.
        CurvedConveyor::new(Vec3::new(0.0, 0.5, 0.0), 2.0, 0.6, 0.0, 90.0)
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(&b) < 1e-4
    }

    #[test]
    fn entry_and_exit_points() {
        let c = quarter();
        assert!(close(c.entry_point(), Vec3::new(0.0, 0.5, 2.0)));
        assert!(close(c.exit_point(), Vec3::new(2.0, 0.5, 0.0)));
    }

    #[test]
    fn closest_point_lies_on_arc() {
        let c = quarter();
        let p = c.closest_point(Vec3::new(1.0, 0.55, 1.0));
        let s = 2.0 / 2.0_f32.sqrt();
        assert!(close(p, Vec3::new(s, 0.5, s)), "{p:?}");
    }

    #[test]
    fn direction_is_tangent_along_sweep() {
        let c = quarter();
        let d = c.closest_direction(Vec3::new(0.0, 0.5, 2.1));
        assert!(close(d, Vec3::UNIT_X), "{d:?}");
        let d_end = c.closest_direction(Vec3::new(2.0, 0.5, 0.0));
        assert!(close(d_end, Vec3::new(0.0, 0.0, -1.0)), "{d_end:?}");
    }

    #[test]
    fn negative_sweep_reverses_tangent() {
        let c = CurvedConveyor::new(Vec3::ZERO, 1.0, 0.4, 0.0, -90.0);
        let d = c.closest_direction(Vec3::new(0.0, 0.0, 1.0));
        assert!(close(d, Vec3::new(-1.0, 0.0, 0.0)), "{d:?}");
        assert!(close(c.exit_point(), Vec3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn positions_outside_sector_clamp_to_nearest_end() {
        let c = quarter();
        // Slightly past +X (towards -Z): clamps to the exit.
        let p = c.closest_point(Vec3::new(2.0, 0.5, -0.3));
        assert!(close(p, c.exit_point()), "{p:?}");
        // Slightly before +Z (towards -X): clamps to the entry.
        let q = c.closest_point(Vec3::new(-0.3, 0.5, 2.0));
        assert!(close(q, c.entry_point()), "{q:?}");
    }

    #[test]
    fn arc_offset_rejects_outside_sector() {
        let c = quarter();
        assert!(arc_offset(c.center(), 0.0, 90.0, Vec3::new(1.0, 0.5, 1.0)).is_some());
        assert!(arc_offset(c.center(), 0.0, 90.0, Vec3::new(-1.0, 0.5, -1.0)).is_none());
    }
}
