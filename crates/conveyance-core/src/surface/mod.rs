// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Guided surfaces: the capability consumed by transport bodies and the
//! concrete conveyor variants the scene owns.

use conveyance_geom::Vec3;

pub mod curved;
pub mod straight;

use curved::CurvedConveyor;
use straight::StraightConveyor;

/// Capability of an object that can carry a body along a path.
///
/// Implementations are owned and mutated by the transport-path side (drives
/// advance between ticks). Transport bodies only read them.
pub trait GuidedSurface {
    /// Whether the surface currently takes over bodies landing on it.
    fn is_guiding(&self) -> bool;
    /// Closest point on the guiding path to `position`.
    fn closest_point(&self, position: Vec3) -> Vec3;
    /// Unit transport direction at the point closest to `position`.
    fn closest_direction(&self, position: Vec3) -> Vec3;
    /// Accumulated progress of the surface's drive, in drive units.
    fn drive_position(&self) -> f64;
}

/// Conveying mechanism whose position is the source of truth for transport
/// distance.
///
/// `position` is monotonic while `speed` is non-negative; reversing the drive
/// makes it run backwards and moves guided bodies backwards with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Drive {
    position: f64,
    speed: f64,
    running: bool,
}

impl Drive {
    /// A running drive at `speed` drive units per second.
    pub fn new(speed: f64) -> Self {
        Self {
            position: 0.0,
            speed,
            running: true,
        }
    }

    /// A stopped drive at position zero.
    pub fn stopped() -> Self {
        Self {
            running: false,
            ..Self::new(0.0)
        }
    }

    /// Current drive position.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current speed in drive units per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the drive advances on [`Drive::advance`].
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Sets the speed without touching the position.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Starts or stops the drive.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Jumps the drive to an absolute position.
    pub fn set_position(&mut self, position: f64) {
        self.position = position;
    }

    /// Advances the drive by one fixed step of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if self.running {
            self.position += self.speed * dt;
        }
    }
}

/// The surface variants a [`crate::SceneIndex`] can own.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// A straight belt between two points.
    Straight(StraightConveyor),
    /// A curved belt following a circular arc.
    Curved(CurvedConveyor),
}

impl Surface {
    /// The drive powering this surface.
    pub fn drive(&self) -> &Drive {
        match self {
            Self::Straight(s) => s.drive(),
            Self::Curved(c) => c.drive(),
        }
    }

    /// Mutable access to the drive.
    pub fn drive_mut(&mut self) -> &mut Drive {
        match self {
            Self::Straight(s) => s.drive_mut(),
            Self::Curved(c) => c.drive_mut(),
        }
    }

    /// Switches guidance on or off.
    pub fn set_guiding(&mut self, guiding: bool) {
        match self {
            Self::Straight(s) => s.set_guiding(guiding),
            Self::Curved(c) => c.set_guiding(guiding),
        }
    }
}

impl GuidedSurface for Surface {
    fn is_guiding(&self) -> bool {
        match self {
            Self::Straight(s) => s.is_guiding(),
            Self::Curved(c) => c.is_guiding(),
        }
    }

    fn closest_point(&self, position: Vec3) -> Vec3 {
        match self {
            Self::Straight(s) => s.closest_point(position),
            Self::Curved(c) => c.closest_point(position),
        }
    }

    fn closest_direction(&self, position: Vec3) -> Vec3 {
        match self {
            Self::Straight(s) => s.closest_direction(position),
            Self::Curved(c) => c.closest_direction(position),
        }
    }

    fn drive_position(&self) -> f64 {
        self.drive().position()
    }
}

impl From<StraightConveyor> for Surface {
    fn from(value: StraightConveyor) -> Self {
        Self::Straight(value)
    }
}

impl From<CurvedConveyor> for Surface {
    fn from(value: CurvedConveyor) -> Self {
        Self::Curved(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_drive_does_not_advance() {
        let mut d = Drive::stopped();
        d.advance(1.0);
        assert_eq!(d.position(), 0.0);
        d.set_speed(250.0);
        d.set_running(true);
        d.advance(0.02);
        assert!((d.position() - 5.0).abs() < 1e-9);
    }
}
