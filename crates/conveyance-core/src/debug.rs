// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Read-only diagnostics: a primitive sink for debug gizmos and a snapshot of
//! per-body tracking state.

use conveyance_geom::Vec3;

use crate::ids::{ObjectId, SurfaceId};

/// Colour hint attached to debug primitives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GizmoColor {
    /// Probe ray and body marker while Free.
    Red,
    /// Closest point on the guiding path and the path direction there.
    Yellow,
    /// Probe ray and body marker while Guided.
    Green,
    /// Body forward axis.
    Blue,
}

/// Sink for debug primitives. Implementations decide whether and how to
/// render; transport code never does.
pub trait DebugDraw {
    /// A sphere of `radius` at `center`.
    fn sphere(&mut self, center: Vec3, radius: f32, color: GizmoColor);
    /// A line segment from `from` to `to`.
    fn line(&mut self, from: Vec3, to: Vec3, color: GizmoColor);
}

/// Snapshot of a body's tracking state, available when debug is enabled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DebugInfo {
    /// Surface currently guiding the body.
    pub surface: Option<SurfaceId>,
    /// Hit identity the next edge is compared against.
    pub last_hit: Option<ObjectId>,
    /// Hit identity observed on the latest tick.
    pub current_hit: Option<ObjectId>,
}
