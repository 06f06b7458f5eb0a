// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Debug-draw sink that records what it was asked to draw.

use conveyance_core::geom::Vec3;
use conveyance_core::{DebugDraw, GizmoColor};

/// One recorded primitive.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawCall {
    /// A sphere.
    Sphere {
        /// Centre.
        center: Vec3,
        /// Radius.
        radius: f32,
        /// Colour hint.
        color: GizmoColor,
    },
    /// A line segment.
    Line {
        /// Start point.
        from: Vec3,
        /// End point.
        to: Vec3,
        /// Colour hint.
        color: GizmoColor,
    },
}

/// [`DebugDraw`] implementation that keeps every call in order.
#[derive(Debug, Default)]
pub struct RecordingDraw {
    /// Calls in the order they were made.
    pub calls: Vec<DrawCall>,
}

impl RecordingDraw {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of primitives drawn with `color`.
    pub fn count(&self, color: GizmoColor) -> usize {
        self.calls
            .iter()
            .filter(|c| match c {
                DrawCall::Sphere { color: c, .. } | DrawCall::Line { color: c, .. } => *c == color,
            })
            .count()
    }
}

impl DebugDraw for RecordingDraw {
    fn sphere(&mut self, center: Vec3, radius: f32, color: GizmoColor) {
        self.calls.push(DrawCall::Sphere {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Vec3, to: Vec3, color: GizmoColor) {
        self.calls.push(DrawCall::Line { from, to, color });
    }
}
