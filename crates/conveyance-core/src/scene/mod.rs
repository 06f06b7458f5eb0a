// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The scene port transport bodies read from, and its reference
//! implementation.

use conveyance_geom::{Ray, Vec3};

use crate::ids::{LayerMask, ObjectId, SurfaceId};
use crate::surface::GuidedSurface;

pub mod index;

/// One hit reported by a scene raycast. Transient; never persisted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RaycastSample {
    /// Identity of the object that was hit.
    pub object: ObjectId,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

impl RaycastSample {
    /// Placeholder used to pre-fill fixed-capacity hit buffers.
    pub const EMPTY: Self = Self {
        object: ObjectId(u32::MAX),
        point: Vec3::ZERO,
        distance: f32::INFINITY,
    };
}

impl Default for RaycastSample {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Read-only view of the world that transport bodies query during a step.
///
/// Implementations must not allocate in [`TransportScene::raycast`]; it runs
/// once per tick for every tracked body.
pub trait TransportScene {
    /// Casts `ray` up to `max_distance` against colliders on `layers`.
    ///
    /// Writes at most `hits.len()` samples to the front of `hits` and returns
    /// how many were written. When more colliders are hit than fit, the
    /// nearest ones are kept. The order of the written samples is
    /// unspecified.
    fn raycast(
        &self,
        ray: &Ray,
        max_distance: f32,
        layers: LayerMask,
        hits: &mut [RaycastSample],
    ) -> usize;

    /// Capability lookup: the guided surface carried by `object`, if any.
    ///
    /// This is the comparatively expensive query the state machine only runs
    /// when the hit object changes.
    fn lookup_surface(&self, object: ObjectId) -> Option<SurfaceId>;

    /// Resolves a surface reference held by a Guided body.
    ///
    /// Returns `None` once the surface has been removed from the scene.
    fn surface(&self, id: SurfaceId) -> Option<&dyn GuidedSurface>;
}
