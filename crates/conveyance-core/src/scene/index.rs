// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Flat collider index owning the scene's guided surfaces.
//!
//! Raycasts scan every collider linearly and keep the nearest hits in the
//! caller's buffer, so a query never allocates. Object identities are
//! assigned in insertion order and never reused.

use conveyance_geom::{Aabb, Ray, Vec3};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ids::{LayerMask, ObjectId, SurfaceId};
use crate::scene::{RaycastSample, TransportScene};
use crate::surface::curved::arc_offset;
use crate::surface::{GuidedSurface, Surface};

/// Shape of a probe-able collider.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ColliderShape {
    /// Solid axis-aligned box.
    Box(Aabb),
    /// Top face of a curved belt: an annular sector at `center.y`.
    ArcBand {
        /// Arc centre at top-face height.
        center: Vec3,
        /// Inner radius of the band.
        inner: f32,
        /// Outer radius of the band.
        outer: f32,
        /// Start angle in degrees about +Y from +Z.
        start_deg: f32,
        /// Signed sweep in degrees.
        sweep_deg: f32,
        /// Belt thickness below the top face.
        thickness: f32,
    },
}

impl ColliderShape {
    /// Distance along `ray` to this shape within `max_distance`.
    pub fn cast(&self, ray: &Ray, max_distance: f32) -> Option<f32> {
        match *self {
            Self::Box(aabb) => ray.cast_aabb(&aabb, max_distance),
            Self::ArcBand {
                center,
                inner,
                outer,
                start_deg,
                sweep_deg,
                thickness,
            } => {
                let in_band = |p: Vec3| {
                    let r = p.sub(&center).reject(&Vec3::UP).length();
                    r >= inner
                        && r <= outer
                        && arc_offset(center, start_deg, sweep_deg, p).is_some()
                };
                // Origin inside the belt body counts as an immediate hit.
                let origin = ray.origin();
                let top = center.y();
                if origin.y() <= top && origin.y() >= top - thickness && in_band(origin) {
                    return Some(0.0);
                }
                let t = ray.cast_horizontal_plane(top, max_distance)?;
                in_band(ray.at(t)).then_some(t)
            }
        }
    }
}

/// A collider registered with the scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Collider {
    /// Identity reported in raycast samples.
    pub object: ObjectId,
    /// Layer(s) this collider belongs to.
    pub layer: LayerMask,
    /// Geometry used for probe queries.
    pub shape: ColliderShape,
    /// Surface this collider belongs to, if any.
    pub surface: Option<SurfaceId>,
}

/// Reference [`TransportScene`]: owns surfaces and their colliders plus any
/// static geometry.
#[derive(Debug, Default)]
pub struct SceneIndex {
    colliders: Vec<Collider>,
    by_object: FxHashMap<ObjectId, usize>,
    surfaces: Vec<Option<Surface>>,
    next_object: u32,
}

impl SceneIndex {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object = self.next_object.saturating_add(1);
        id
    }

    fn push_collider(
        &mut self,
        shape: ColliderShape,
        layer: LayerMask,
        surface: Option<SurfaceId>,
    ) -> ObjectId {
        let object = self.alloc_object();
        self.by_object.insert(object, self.colliders.len());
        self.colliders.push(Collider {
            object,
            layer,
            shape,
            surface,
        });
        object
    }

    /// Adds a surface on [`LayerMask::TRANSPORT`] together with a collider
    /// matching its geometry.
    pub fn add_surface(&mut self, surface: impl Into<Surface>) -> (SurfaceId, ObjectId) {
        let surface = surface.into();
        let shape = match &surface {
            Surface::Straight(s) => s.collider_shape(),
            Surface::Curved(c) => c.collider_shape(),
        };
        let Ok(index) = u32::try_from(self.surfaces.len()) else {
            // More than u32::MAX surfaces cannot be addressed; keep the last id.
            return (SurfaceId(u32::MAX), self.alloc_object());
        };
        let id = SurfaceId(index);
        self.surfaces.push(Some(surface));
        let object = self.push_collider(shape, LayerMask::TRANSPORT, Some(id));
        debug!(surface = %id, object = %object, "surface added");
        (id, object)
    }

    /// Attaches an extra collider whose hits resolve to `surface`, e.g. a side
    /// rail or a child part of a larger conveyor assembly.
    pub fn attach_collider(
        &mut self,
        surface: SurfaceId,
        shape: ColliderShape,
        layer: LayerMask,
    ) -> ObjectId {
        self.push_collider(shape, layer, Some(surface))
    }

    /// Adds geometry without any guidance capability (floors, frames).
    pub fn add_static(&mut self, aabb: Aabb, layer: LayerMask) -> ObjectId {
        self.push_collider(ColliderShape::Box(aabb), layer, None)
    }

    /// Removes a surface and every collider attached to it.
    ///
    /// Bodies still holding `id` observe the removal on their next step.
    pub fn remove_surface(&mut self, id: SurfaceId) -> Option<Surface> {
        let slot = self.surfaces.get_mut(id.0 as usize)?;
        let removed = slot.take()?;
        self.colliders.retain(|c| c.surface != Some(id));
        self.by_object = self
            .colliders
            .iter()
            .enumerate()
            .map(|(i, c)| (c.object, i))
            .collect();
        debug!(surface = %id, "surface removed");
        Some(removed)
    }

    /// Shared access to a surface.
    pub fn surface_ref(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0 as usize)?.as_ref()
    }

    /// Mutable access to a surface (drive control, guidance toggles).
    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(id.0 as usize)?.as_mut()
    }

    /// Registered colliders in insertion order.
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Advances every drive by `dt` seconds. Call between transport steps.
    pub fn advance(&mut self, dt: f64) {
        for surface in self.surfaces.iter_mut().flatten() {
            surface.drive_mut().advance(dt);
        }
    }
}

impl TransportScene for SceneIndex {
    fn raycast(
        &self,
        ray: &Ray,
        max_distance: f32,
        layers: LayerMask,
        hits: &mut [RaycastSample],
    ) -> usize {
        if hits.is_empty() {
            return 0;
        }
        let mut count = 0;
        for collider in &self.colliders {
            if !collider.layer.intersects(layers) {
                continue;
            }
            let Some(distance) = collider.shape.cast(ray, max_distance) else {
                continue;
            };
            let sample = RaycastSample {
                object: collider.object,
                point: ray.at(distance),
                distance,
            };
            if count < hits.len() {
                hits[count] = sample;
                count += 1;
                continue;
            }
            // Buffer full: replace the farthest kept hit if this one is nearer.
            let mut far = 0;
            for i in 1..count {
                if hits[i].distance > hits[far].distance {
                    far = i;
                }
            }
            if distance < hits[far].distance {
                hits[far] = sample;
            }
        }
        count
    }

    fn lookup_surface(&self, object: ObjectId) -> Option<SurfaceId> {
        let idx = *self.by_object.get(&object)?;
        let surface = self.colliders.get(idx)?.surface?;
        self.surface_ref(surface).map(|_| surface)
    }

    fn surface(&self, id: SurfaceId) -> Option<&dyn GuidedSurface> {
        self.surface_ref(id).map(|s| s as &dyn GuidedSurface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::PROBE_CAPACITY;
    use crate::surface::straight::StraightConveyor;

    fn down_from(x: f32, y: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, y, z), Vec3::DOWN)
    }

    #[test]
    fn raycast_filters_by_layer() {
        let mut scene = SceneIndex::new();
        let floor = Aabb::new(Vec3::new(-5.0, -0.1, -5.0), Vec3::new(5.0, 0.0, 5.0));
        scene.add_static(floor, LayerMask::DEFAULT);
        let mut hits = [RaycastSample::EMPTY; PROBE_CAPACITY];
        let ray = down_from(0.0, 0.1, 0.0);
        assert_eq!(scene.raycast(&ray, 0.3, LayerMask::default(), &mut hits), 0);
        assert_eq!(scene.raycast(&ray, 0.3, LayerMask::ALL, &mut hits), 1);
    }

    #[test]
    fn full_buffer_keeps_nearest_hits() {
        let mut scene = SceneIndex::new();
        let far = scene.add_static(
            Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.1, 1.0)),
            LayerMask::STATIC,
        );
        let mid = scene.add_static(
            Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.2, 1.0)),
            LayerMask::STATIC,
        );
        let near = scene.add_static(
            Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.3, 1.0)),
            LayerMask::STATIC,
        );
        let mut hits = [RaycastSample::EMPTY; 2];
        let n = scene.raycast(&down_from(0.0, 0.35, 0.0), 1.0, LayerMask::ALL, &mut hits);
        assert_eq!(n, 2);
        let kept: Vec<ObjectId> = hits.iter().map(|h| h.object).collect();
        assert!(kept.contains(&near));
        assert!(kept.contains(&mid));
        assert!(!kept.contains(&far));
    }

    #[test]
    fn arc_band_only_hits_inside_sector() {
        let shape = ColliderShape::ArcBand {
            center: Vec3::ZERO,
            inner: 0.7,
            outer: 1.3,
            start_deg: 0.0,
            sweep_deg: 90.0,
            thickness: 0.05,
        };
        assert!(shape.cast(&down_from(0.0, 0.1, 1.0), 0.3).is_some());
        assert!(shape.cast(&down_from(0.0, 0.1, 0.2), 0.3).is_none());
        assert!(shape.cast(&down_from(0.0, 0.1, -1.0), 0.3).is_none());
    }

    #[test]
    fn origin_inside_arc_band_thickness_hits_at_zero() {
        let shape = ColliderShape::ArcBand {
            center: Vec3::ZERO,
            inner: 0.7,
            outer: 1.3,
            start_deg: 0.0,
            sweep_deg: 90.0,
            thickness: 0.05,
        };
        assert_eq!(shape.cast(&down_from(0.0, -0.03, 1.0), 0.3), Some(0.0));
        assert_eq!(shape.cast(&down_from(0.0, 0.0, 1.0), 0.3), Some(0.0));
        // Below the belt body, or inside its height but outside the sector.
        assert!(shape.cast(&down_from(0.0, -0.08, 1.0), 0.3).is_none());
        assert!(shape.cast(&down_from(0.0, -0.03, -1.0), 0.3).is_none());
    }

    #[test]
    fn sunken_body_finds_straight_and_curved_belts_alike() {
        use crate::config::TransportConfig;
        use crate::probe::SurfaceProbe;
        use crate::surface::curved::CurvedConveyor;

        let mut scene = SceneIndex::new();
        let (_, straight) = scene.add_surface(StraightConveyor::new(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(2.0, 0.5, 0.0),
            0.6,
        ));
        let (_, curve) = scene.add_surface(CurvedConveyor::new(
            Vec3::new(2.0, 0.5, -1.0),
            1.0,
            0.6,
            0.0,
            90.0,
        ));
        let mut probe = SurfaceProbe::from_config(&TransportConfig::default());
        let on_straight = probe.probe(&scene, Vec3::new(1.0, 0.42, 0.0));
        // 45 degrees into the curve, on its centre line.
        let mid = Vec3::new(2.0 + 0.5f32.sqrt(), 0.42, -1.0 + 0.5f32.sqrt());
        let on_curve = probe.probe(&scene, mid);
        assert_eq!(on_straight.map(|h| h.object), Some(straight));
        assert_eq!(on_curve.map(|h| h.object), Some(curve));
        assert_eq!(on_curve.map(|h| h.distance), Some(0.0));
    }

    #[test]
    fn object_ids_saturate_instead_of_overflowing() {
        let mut scene = SceneIndex::new();
        scene.next_object = u32::MAX;
        let floor = Aabb::new(Vec3::new(-1.0, -0.1, -1.0), Vec3::ZERO);
        let a = scene.add_static(floor, LayerMask::STATIC);
        let b = scene.add_static(floor, LayerMask::STATIC);
        assert_eq!(a, ObjectId(u32::MAX));
        assert_eq!(b, ObjectId(u32::MAX));
    }

    #[test]
    fn removed_surface_no_longer_resolves() {
        let mut scene = SceneIndex::new();
        let (id, object) = scene.add_surface(StraightConveyor::new(
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            0.5,
        ));
        assert_eq!(scene.lookup_surface(object), Some(id));
        assert!(scene.remove_surface(id).is_some());
        assert_eq!(scene.lookup_surface(object), None);
        assert!(scene.surface(id).is_none());
        assert!(scene.colliders().is_empty());
    }
}
