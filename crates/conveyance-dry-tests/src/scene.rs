// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scripted scene fake.
//!
//! Probe hits are not computed from geometry: the test sets them before each
//! step and every raycast reports exactly those samples. Capability queries
//! are counted so tests can assert how often the state machine asked.

use conveyance_core::geom::{Ray, Vec3};
use conveyance_core::{GuidedSurface, LayerMask, ObjectId, RaycastSample, SurfaceId, TransportScene};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Guided surface along an unbounded straight line, with a settable drive
/// and a counter on [`GuidedSurface::is_guiding`].
#[derive(Debug)]
pub struct LineSurface {
    origin: Vec3,
    direction: Vec3,
    drive: f64,
    guiding: bool,
    guiding_calls: AtomicUsize,
}

impl LineSurface {
    /// A guiding line through `origin` along `direction` with drive at zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            drive: 0.0,
            guiding: true,
            guiding_calls: AtomicUsize::new(0),
        }
    }

    /// A guiding line along `+X` through the origin.
    pub fn along_x() -> Self {
        Self::new(Vec3::ZERO, Vec3::UNIT_X)
    }

    /// Sets the drive position.
    pub fn set_drive(&mut self, drive: f64) {
        self.drive = drive;
    }

    /// Adds `delta` to the drive position.
    pub fn advance_drive(&mut self, delta: f64) {
        self.drive += delta;
    }

    /// Switches guidance on or off.
    pub fn set_guiding(&mut self, guiding: bool) {
        self.guiding = guiding;
    }

    /// Number of `is_guiding` calls so far.
    pub fn guiding_calls(&self) -> usize {
        self.guiding_calls.load(Ordering::Relaxed)
    }
}

impl GuidedSurface for LineSurface {
    fn is_guiding(&self) -> bool {
        self.guiding_calls.fetch_add(1, Ordering::Relaxed);
        self.guiding
    }

    fn closest_point(&self, position: Vec3) -> Vec3 {
        let along = position.sub(&self.origin).dot(&self.direction);
        self.origin.add(&self.direction.scale(along))
    }

    fn closest_direction(&self, _position: Vec3) -> Vec3 {
        self.direction
    }

    fn drive_position(&self) -> f64 {
        self.drive
    }
}

/// Scene whose raycasts return whatever the test scripted.
#[derive(Debug, Default)]
pub struct ScriptedScene {
    hits: Vec<RaycastSample>,
    objects: HashMap<ObjectId, SurfaceId>,
    surfaces: Vec<Option<LineSurface>>,
    lookups: AtomicUsize,
    raycasts: AtomicUsize,
}

impl ScriptedScene {
    /// An empty scene with no hits scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a surface and returns its id.
    pub fn add_surface(&mut self, surface: LineSurface) -> SurfaceId {
        let id = SurfaceId(u32::try_from(self.surfaces.len()).unwrap_or(u32::MAX));
        self.surfaces.push(Some(surface));
        id
    }

    /// Makes hits on `object` resolve to `surface`.
    pub fn bind(&mut self, object: ObjectId, surface: SurfaceId) {
        self.objects.insert(object, surface);
    }

    /// Destroys a surface; held references stop resolving.
    pub fn remove_surface(&mut self, id: SurfaceId) -> Option<LineSurface> {
        self.surfaces.get_mut(id.0 as usize)?.take()
    }

    /// Mutable access to a surface.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut LineSurface> {
        self.surfaces.get_mut(id.0 as usize)?.as_mut()
    }

    /// Shared access to a surface.
    pub fn line(&self, id: SurfaceId) -> Option<&LineSurface> {
        self.surfaces.get(id.0 as usize)?.as_ref()
    }

    /// Scripts the samples every subsequent raycast reports.
    pub fn set_hits(&mut self, hits: &[RaycastSample]) {
        self.hits.clear();
        self.hits.extend_from_slice(hits);
    }

    /// Scripts a single hit on `object` at `distance`.
    pub fn hit(&mut self, object: ObjectId, distance: f32) {
        self.set_hits(&[crate::fixtures::sample(object.0, distance)]);
    }

    /// Scripts an empty probe result.
    pub fn clear_hits(&mut self) {
        self.hits.clear();
    }

    /// Number of `lookup_surface` calls so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Number of `raycast` calls so far.
    pub fn raycast_count(&self) -> usize {
        self.raycasts.load(Ordering::Relaxed)
    }
}

impl TransportScene for ScriptedScene {
    fn raycast(
        &self,
        _ray: &Ray,
        _max_distance: f32,
        _layers: LayerMask,
        hits: &mut [RaycastSample],
    ) -> usize {
        self.raycasts.fetch_add(1, Ordering::Relaxed);
        let n = self.hits.len().min(hits.len());
        hits[..n].copy_from_slice(&self.hits[..n]);
        n
    }

    fn lookup_surface(&self, object: ObjectId) -> Option<SurfaceId> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.objects.get(&object).copied()
    }

    fn surface(&self, id: SurfaceId) -> Option<&dyn GuidedSurface> {
        self.line(id).map(|s| s as &dyn GuidedSurface)
    }
}
