// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Downward surface probe with a fixed, reused hit buffer.

use conveyance_geom::{Ray, Vec3};

use crate::config::TransportConfig;
use crate::ids::LayerMask;
use crate::scene::{RaycastSample, TransportScene};

/// Number of hits the probe buffer can hold per tick.
///
/// Two is enough to see a belt and whatever lies directly beneath it; more
/// hits than this are dropped by the scene (nearest kept).
pub const PROBE_CAPACITY: usize = 2;

/// Index of the sample with the smallest distance.
///
/// Scans in buffer order with a strict comparison, so the first of several
/// equidistant samples wins. Returns `None` for an empty slice.
pub fn nearest_hit(hits: &[RaycastSample]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, hit) in hits.iter().enumerate() {
        match best {
            Some(b) if hit.distance < hits[b].distance => best = Some(i),
            None => best = Some(i),
            Some(_) => {}
        }
    }
    best
}

/// Casts a short ray straight down from just above the body.
#[derive(Debug, Clone)]
pub struct SurfaceProbe {
    ray_length: f32,
    lift: f32,
    layers: LayerMask,
    hits: [RaycastSample; PROBE_CAPACITY],
}

impl SurfaceProbe {
    /// Creates a probe with an explicit ray length, start lift and layer filter.
    pub fn new(ray_length: f32, lift: f32, layers: LayerMask) -> Self {
        Self {
            ray_length,
            lift,
            layers,
            hits: [RaycastSample::EMPTY; PROBE_CAPACITY],
        }
    }

    /// Creates a probe from the shared transport settings.
    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.ray_length, config.probe_lift, config.probe_layers)
    }

    /// Length of the probe ray.
    pub fn ray_length(&self) -> f32 {
        self.ray_length
    }

    /// The ray cast for a body at `position`.
    pub fn ray_from(&self, position: Vec3) -> Ray {
        Ray::new(position.add(&Vec3::new(0.0, self.lift, 0.0)), Vec3::DOWN)
    }

    /// Probes the scene below `position` and returns the nearest hit.
    ///
    /// Performs exactly one raycast into the probe's own buffer; never
    /// allocates.
    pub fn probe<S>(&mut self, scene: &S, position: Vec3) -> Option<RaycastSample>
    where
        S: TransportScene + ?Sized,
    {
        let ray = self.ray_from(position);
        let count = scene
            .raycast(&ray, self.ray_length, self.layers, &mut self.hits)
            .min(PROBE_CAPACITY);
        let hits = &self.hits[..count];
        nearest_hit(hits).map(|i| hits[i])
    }
}
