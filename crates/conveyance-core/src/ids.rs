// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier newtypes and the probe layer filter.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Identity of a hit-able object (collider) in the scene.
///
/// Hit identity is what the surface state machine edge-triggers on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

/// Identity of a guided surface owned by the scene.
///
/// Bodies hold this as a non-owning reference while Guided and re-resolve it
/// every tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u32);

/// Identity of a carried unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj:{}", self.0)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface:{}", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit:{}", self.0)
    }
}

/// Bitset of collision layers a probe is allowed to hit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);
    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// Untagged scene geometry.
    pub const DEFAULT: Self = Self(1 << 0);
    /// Conveyors, curves and other transport surfaces.
    pub const TRANSPORT: Self = Self(1 << 1);
    /// Static simulation geometry (floors, tables, frames).
    pub const STATIC: Self = Self(1 << 2);

    /// Mask with the single layer `index` set.
    ///
    /// Indices ≥ 32 yield [`LayerMask::NONE`].
    pub const fn layer(index: u32) -> Self {
        if index < 32 {
            Self(1 << index)
        } else {
            Self::NONE
        }
    }

    /// Union of two masks.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` when any layer of `other` is present in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::TRANSPORT.with(Self::STATIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_probe_layers_are_transport_and_static() {
        let mask = LayerMask::default();
        assert!(mask.intersects(LayerMask::TRANSPORT));
        assert!(mask.intersects(LayerMask::STATIC));
        assert!(!mask.intersects(LayerMask::DEFAULT));
    }

    #[test]
    fn out_of_range_layer_is_empty() {
        assert_eq!(LayerMask::layer(40), LayerMask::NONE);
        assert_eq!(LayerMask::layer(2), LayerMask::STATIC);
    }

    #[test]
    fn layer_mask_serializes_as_bits() {
        let json = serde_json::to_string(&LayerMask::TRANSPORT).unwrap_or_default();
        assert_eq!(json, "2");
    }
}
