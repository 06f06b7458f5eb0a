// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Free/Guided state machine, edge-triggered on hit-object identity.
//!
//! The capability lookup and the `is_guiding` query only run on ticks where
//! the probed object differs from the previous tick's object. While the hit
//! is unchanged a Guided body stays Guided without re-validation, except that
//! the held surface reference must still resolve in the scene.

use crate::ids::{ObjectId, SurfaceId};
use crate::scene::{RaycastSample, TransportScene};

/// Per-body bookkeeping while a surface carries the body.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GuidedState {
    /// Surface currently guiding the body.
    pub surface: SurfaceId,
    /// Drive position observed on the previous tick (the entry baseline on
    /// the first guided tick).
    pub last_drive: f64,
}

/// Transport state of a body.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum TransportState {
    /// Free rigid-body dynamics.
    #[default]
    Free,
    /// Kinematically carried by a guided surface.
    Guided(GuidedState),
}

impl TransportState {
    /// Surface carrying the body, if any.
    pub fn surface(&self) -> Option<SurfaceId> {
        match self {
            Self::Free => None,
            Self::Guided(g) => Some(g.surface),
        }
    }

    /// Returns `true` while Guided.
    pub fn is_guided(&self) -> bool {
        matches!(self, Self::Guided(_))
    }
}

/// Why a body left (or was kept out of) guided transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LeaveReason {
    /// The probe found nothing below the body.
    NoHit,
    /// The newly hit object carries no guided surface.
    NoCapability,
    /// The newly hit surface is not guiding.
    NotGuiding,
    /// The held surface was removed from the scene.
    SurfaceGone,
    /// The unit was pinned.
    Pinned,
}

/// Result of feeding one probe result into the state machine.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Transition {
    /// No edge this tick.
    Stay,
    /// The body is now guided by `surface`. `previous` is set when it was
    /// handed over from another surface.
    Enter {
        /// New guiding surface.
        surface: SurfaceId,
        /// Surface the body was guided by before, if any.
        previous: Option<SurfaceId>,
    },
    /// The body is (or stays) free. `from` is `None` for the idempotent
    /// release issued while already Free.
    Leave {
        /// Surface the body was guided by, if any.
        from: Option<SurfaceId>,
        /// What triggered the release.
        reason: LeaveReason,
    },
}

/// Edge-triggered Free/Guided tracker.
#[derive(Debug, Clone, Default)]
pub struct SurfaceTracker {
    state: TransportState,
    last_hit: Option<ObjectId>,
    current_hit: Option<ObjectId>,
}

impl SurfaceTracker {
    /// A Free tracker with no remembered hit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &TransportState {
        &self.state
    }

    /// Hit identity the next edge is compared against.
    pub fn last_hit(&self) -> Option<ObjectId> {
        self.last_hit
    }

    /// Hit identity observed on the latest tick.
    pub fn current_hit(&self) -> Option<ObjectId> {
        self.current_hit
    }

    /// Mutable guided bookkeeping, for the mover.
    pub fn guided_mut(&mut self) -> Option<&mut GuidedState> {
        match &mut self.state {
            TransportState::Free => None,
            TransportState::Guided(g) => Some(g),
        }
    }

    fn leave(&mut self, reason: LeaveReason) -> Transition {
        let from = self.state.surface();
        self.state = TransportState::Free;
        Transition::Leave { from, reason }
    }

    /// Feeds the nearest probe hit of this tick.
    pub fn observe<S>(&mut self, hit: Option<&RaycastSample>, scene: &S) -> Transition
    where
        S: TransportScene + ?Sized,
    {
        let object = hit.map(|h| h.object);
        self.current_hit = object;

        if let TransportState::Guided(g) = self.state {
            if scene.surface(g.surface).is_none() {
                // Whatever is below now gets a fresh look next tick.
                self.last_hit = None;
                return self.leave(LeaveReason::SurfaceGone);
            }
        }

        let Some(object) = object else {
            self.last_hit = None;
            return if self.state.is_guided() {
                self.leave(LeaveReason::NoHit)
            } else {
                Transition::Stay
            };
        };

        if self.last_hit == Some(object) {
            return Transition::Stay;
        }
        self.last_hit = Some(object);

        let Some(id) = scene.lookup_surface(object) else {
            return self.leave(LeaveReason::NoCapability);
        };
        let Some(surface) = scene.surface(id) else {
            return self.leave(LeaveReason::NoCapability);
        };
        if !surface.is_guiding() {
            return self.leave(LeaveReason::NotGuiding);
        }

        let previous = self.state.surface();
        if previous == Some(id) {
            // Another collider of the surface already carrying the body.
            return Transition::Stay;
        }
        self.state = TransportState::Guided(GuidedState {
            surface: id,
            last_drive: surface.drive_position(),
        });
        Transition::Enter {
            surface: id,
            previous,
        }
    }

    /// Forces the body Free and forgets the remembered hit, so the surface
    /// below is re-evaluated as a fresh edge afterwards.
    ///
    /// Returns [`Transition::Stay`] when the body was already Free.
    pub fn release(&mut self, reason: LeaveReason) -> Transition {
        self.last_hit = None;
        self.current_hit = None;
        if self.state.is_guided() {
            self.leave(reason)
        } else {
            Transition::Stay
        }
    }
}
