// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transport bodies: the per-unit component wiring probe, state machine,
//! mover and physics switch together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use conveyance_geom::math::snap_quarter_turn;
use conveyance_geom::{Tick, Vec3};
use tracing::debug;

use crate::config::TransportConfig;
use crate::debug::{DebugDraw, DebugInfo, GizmoColor};
use crate::error::TransportError;
use crate::ids::{SurfaceId, UnitId};
use crate::mover::DriveMover;
use crate::physics::RigidBodyHandle;
use crate::probe::SurfaceProbe;
use crate::rigid::RigidBody;
use crate::scene::TransportScene;
use crate::state::{LeaveReason, SurfaceTracker, Transition, TransportState};
use crate::unit::{CarriedUnit, Subscription, UnitEvent};

const MARKER_RADIUS: f32 = 0.05;
const AXIS_LENGTH: f32 = 0.2;

/// Yaw applied to a guided body relative to the surface direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AngleOffset {
    /// A constant offset in degrees.
    Fixed(f32),
    /// Measured at each entry: the body's heading relative to the surface,
    /// rounded to the nearest quarter turn.
    SnapOnEntry,
}

impl Default for AngleOffset {
    fn default() -> Self {
        Self::Fixed(0.0)
    }
}

/// What a body did during one fixed step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Spawn source not yet realized; nothing ran.
    Exempt,
    /// Pinned; probe skipped and the body held Free.
    Pinned,
    /// Free, no edge this tick.
    Free,
    /// Entered the given surface this tick and was moved by it.
    Entered(SurfaceId),
    /// Stayed on the given surface and was moved by it.
    Guided(SurfaceId),
    /// Left guidance (or was confirmed Free) for the given reason.
    Left(LeaveReason),
}

/// Per-tick hooks driven by the host's fixed-step loop.
pub trait FixedStep {
    /// Runs probe, state machine and mover once.
    fn fixed_step<S>(&mut self, scene: &S, tick: Tick) -> StepOutcome
    where
        S: TransportScene + ?Sized;

    /// Emits debug primitives. Read-only; does nothing unless debug is on.
    fn debug_draw<S>(&self, _scene: &S, _draw: &mut dyn DebugDraw)
    where
        S: TransportScene + ?Sized,
    {
    }
}

/// Flags shared with the carried unit's event listener.
#[derive(Debug, Default)]
struct BodyFlags {
    pinned: AtomicBool,
    spawn_exempt: AtomicBool,
}

/// A rigid body that can be carried by guided surfaces.
#[derive(Debug)]
pub struct TransportBody<B = RigidBody> {
    unit: UnitId,
    rigid: B,
    flags: Arc<BodyFlags>,
    subscription: Subscription,
    probe: SurfaceProbe,
    tracker: SurfaceTracker,
    mover: DriveMover,
    angle_offset: AngleOffset,
    offset_deg: f32,
    debug: bool,
}

impl<B: RigidBodyHandle> TransportBody<B> {
    /// Starts building a body with the shared transport settings.
    pub fn builder<'u>(config: &TransportConfig) -> TransportBodyBuilder<'u, B> {
        TransportBodyBuilder::new(config)
    }

    /// Identity of the carried unit.
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// The controlled rigid body.
    pub fn rigid(&self) -> &B {
        &self.rigid
    }

    /// Mutable access to the rigid body, for the host's physics step.
    pub fn rigid_mut(&mut self) -> &mut B {
        &mut self.rigid
    }

    /// Current transport state.
    pub fn state(&self) -> &TransportState {
        self.tracker.state()
    }

    /// Returns `true` while a surface carries the body.
    pub fn is_guided(&self) -> bool {
        self.tracker.state().is_guided()
    }

    /// Handle of this body's listener on its unit.
    pub fn subscription(&self) -> Subscription {
        self.subscription
    }

    /// Stops listening to `unit`, e.g. before building a replacement body
    /// for it. Returns `false` if the listener was already removed.
    pub fn detach(&self, unit: &mut CarriedUnit) -> bool {
        unit.unsubscribe(self.subscription)
    }

    /// Returns `true` while the unit is pinned.
    pub fn is_pinned(&self) -> bool {
        self.flags.pinned.load(Ordering::Acquire)
    }

    /// Returns `true` until a spawn source has been realized.
    pub fn is_spawn_exempt(&self) -> bool {
        self.flags.spawn_exempt.load(Ordering::Acquire)
    }

    /// Configured offset mode.
    pub fn angle_offset(&self) -> AngleOffset {
        self.angle_offset
    }

    /// Offset in degrees currently applied while guided.
    pub fn offset_deg(&self) -> f32 {
        self.offset_deg
    }

    /// Tracking snapshot; `None` unless debug is enabled.
    pub fn debug_info(&self) -> Option<DebugInfo> {
        self.debug.then(|| DebugInfo {
            surface: self.tracker.state().surface(),
            last_hit: self.tracker.last_hit(),
            current_hit: self.tracker.current_hit(),
        })
    }

    fn apply<S>(&mut self, transition: Transition, scene: &S, position: Vec3, tick: Tick)
    where
        S: TransportScene + ?Sized,
    {
        match transition {
            Transition::Stay => {}
            Transition::Enter { surface, previous } => {
                self.rigid.disable_physics();
                if self.angle_offset == AngleOffset::SnapOnEntry {
                    if let Some(s) = scene.surface(surface) {
                        let along = s.closest_direction(position);
                        let facing = self.rigid.pose().forward();
                        self.offset_deg =
                            snap_quarter_turn(along.signed_angle(&facing, &Vec3::UP));
                    }
                }
                debug!(
                    unit = %self.unit,
                    surface = %surface,
                    previous = ?previous,
                    tick = %tick,
                    "entered guided surface"
                );
            }
            Transition::Leave { from, reason } => {
                self.rigid.enable_physics();
                if let Some(from) = from {
                    debug!(
                        unit = %self.unit,
                        surface = %from,
                        reason = ?reason,
                        tick = %tick,
                        "left guided surface"
                    );
                }
            }
        }
    }
}

impl<B: RigidBodyHandle> FixedStep for TransportBody<B> {
    fn fixed_step<S>(&mut self, scene: &S, tick: Tick) -> StepOutcome
    where
        S: TransportScene + ?Sized,
    {
        if self.is_spawn_exempt() {
            return StepOutcome::Exempt;
        }
        let position = self.rigid.pose().position();
        if self.is_pinned() {
            let t = self.tracker.release(LeaveReason::Pinned);
            self.apply(t, scene, position, tick);
            return StepOutcome::Pinned;
        }

        let hit = self.probe.probe(scene, position);
        let transition = self.tracker.observe(hit.as_ref(), scene);
        self.apply(transition, scene, position, tick);

        let Some(guided) = self.tracker.guided_mut() else {
            return match transition {
                Transition::Leave { reason, .. } => StepOutcome::Left(reason),
                _ => StepOutcome::Free,
            };
        };
        let id = guided.surface;
        if let Some(surface) = scene.surface(id) {
            let pose = self.mover.advance(guided, surface, position, self.offset_deg);
            self.rigid.move_kinematic(pose);
        }
        match transition {
            Transition::Enter { .. } => StepOutcome::Entered(id),
            _ => StepOutcome::Guided(id),
        }
    }

    fn debug_draw<S>(&self, scene: &S, draw: &mut dyn DebugDraw)
    where
        S: TransportScene + ?Sized,
    {
        if !self.debug {
            return;
        }
        let position = self.rigid.pose().position();
        let color = if self.is_guided() {
            GizmoColor::Green
        } else {
            GizmoColor::Red
        };
        let ray = self.probe.ray_from(position);
        draw.line(ray.origin(), ray.at(self.probe.ray_length()), color);
        draw.sphere(position, MARKER_RADIUS, color);
        let forward = self.rigid.pose().forward().scale(AXIS_LENGTH);
        draw.line(position, position.add(&forward), GizmoColor::Blue);
        if let Some(surface) = self.state().surface().and_then(|id| scene.surface(id)) {
            draw.sphere(surface.closest_point(position), MARKER_RADIUS, GizmoColor::Yellow);
            let along = surface.closest_direction(position).scale(AXIS_LENGTH);
            draw.line(position, position.add(&along), GizmoColor::Yellow);
        }
    }
}

/// Collects a body's collaborators and validates them before the body can
/// ever be stepped.
pub struct TransportBodyBuilder<'u, B = RigidBody> {
    config: TransportConfig,
    rigid: Option<B>,
    unit: Option<&'u mut CarriedUnit>,
    angle_offset: AngleOffset,
}

impl<'u, B: RigidBodyHandle> TransportBodyBuilder<'u, B> {
    /// Creates a builder using `config` for probe, mover and diagnostics.
    pub fn new(config: &TransportConfig) -> Self {
        Self {
            config: config.clone(),
            rigid: None,
            unit: None,
            angle_offset: AngleOffset::default(),
        }
    }

    /// Sets the rigid body the transport body controls.
    pub fn with_rigid_body(mut self, rigid: B) -> Self {
        self.rigid = Some(rigid);
        self
    }

    /// Sets the carried unit; the body subscribes to its events on build.
    ///
    /// A unit normally backs one body. Call [`TransportBody::detach`] on the
    /// old body before building another for the same unit.
    pub fn with_unit(mut self, unit: &'u mut CarriedUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the yaw offset applied while guided.
    pub fn with_angle_offset(mut self, offset: AngleOffset) -> Self {
        self.angle_offset = offset;
        self
    }

    /// Validates the configuration and wires the unit's notifications.
    pub fn build(self) -> Result<TransportBody<B>, TransportError> {
        self.config.validate()?;
        let rigid = self.rigid.ok_or(TransportError::MissingRigidBody)?;
        let unit = self.unit.ok_or(TransportError::MissingUnit)?;

        let flags = Arc::new(BodyFlags {
            pinned: AtomicBool::new(unit.is_pinned()),
            spawn_exempt: AtomicBool::new(unit.is_spawn_source() && !unit.is_spawn_realized()),
        });
        // A dropped body must not be kept alive by its unit.
        let listener = Arc::downgrade(&flags);
        let subscription = unit.subscribe(move |event| {
            let Some(flags) = listener.upgrade() else {
                return;
            };
            match *event {
                UnitEvent::Pinned(pinned) => flags.pinned.store(pinned, Ordering::Release),
                UnitEvent::SpawnRealized => flags.spawn_exempt.store(false, Ordering::Release),
            }
        });

        let offset_deg = match self.angle_offset {
            AngleOffset::Fixed(deg) => deg,
            AngleOffset::SnapOnEntry => 0.0,
        };
        Ok(TransportBody {
            unit: unit.id(),
            rigid,
            flags,
            subscription,
            probe: SurfaceProbe::from_config(&self.config),
            tracker: SurfaceTracker::new(),
            mover: DriveMover::new(self.config.length_scale),
            angle_offset: self.angle_offset,
            offset_deg,
            debug: self.config.debug,
        })
    }
}
