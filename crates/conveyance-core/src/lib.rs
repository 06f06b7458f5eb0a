// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! conveyance-core: guided-surface kinematic transport.
//!
//! Each tracked [`TransportBody`] runs the same pipeline once per fixed tick:
//!
//! 1. [`SurfaceProbe`] casts a short ray downwards into a fixed-capacity
//!    buffer and picks the nearest hit.
//! 2. [`SurfaceTracker`] turns the hit into a Free/Guided state, looking up the
//!    [`GuidedSurface`] capability only when the hit object changes.
//! 3. [`DriveMover`] computes the next pose from the surface geometry and the
//!    delta of the surface's drive position while Guided.
//! 4. The [`RigidBodyHandle`] physics switch hands the body between free
//!    dynamics and kinematic control exactly at Free↔Guided edges.
//!
//! Surfaces, colliders and drives live in a host-owned [`TransportScene`];
//! bodies only ever read from it during a step.
#![forbid(unsafe_code)]

pub mod body;
pub mod config;
pub mod debug;
pub mod error;
pub mod ids;
pub mod mover;
pub mod physics;
pub mod probe;
pub mod rigid;
pub mod scene;
pub mod state;
pub mod surface;
pub mod system;
pub mod unit;

pub use body::{AngleOffset, FixedStep, StepOutcome, TransportBody, TransportBodyBuilder};
pub use config::{ConfigError, ConfigService, ConfigStore, TransportConfig, TRANSPORT_CONFIG_KEY};
pub use debug::{DebugDraw, DebugInfo, GizmoColor};
pub use error::TransportError;
pub use ids::{LayerMask, ObjectId, SurfaceId, UnitId};
pub use mover::DriveMover;
pub use physics::{PhysicsMode, RigidBodyHandle};
pub use probe::{nearest_hit, SurfaceProbe, PROBE_CAPACITY};
pub use rigid::RigidBody;
pub use scene::index::{Collider, ColliderShape, SceneIndex};
pub use scene::{RaycastSample, TransportScene};
pub use state::{GuidedState, LeaveReason, SurfaceTracker, Transition, TransportState};
pub use surface::curved::CurvedConveyor;
pub use surface::straight::StraightConveyor;
pub use surface::{Drive, GuidedSurface, Surface};
pub use system::{StepReport, TransportSystem};
pub use unit::{CarriedUnit, Subscription, UnitEvent};

pub use conveyance_geom as geom;
