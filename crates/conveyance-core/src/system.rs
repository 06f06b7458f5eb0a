// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Many-body stepping.
//!
//! Bodies only read the scene during a step and own all their mutable state,
//! so they are independent of each other. [`TransportSystem::step`] runs them
//! in insertion order; [`TransportSystem::step_parallel`] (feature
//! `parallel`) hands them to rayon via `par_iter_mut`. Both produce
//! identical poses and reports.

use conveyance_geom::{Tick, Vec3};
use tracing::trace;

use crate::body::{FixedStep, StepOutcome, TransportBody};
use crate::physics::RigidBodyHandle;
use crate::rigid::RigidBody;
use crate::scene::TransportScene;

/// Aggregated outcomes of one system step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Tick the step ran at.
    pub tick: Tick,
    /// Spawn sources still waiting to be realized.
    pub exempt: usize,
    /// Pinned bodies.
    pub pinned: usize,
    /// Free bodies without an edge.
    pub free: usize,
    /// Bodies that entered a surface.
    pub entered: usize,
    /// Bodies carried without an edge.
    pub guided: usize,
    /// Bodies released (or confirmed Free) by a leave edge.
    pub left: usize,
}

impl StepReport {
    /// Counts one body outcome.
    pub fn record(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Exempt => self.exempt += 1,
            StepOutcome::Pinned => self.pinned += 1,
            StepOutcome::Free => self.free += 1,
            StepOutcome::Entered(_) => self.entered += 1,
            StepOutcome::Guided(_) => self.guided += 1,
            StepOutcome::Left(_) => self.left += 1,
        }
    }

    /// Sums two partial reports.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            tick: self.tick.max(other.tick),
            exempt: self.exempt + other.exempt,
            pinned: self.pinned + other.pinned,
            free: self.free + other.free,
            entered: self.entered + other.entered,
            guided: self.guided + other.guided,
            left: self.left + other.left,
        }
    }

    /// Bodies carried by a surface at the end of the step.
    pub fn carried(&self) -> usize {
        self.entered + self.guided
    }

    /// Bodies stepped in total.
    pub fn total(&self) -> usize {
        self.exempt + self.pinned + self.free + self.entered + self.guided + self.left
    }
}

/// Owns a set of transport bodies and the fixed-step counter.
#[derive(Debug)]
pub struct TransportSystem<B = RigidBody> {
    bodies: Vec<TransportBody<B>>,
    tick: Tick,
}

impl<B> Default for TransportSystem<B> {
    fn default() -> Self {
        Self {
            bodies: Vec::new(),
            tick: Tick::ZERO,
        }
    }
}

impl<B: RigidBodyHandle> TransportSystem<B> {
    /// An empty system at tick zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body and returns its index.
    pub fn push(&mut self, body: TransportBody<B>) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Bodies in insertion order.
    pub fn bodies(&self) -> &[TransportBody<B>] {
        &self.bodies
    }

    /// Mutable bodies in insertion order.
    pub fn bodies_mut(&mut self) -> &mut [TransportBody<B>] {
        &mut self.bodies
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns `true` when no bodies are tracked.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Tick the next step will run at.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Steps every body once, in order.
    pub fn step<S>(&mut self, scene: &S) -> StepReport
    where
        S: TransportScene + ?Sized,
    {
        let tick = self.tick;
        let mut report = StepReport {
            tick,
            ..StepReport::default()
        };
        for body in &mut self.bodies {
            report.record(body.fixed_step(scene, tick));
        }
        self.finish(report)
    }

    /// Steps every body once on the rayon thread pool.
    #[cfg(feature = "parallel")]
    pub fn step_parallel<S>(&mut self, scene: &S) -> StepReport
    where
        S: TransportScene + Sync + ?Sized,
        B: Send,
    {
        use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};

        let tick = self.tick;
        let empty = move || StepReport {
            tick,
            ..StepReport::default()
        };
        let report = self
            .bodies
            .par_iter_mut()
            .fold(empty, |mut acc, body| {
                acc.record(body.fixed_step(scene, tick));
                acc
            })
            .reduce(empty, StepReport::merge);
        self.finish(report)
    }

    fn finish(&mut self, report: StepReport) -> StepReport {
        trace!(
            tick = %report.tick,
            carried = report.carried(),
            entered = report.entered,
            left = report.left,
            "transport step"
        );
        self.tick = self.tick.next();
        report
    }
}

impl TransportSystem<RigidBody> {
    /// Integrates free bodies under `gravity`. Guided bodies are kinematic and
    /// stay where the mover put them.
    ///
    /// Unrealized spawn sources and pinned bodies are held by the host, not
    /// simulated, so they are skipped.
    pub fn integrate(&mut self, dt: f32, gravity: Vec3) {
        for body in &mut self.bodies {
            if body.is_spawn_exempt() || body.is_pinned() {
                continue;
            }
            body.rigid_mut().integrate(dt, gravity);
        }
    }
}
