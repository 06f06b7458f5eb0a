// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Carried units and their synchronous pin/spawn notifications.

use core::fmt;

use crate::ids::UnitId;

/// Notification published by a [`CarriedUnit`] to its subscribers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnitEvent {
    /// The unit was pinned (`true`) or released (`false`).
    Pinned(bool),
    /// The unit, created as a spawn source, has been placed in the world.
    SpawnRealized,
}

type Listener = Box<dyn Fn(&UnitEvent) + Send + Sync>;

/// Handle returned by [`CarriedUnit::subscribe`], used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Descriptor of a transportable unit.
///
/// Listeners run synchronously on the publishing thread, in subscription
/// order.
pub struct CarriedUnit {
    id: UnitId,
    name: String,
    spawn_source: bool,
    spawn_realized: bool,
    pinned: bool,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
}

impl CarriedUnit {
    /// An ordinary unit, eligible for transport immediately.
    pub fn new(id: UnitId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            spawn_source: false,
            spawn_realized: false,
            pinned: false,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// A spawn-source unit: its body skips probing until
    /// [`CarriedUnit::realize_spawn`] is called.
    pub fn spawn_source(id: UnitId, name: impl Into<String>) -> Self {
        Self {
            spawn_source: true,
            ..Self::new(id, name)
        }
    }

    /// Unit identity.
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the unit was created as a spawn source.
    pub fn is_spawn_source(&self) -> bool {
        self.spawn_source
    }

    /// Whether the spawn has been realized.
    pub fn is_spawn_realized(&self) -> bool {
        self.spawn_realized
    }

    /// Current pin state.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Registers a listener for future events.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: Fn(&UnitEvent) + Send + Sync + 'static,
    {
        let handle = Subscription(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        self.listeners.push((handle, Box::new(listener)));
        handle
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(handle, _)| *handle != subscription);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn publish(&self, event: UnitEvent) {
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }

    /// Pins or releases the unit and notifies listeners.
    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
        self.publish(UnitEvent::Pinned(pinned));
    }

    /// Marks the spawn as realized. Publishes only the first time, and only
    /// for spawn sources.
    pub fn realize_spawn(&mut self) {
        if !self.spawn_source || self.spawn_realized {
            return;
        }
        self.spawn_realized = true;
        self.publish(UnitEvent::SpawnRealized);
    }
}

impl fmt::Debug for CarriedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarriedUnit")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("spawn_source", &self.spawn_source)
            .field("spawn_realized", &self.spawn_realized)
            .field("pinned", &self.pinned)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
