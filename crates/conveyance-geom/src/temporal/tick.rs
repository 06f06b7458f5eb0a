// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;

/// Discrete fixed-step simulation tick.
///
/// The host advances in integer ticks with a fixed `dt`. This newtype keeps
/// tick passing explicit across APIs and in log fields.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick {
    index: u64,
}

impl Tick {
    /// The first tick.
    pub const ZERO: Self = Self::new(0);

    /// Creates a new tick with the given index.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self { index }
    }

    /// Returns the tick index.
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// Returns the following tick.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self::new(self.index + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}
