// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Initialization errors for transport bodies.

use thiserror::Error;

/// Fatal configuration errors detected before a body is ever stepped.
///
/// Per-tick conditions (a surface vanishing, a hit object without guidance)
/// are ordinary state transitions and never surface here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    /// The body was built without a rigid-body handle.
    #[error("transport body has no rigid-body handle")]
    MissingRigidBody,
    /// The body was built without a carried-unit descriptor.
    #[error("transport body has no carried unit")]
    MissingUnit,
    /// A configuration value is out of range.
    #[error("invalid transport config: {0}")]
    InvalidConfig(String),
}
