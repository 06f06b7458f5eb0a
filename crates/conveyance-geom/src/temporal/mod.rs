// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-step time utilities.

#[doc = "Discrete simulation tick newtype."]
pub mod tick;
