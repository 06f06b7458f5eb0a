// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Conveyance crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`draw`] - Debug-draw sink that records primitives
//! - [`scene`] - Scripted scene whose probe hits are set per tick, with call
//!   counters on the capability queries
//! - [`fixtures`] - Body construction shorthands

pub mod config;
pub mod draw;
pub mod fixtures;
pub mod scene;

pub use config::InMemoryConfigStore;
pub use draw::{DrawCall, RecordingDraw};
pub use fixtures::{body_at, free_unit, sample};
pub use scene::{LineSurface, ScriptedScene};
