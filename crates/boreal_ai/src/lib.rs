//! Creature AI for the Boreal runtime.
//!
//! This crate provides:
//! - Per-family behavior policies ([`FamilyPolicy`], [`IdleProfile`],
//!   [`PerceptionPolicy`]).
//! - A deterministic per-tick controller ([`AiController`]) that drives
//!   non-player creatures through perception pulses, heartbeat hooks,
//!   combat engagement, and idle behavior (patrols, wandering,
//!   look-arounds, fidget animations).
//!
//! The controller owns no entities. Each tick it reads creature state out
//! of a [`boreal_world::World`], decides, and expresses every decision as
//! either a queued [`boreal_world::Action`] or a fired script hook, so the
//! world remains the single source of truth for what creatures are doing.
//! All randomness flows through one seeded generator, which makes a whole
//! simulation replayable from `(seed, inputs)`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod combat;
mod controller;
mod idle;
mod perception;
mod policy;

pub use controller::{AiController, HEARTBEAT_INTERVAL, PERCEPTION_INTERVAL};
pub use policy::{COMBAT_SEARCH_RADIUS, FamilyPolicy, IdleProfile, PerceptionPolicy};
