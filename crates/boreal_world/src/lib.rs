//! Entity/component world state and the per-tick simulation for Boreal.
//!
//! This crate provides:
//! - [`World`] - The entity arena, areas, factions, globals, and tick loop
//! - [`Entity`] / [`Component`] - Capability-based game objects
//! - [`Action`] / [`ActionQueue`] - FIFO behavior execution
//! - [`WorldEvent`] / [`EventQueue`] - Observable simulation output
//! - [`Party`] - The ordered player party roster
//!
//! Entities hold no reference back to the world; all cross-entity access
//! goes through [`boreal_foundation::ObjectId`] handles resolved against the
//! arena, which keeps ownership single-rooted and save/load trivial.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod action;
mod area;
mod component;
mod entity;
mod event;
mod faction;
mod party;
mod world;

pub use action::{ATTACK_INTERVAL, Action, ActionQueue, MELEE_RANGE, RUN_SPEED, WALK_SPEED};
pub use area::Area;
pub use component::{
    Component, ComponentKind, Door, Faction, Inventory, Perception, Placeable, ScriptHooks,
    Stats, Transform, Trigger, Waypoint,
};
pub use entity::{Entity, EntityFlags};
pub use event::{EventQueue, HookKind, WorldEvent};
pub use faction::{FactionRelations, HOSTILE_THRESHOLD};
pub use party::Party;
pub use world::World;
