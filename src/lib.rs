//! Boreal - world-simulation runtime for legacy 3D RPG engine families
//!
//! This crate re-exports all layers of the Boreal system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: boreal_session    — Engine/module-loader/session state machine
//! Layer 2: boreal_ai         — Per-tick behavior engine (heartbeat, perception, combat, idle)
//!          boreal_save       — Binary save-state (de)serialization
//! Layer 1: boreal_world      — Entity/component framework, areas, actions, events
//!          boreal_nav        — Navigation mesh (raycast, line-of-sight, pathfinding)
//! Layer 0: boreal_foundation — Core types (ObjectId, EngineFamily, Error, LocalValue)
//! ```

pub use boreal_ai as ai;
pub use boreal_foundation as foundation;
pub use boreal_nav as nav;
pub use boreal_save as save;
pub use boreal_session as session;
pub use boreal_world as world;
