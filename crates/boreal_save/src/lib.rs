//! Binary save-state serialization for Boreal worlds.
//!
//! This crate provides:
//! - A fixed-layout little-endian record format for entities
//!   ([`EntityRecord`]): identity, then presence-flagged component sections,
//!   then a tagged custom-data tail.
//! - A whole-world envelope ([`SaveGame`]): magic, version, clock, named
//!   globals, party, and a length-prefixed record batch.
//! - Fault containment on read: one corrupt record is skipped and counted,
//!   the rest of the batch still loads.
//! - Two-pass reference handling: handles are written raw and
//!   [`resolve_references`] clears whatever dangles once the batch is in.
//!
//! The format deliberately persists only what modules cannot rebuild. Action
//! queues, perception sets, faction relations, and trigger volumes all come
//! back from module data; the save carries the mutable remainder.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod codec;
mod game;
mod record;
mod resolve;

pub use game::{LoadedSave, PartyRecord, RestoreReport, SAVE_MAGIC, SAVE_VERSION, SaveGame};
pub use record::{EntityRecord, HooksRecord};
pub use resolve::{ResolveReport, resolve_references};
