//! Engine, module loading, and the game session state machine for Boreal.
//!
//! This crate provides:
//! - [`Engine`] / [`FamilyProfile`] - One runtime per engine family, with
//!   family differences injected as closures
//! - [`GameSession`] - The `Idle -> ModuleLoaded -> ModuleRunning` lifecycle
//! - [`ModuleLoader`] - Staged module builds that swap in atomically
//! - [`ResourceProvider`] / [`GameDataProvider`] - The seams behind which
//!   native format decoding lives
//! - [`detect_install`] - Probe a directory for a known game install
//!
//! A load never mutates the running module: the incoming module is staged
//! completely (navmeshes, world, instances, player) and only then swapped
//! in, so failures leave the session exactly as it was.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod detect;
mod engine;
mod loader;
mod provider;
mod session;

pub use detect::{GameInstall, detect_install};
pub use engine::{Engine, FamilyProfile};
pub use loader::{LoadReport, ModuleLoader, ProgressSink};
pub use provider::{
    AreaBlueprint, DataTable, GameDataProvider, InstanceBlueprint, ModuleBlueprint,
    ResourceProvider, StaticProvider,
};
pub use session::{GameSession, SessionState};
