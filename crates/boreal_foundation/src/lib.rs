//! Core types shared by every layer of Boreal.
//!
//! This crate provides:
//! - [`ObjectId`] / [`ObjectType`] / [`AreaId`] - Simulation object identity
//! - [`EngineFamily`] - The four legacy engine lineages
//! - [`Error`] / [`ErrorKind`] / [`Result`] - Categorized error types
//! - [`LocalValue`] - The tagged value type for script locals and save data

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod family;
mod object;
mod value;

pub use error::{Error, ErrorKind, Result};
pub use family::EngineFamily;
pub use object::{AreaId, ObjectId, ObjectType};
pub use value::LocalValue;
