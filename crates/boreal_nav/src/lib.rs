//! Navigation mesh queries for the Boreal runtime.
//!
//! This crate provides:
//! - [`SurfaceMaterial`] - The legacy surface-material table and walkability
//! - [`NavMesh`] - Triangle mesh with validation and an optional AABB tree
//! - [`RayHit`] / [`SurfacePoint`] - Query results for raycasts and projection
//! - Line-of-sight tests and A* pathfinding over face adjacency
//!
//! Coordinates are Z-up: the ground plane is XY and height is Z, matching the
//! walkmesh formats all four engine families ship.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bvh;
mod material;
mod mesh;
mod path;

pub use material::SurfaceMaterial;
pub use mesh::{NavMesh, RayHit, SurfacePoint};
