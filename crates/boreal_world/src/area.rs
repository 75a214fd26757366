//! Loaded areas.

use std::sync::Arc;

use boreal_foundation::{AreaId, ObjectId};
use boreal_nav::NavMesh;

/// One loaded area: a navmesh plus the entities standing in it.
///
/// The roster keeps insertion order so systems that walk an area visit
/// entities deterministically.
#[derive(Debug, Clone)]
pub struct Area {
    id: AreaId,
    /// Display name from the area blueprint.
    pub name: String,
    navmesh: Arc<NavMesh>,
    roster: Vec<ObjectId>,
}

impl Area {
    pub(crate) fn new(id: AreaId, name: impl Into<String>, navmesh: Arc<NavMesh>) -> Self {
        Self {
            id,
            name: name.into(),
            navmesh,
            roster: Vec::new(),
        }
    }

    /// The area's id within the module.
    #[must_use]
    pub fn id(&self) -> AreaId {
        self.id
    }

    /// The walkable geometry, shared with the renderer and AI.
    #[must_use]
    pub fn navmesh(&self) -> &Arc<NavMesh> {
        &self.navmesh
    }

    /// Entities in the area, in insertion order.
    #[must_use]
    pub fn roster(&self) -> &[ObjectId] {
        &self.roster
    }

    pub(crate) fn roster_add(&mut self, id: ObjectId) {
        if !self.roster.contains(&id) {
            self.roster.push(id);
        }
    }

    pub(crate) fn roster_remove(&mut self, id: ObjectId) {
        self.roster.retain(|&member| member != id);
    }
}
