//! Staged module loading.
//!
//! A load builds the incoming module completely off to the side (navmeshes,
//! world, instances, player) and only then does the session swap it in.
//! Nothing about the running module is touched until the replacement is
//! whole, so a failed load can never leave a partial module behind.

use std::sync::Arc;

use boreal_foundation::{AreaId, Error, ObjectId, ObjectType, Result};
use boreal_nav::NavMesh;
use boreal_world::{Component, EntityFlags, Faction, HookKind, Trigger, World};
use tracing::{debug, warn};

use crate::provider::{InstanceBlueprint, ModuleBlueprint, ResourceProvider};

/// Optional load-progress callback. Successful loads observe a monotonic
/// non-decreasing sequence in `[0, 1]` ending at exactly `1.0`.
pub type ProgressSink<'a> = Option<&'a mut (dyn FnMut(f32) + Send)>;

pub(crate) fn report_progress(progress: &mut ProgressSink<'_>, fraction: f32) {
    if let Some(callback) = progress.as_mut() {
        callback(fraction);
    }
}

/// What spawning a module's instances produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Instances spawned into the world.
    pub instances_spawned: u32,
    /// Corrupt instances skipped.
    pub instances_skipped: u32,
}

/// A fully built module waiting to be swapped in.
pub(crate) struct StagedModule {
    pub(crate) name: String,
    pub(crate) world: World,
    pub(crate) player: ObjectId,
    pub(crate) entry_area: AreaId,
    pub(crate) navmesh: Arc<NavMesh>,
    pub(crate) report: LoadReport,
}

/// Tracks the current module and stages replacements.
pub struct ModuleLoader {
    provider: Arc<dyn ResourceProvider>,
    current: Option<CurrentModule>,
}

impl std::fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct CurrentModule {
    name: String,
    entry_area: AreaId,
    navmesh: Arc<NavMesh>,
}

impl ModuleLoader {
    pub(crate) fn new(provider: Arc<dyn ResourceProvider>) -> Self {
        Self {
            provider,
            current: None,
        }
    }

    /// Whether the provider knows the named module.
    #[must_use]
    pub fn has_module(&self, name: &str) -> bool {
        self.provider.has_module(name)
    }

    /// The loaded module's name.
    #[must_use]
    pub fn current_module(&self) -> Option<&str> {
        self.current.as_ref().map(|module| module.name.as_str())
    }

    /// The loaded module's entry area.
    #[must_use]
    pub fn current_area(&self) -> Option<AreaId> {
        self.current.as_ref().map(|module| module.entry_area)
    }

    /// The entry area's navmesh.
    #[must_use]
    pub fn current_navmesh(&self) -> Option<Arc<NavMesh>> {
        self.current
            .as_ref()
            .map(|module| Arc::clone(&module.navmesh))
    }

    pub(crate) fn commit(&mut self, name: String, entry_area: AreaId, navmesh: Arc<NavMesh>) {
        self.current = Some(CurrentModule {
            name,
            entry_area,
            navmesh,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.current = None;
    }

    /// Builds the named module without touching the current one.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) async fn stage(
        &self,
        name: &str,
        progress: &mut ProgressSink<'_>,
    ) -> Result<StagedModule> {
        let blueprint = self.provider.module(name)?;
        report_progress(progress, 0.1);
        tokio::task::yield_now().await;

        if blueprint.areas.is_empty() {
            return Err(Error::corrupt_data(format!("module '{name}' has no areas")));
        }
        if blueprint.entry_area >= blueprint.areas.len() {
            return Err(Error::corrupt_data(format!(
                "module '{name}' entry area {} is out of range",
                blueprint.entry_area
            )));
        }

        // Every navmesh must build before anything else happens.
        let mut meshes = Vec::with_capacity(blueprint.areas.len());
        let area_count = blueprint.areas.len() as f32;
        for (index, area) in blueprint.areas.iter().enumerate() {
            let mesh = NavMesh::new(
                area.vertices.clone(),
                area.faces.clone(),
                area.adjacency.clone(),
                area.materials.clone(),
            )?
            .with_aabb_tree();
            meshes.push(Arc::new(mesh));
            report_progress(progress, 0.1 + 0.3 * ((index + 1) as f32 / area_count));
            tokio::task::yield_now().await;
        }

        let mut world = World::new();
        let area_ids: Vec<AreaId> = blueprint
            .areas
            .iter()
            .zip(&meshes)
            .map(|(area, mesh)| world.add_area(area.name.clone(), Arc::clone(mesh)))
            .collect();

        let mut load_report = LoadReport::default();
        let instance_count = blueprint.instances.len().max(1) as f32;
        for (index, instance) in blueprint.instances.iter().enumerate() {
            match spawn_instance(&mut world, &area_ids, instance) {
                Ok(id) => {
                    debug!(%id, tag = %instance.tag, "spawned instance");
                    load_report.instances_spawned += 1;
                }
                Err(error) => {
                    warn!(tag = %instance.tag, %error, "skipping corrupt instance");
                    load_report.instances_skipped += 1;
                }
            }
            report_progress(progress, 0.4 + 0.5 * ((index + 1) as f32 / instance_count));
        }
        tokio::task::yield_now().await;

        let entry_area = area_ids[blueprint.entry_area];
        let player = spawn_player(&mut world, &blueprint, entry_area)?;

        for &(a, b, reputation) in &blueprint.hostility {
            world.factions_mut().set_mutual(a, b, reputation);
        }
        report_progress(progress, 0.95);

        Ok(StagedModule {
            name: name.to_owned(),
            world,
            player,
            entry_area,
            navmesh: Arc::clone(&meshes[blueprint.entry_area]),
            report: load_report,
        })
    }
}

/// Validates and spawns one instance. Every check precedes the spawn, so a
/// rejected instance leaves no trace in the world.
fn spawn_instance(
    world: &mut World,
    area_ids: &[AreaId],
    instance: &InstanceBlueprint,
) -> Result<ObjectId> {
    let Some(&area) = area_ids.get(instance.area) else {
        return Err(Error::corrupt_data(format!(
            "area index {} is out of range",
            instance.area
        )));
    };
    if !instance.position.is_finite() || !instance.facing.is_finite() {
        return Err(Error::corrupt_data("non-finite placement"));
    }

    let id = world.spawn(instance.object_type, instance.tag.clone());
    {
        let entity = world.entity_mut(id)?;
        if let Some(transform) = entity.transform_mut() {
            transform.position = instance.position;
            transform.facing = instance.facing;
        }
        if let Some(stats) = instance.stats {
            entity.attach(Component::Stats(stats));
        }
        if let Some(perception) = &instance.perception {
            entity.attach(Component::Perception(perception.clone()));
        }
        if let Some(door) = &instance.door {
            entity.attach(Component::Door(door.clone()));
        }
        if let Some(placeable) = instance.placeable {
            entity.attach(Component::Placeable(placeable));
        }
        if let Some(polygon) = &instance.trigger_polygon {
            entity.attach(Component::Trigger(Trigger {
                polygon: polygon.clone(),
                ..Trigger::default()
            }));
        }
        if let Some(faction) = instance.faction {
            entity.attach(Component::Faction(Faction { faction }));
        }
        if let Some(hooks) = entity.script_hooks_mut() {
            for (kind, script) in &instance.hooks {
                hooks.bind(*kind, script.clone());
            }
        }
    }
    world.move_to_area(id, area)?;
    world.fire_hook(id, HookKind::Spawn, None);
    Ok(id)
}

/// Spawns the player creature at the module entry and seats it in the party.
fn spawn_player(
    world: &mut World,
    blueprint: &ModuleBlueprint,
    entry_area: AreaId,
) -> Result<ObjectId> {
    let player = world.spawn(ObjectType::Creature, "player");
    {
        let entity = world.entity_mut(player)?;
        entity.flags |= EntityFlags::PLAYER;
        if let Some(transform) = entity.transform_mut() {
            transform.position = blueprint.entry_position;
            transform.facing = blueprint.entry_facing;
        }
    }
    world.move_to_area(player, entry_area)?;
    world.party_mut().add_member(player);
    Ok(player)
}
