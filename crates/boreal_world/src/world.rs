//! The world: entity arena, areas, factions, globals, events, and the tick.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use boreal_foundation::{AreaId, Error, LocalValue, ObjectId, ObjectType, Result};
use boreal_nav::NavMesh;
use glam::Vec3;
use tracing::warn;

use crate::action::ActionQueue;
use crate::area::Area;
use crate::component::{
    Component, ComponentKind, Door, Faction, Inventory, Perception, Placeable, ScriptHooks,
    Stats, Transform, Trigger, Waypoint,
};
use crate::entity::{Entity, EntityFlags};
use crate::event::{EventQueue, HookKind, WorldEvent};
use crate::faction::FactionRelations;
use crate::party::Party;

/// Deferred cross-entity effect. Entity updates may not touch other
/// entities; they queue commands the world applies after the loop, so the
/// outcome of a tick cannot depend on arena order.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Command {
    /// Remove hit points from `target`.
    Damage {
        /// The entity being damaged.
        target: ObjectId,
        /// The entity dealing the damage.
        source: ObjectId,
        /// Hit points to remove.
        amount: i32,
    },
}

/// All simulation state for one loaded module.
///
/// Entities live in an arena indexed by [`ObjectId`]; destroyed entities
/// leave an invalid shell behind so ids are never reused. `None` slots are
/// either retired gaps from a partial save restore or the hole left while an
/// entity is detached for its own update.
#[derive(Debug, Default)]
pub struct World {
    entities: Vec<Option<Entity>>,
    areas: Vec<Area>,
    factions: FactionRelations,
    events: EventQueue,
    party: Party,
    globals: BTreeMap<String, LocalValue>,
    time: f64,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Time and globals =====

    /// Seconds of simulation time accumulated by [`World::update`].
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Overwrites simulation time. Used by save restore.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Reads a named global. Unset names read as `Null`.
    #[must_use]
    pub fn global(&self, name: &str) -> LocalValue {
        self.globals.get(name).cloned().unwrap_or(LocalValue::Null)
    }

    /// Sets a named global. `Null` removes the entry.
    pub fn set_global(&mut self, name: impl Into<String>, value: LocalValue) {
        let name = name.into();
        if value.is_null() {
            self.globals.remove(&name);
        } else {
            self.globals.insert(name, value);
        }
    }

    /// All globals in name order.
    #[must_use]
    pub fn globals(&self) -> &BTreeMap<String, LocalValue> {
        &self.globals
    }

    // ===== Areas =====

    /// Registers an area and returns its id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_area(&mut self, name: impl Into<String>, navmesh: Arc<NavMesh>) -> AreaId {
        let id = AreaId::from_raw(self.areas.len() as u32);
        self.areas.push(Area::new(id, name, navmesh));
        id
    }

    /// Borrows an area by id.
    #[must_use]
    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.get(id.raw() as usize)
    }

    /// All areas in load order.
    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    // ===== Entity lifecycle =====

    /// Spawns an entity with the default component set for its type: every
    /// object gets a transform and script hooks, creatures additionally get
    /// an action queue, stats, perception, an inventory, and a faction,
    /// doors/placeables/triggers/waypoints their marker components.
    #[allow(clippy::cast_possible_truncation)]
    pub fn spawn(&mut self, object_type: ObjectType, tag: impl Into<String>) -> ObjectId {
        let id = ObjectId::from_raw(self.entities.len() as u32);
        let mut entity = Entity::new(id, object_type, tag);
        attach_defaults(&mut entity, object_type);
        self.entities.push(Some(entity));
        id
    }

    /// Spawns a bare entity (no components) at a specific id, growing the
    /// arena with retired gap slots as needed. Save restore uses this to
    /// reproduce the saved id space; everyone else wants [`World::spawn`].
    ///
    /// # Errors
    ///
    /// Returns `Argument` when the id is the invalid sentinel or already
    /// allocated.
    pub fn spawn_at(
        &mut self,
        id: ObjectId,
        object_type: ObjectType,
        tag: impl Into<String>,
    ) -> Result<ObjectId> {
        if id.is_invalid() {
            return Err(Error::argument("cannot spawn at the invalid id"));
        }
        let index = id.raw() as usize;
        while self.entities.len() < index {
            self.entities.push(None);
        }
        if self.entities.len() == index {
            self.entities.push(Some(Entity::new(id, object_type, tag)));
            return Ok(id);
        }
        if self.entities[index].is_some() {
            return Err(Error::argument(format!("{id} is already allocated")));
        }
        self.entities[index] = Some(Entity::new(id, object_type, tag));
        Ok(id)
    }

    /// Destroys an entity: marks it invalid, drops its components, and
    /// removes it from its area roster and the party. Destroying an already
    /// destroyed entity is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` when the id was never allocated.
    pub fn destroy(&mut self, id: ObjectId) -> Result<()> {
        let index = id.raw() as usize;
        let Some(entity) = self.entities.get_mut(index).and_then(Option::as_mut) else {
            return Err(Error::object_not_found(id));
        };
        if !entity.is_valid() {
            return Ok(());
        }
        let area = entity.area;
        entity.invalidate();
        if let Some(area_id) = area {
            if let Some(area) = self.areas.get_mut(area_id.raw() as usize) {
                area.roster_remove(id);
            }
        }
        self.party.remove_member(id);
        Ok(())
    }

    /// Whether the id names a live entity.
    #[must_use]
    pub fn is_valid(&self, id: ObjectId) -> bool {
        self.entities
            .get(id.raw() as usize)
            .and_then(Option::as_ref)
            .is_some_and(Entity::is_valid)
    }

    /// Whether the id names a live entity that is not dead. Entities without
    /// stats cannot die.
    #[must_use]
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.entities
            .get(id.raw() as usize)
            .and_then(Option::as_ref)
            .is_some_and(|entity| {
                entity.is_valid() && entity.stats().is_none_or(|stats| !stats.is_dead())
            })
    }

    /// Borrows a live entity.
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` for ids never allocated and `ObjectDestroyed`
    /// for destroyed ones; component access fails rather than pretending.
    pub fn entity(&self, id: ObjectId) -> Result<&Entity> {
        let Some(entity) = self.entities.get(id.raw() as usize).and_then(Option::as_ref) else {
            return Err(Error::object_not_found(id));
        };
        if !entity.is_valid() {
            return Err(Error::object_destroyed(id));
        }
        Ok(entity)
    }

    /// Mutably borrows a live entity.
    ///
    /// # Errors
    ///
    /// Same contract as [`World::entity`].
    pub fn entity_mut(&mut self, id: ObjectId) -> Result<&mut Entity> {
        let Some(entity) = self
            .entities
            .get_mut(id.raw() as usize)
            .and_then(Option::as_mut)
        else {
            return Err(Error::object_not_found(id));
        };
        if !entity.is_valid() {
            return Err(Error::object_destroyed(id));
        }
        Ok(entity)
    }

    /// Borrows an entity shell whether or not it is still valid. Save
    /// capture walks the whole arena with this.
    #[must_use]
    pub fn peek(&self, id: ObjectId) -> Option<&Entity> {
        self.entities.get(id.raw() as usize).and_then(Option::as_ref)
    }

    /// Total ids ever allocated, including destroyed shells and gaps.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.entities.len()
    }

    /// Live entities in spawn order.
    pub fn live_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter_map(Option::as_ref)
            .filter(|entity| entity.is_valid())
    }

    /// Every allocated entity in id order, destroyed shells included. Save
    /// capture walks this; most callers want [`World::live_entities`].
    pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter_map(Option::as_ref)
    }

    /// Number of live entities.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live_entities().count()
    }

    /// First live entity with the given tag, in spawn order.
    #[must_use]
    pub fn find_by_tag(&self, tag: &str) -> Option<ObjectId> {
        self.live_entities()
            .find(|entity| entity.tag == tag)
            .map(Entity::id)
    }

    /// Position of a live entity, when it has a transform.
    #[must_use]
    pub fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.entities
            .get(id.raw() as usize)
            .and_then(Option::as_ref)
            .filter(|entity| entity.is_valid())
            .and_then(Entity::transform)
            .map(|transform| transform.position)
    }

    /// Moves an entity into an area, updating rosters and emitting an
    /// [`WorldEvent::AreaTransition`]. Moving within the same area is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown areas, plus the [`World::entity_mut`]
    /// contract for the entity.
    pub fn move_to_area(&mut self, id: ObjectId, area: AreaId) -> Result<()> {
        if self.area(area).is_none() {
            return Err(Error::not_found(format!("area {area}")));
        }
        let entity = self.entity_mut(id)?;
        let previous = entity.area;
        if previous == Some(area) {
            return Ok(());
        }
        entity.area = Some(area);
        if let Some(prev) = previous {
            if let Some(prev_area) = self.areas.get_mut(prev.raw() as usize) {
                prev_area.roster_remove(id);
            }
        }
        self.areas[area.raw() as usize].roster_add(id);
        self.events.push(WorldEvent::AreaTransition {
            object: id,
            from: previous,
            to: area,
        });
        Ok(())
    }

    // ===== Factions and party =====

    /// The faction reputation matrix.
    #[must_use]
    pub fn factions(&self) -> &FactionRelations {
        &self.factions
    }

    /// Mutable faction reputation matrix.
    pub fn factions_mut(&mut self) -> &mut FactionRelations {
        &mut self.factions
    }

    /// Whether `of` attacks `toward` on sight. Entities without a faction
    /// are hostile to no one.
    #[must_use]
    pub fn are_hostile(&self, of: ObjectId, toward: ObjectId) -> bool {
        let (Ok(a), Ok(b)) = (self.entity(of), self.entity(toward)) else {
            return false;
        };
        match (a.faction(), b.faction()) {
            (Some(fa), Some(fb)) => self.factions.is_hostile(fa.faction, fb.faction),
            _ => false,
        }
    }

    /// The player party.
    #[must_use]
    pub fn party(&self) -> &Party {
        &self.party
    }

    /// Mutable player party.
    pub fn party_mut(&mut self) -> &mut Party {
        &mut self.party
    }

    // ===== Events =====

    /// Appends an event to the world's buffer.
    pub fn push_event(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Drains all buffered events in emission order.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain()
    }

    /// Borrows the event buffer without draining it.
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Emits a [`WorldEvent::Hook`] if `owner` is live and has a script
    /// bound to the slot. Missing bindings are silently nothing.
    pub fn fire_hook(&mut self, owner: ObjectId, kind: HookKind, other: Option<ObjectId>) {
        let Ok(entity) = self.entity(owner) else {
            return;
        };
        let Some(script) = entity.script_hooks().and_then(|hooks| hooks.script(kind)) else {
            return;
        };
        let script = script.to_owned();
        self.events.push(WorldEvent::Hook {
            owner,
            kind,
            script,
            other,
        });
    }

    /// Deals damage, emitting [`WorldEvent::Damaged`] and, when hit points
    /// reach zero, [`WorldEvent::Death`]. Plot-flagged entities are left at
    /// one hit point. Dead or destroyed targets shrug it off.
    pub fn apply_damage(&mut self, target: ObjectId, source: ObjectId, amount: i32) {
        let Ok(entity) = self.entity_mut(target) else {
            return;
        };
        let plot = entity.flags.contains(EntityFlags::PLOT);
        let Some(stats) = entity.stats_mut() else {
            return;
        };
        if stats.is_dead() {
            return;
        }
        let mut applied = amount.max(0);
        if plot {
            applied = applied.min(stats.hp - 1).max(0);
        }
        stats.hp = (stats.hp - applied).max(0);
        let died = stats.is_dead();

        self.events.push(WorldEvent::Damaged {
            target,
            source,
            amount: applied,
        });
        self.fire_hook(target, HookKind::Damaged, Some(source));
        if died {
            if let Some(queue) = self
                .entity_mut(target)
                .ok()
                .and_then(Entity::action_queue_mut)
            {
                queue.clear();
            }
            self.events.push(WorldEvent::Death {
                victim: target,
                killer: source,
            });
            self.fire_hook(target, HookKind::Death, Some(source));
        }
    }

    // ===== The tick =====

    /// Advances the simulation by `dt` seconds.
    ///
    /// Entities update in spawn order; each applies its components in
    /// [`ComponentKind`] order. An entity whose update fails is logged and
    /// skipped for the tick, never aborting the others. Queued cross-entity
    /// commands are applied after the loop, then trigger volumes are swept
    /// for enter/exit crossings.
    ///
    /// # Errors
    ///
    /// Returns `Argument` when `dt` is negative or not finite.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::argument(format!(
                "delta time must be finite and non-negative, got {dt}"
            )));
        }
        self.time += f64::from(dt);

        let mut commands = Vec::new();
        for index in 0..self.entities.len() {
            // Detach the entity so its update can read the rest of the world.
            let Some(mut entity) = self.entities[index].take() else {
                continue;
            };
            if entity.is_valid() {
                if let Err(err) = self.update_entity(&mut entity, &mut commands, dt) {
                    warn!(
                        id = %entity.id(),
                        tag = %entity.tag,
                        error = %err,
                        "entity update failed, skipped this tick"
                    );
                }
            }
            self.entities[index] = Some(entity);
        }

        for command in commands {
            match command {
                Command::Damage {
                    target,
                    source,
                    amount,
                } => self.apply_damage(target, source, amount),
            }
        }

        self.sweep_triggers();
        Ok(())
    }

    /// Applies one entity's components in kind order.
    fn update_entity(
        &self,
        entity: &mut Entity,
        commands: &mut Vec<Command>,
        dt: f32,
    ) -> Result<()> {
        let navmesh = entity
            .area
            .and_then(|id| self.area(id))
            .map(|area| Arc::clone(area.navmesh()));
        let kinds: Vec<ComponentKind> = entity.component_kinds().collect();
        for kind in kinds {
            match kind {
                ComponentKind::ActionQueue => {
                    // The queue mutates its owner; detach it to split the
                    // borrow, reattach whatever happens.
                    let Some(Component::ActionQueue(mut queue)) =
                        entity.detach(ComponentKind::ActionQueue)
                    else {
                        continue;
                    };
                    let result = queue.advance(entity, self, commands, navmesh.as_deref(), dt);
                    entity.attach(Component::ActionQueue(queue));
                    result?;
                }
                ComponentKind::Stats => {
                    if let Some(stats) = entity.stats_mut() {
                        stats.regenerate(dt);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Re-tests every trigger volume against the creatures in its area and
    /// emits enter/exit events for each crossing. Destroyed occupants are
    /// dropped without an exit event.
    fn sweep_triggers(&mut self) {
        let trigger_ids: Vec<ObjectId> = self
            .live_entities()
            .filter(|entity| entity.has(ComponentKind::Trigger))
            .map(Entity::id)
            .collect();

        for trigger_id in trigger_ids {
            let Ok(owner) = self.entity(trigger_id) else {
                continue;
            };
            let Some(area_id) = owner.area else {
                continue;
            };
            let Some(Component::Trigger(mut trigger)) = self
                .entity_mut(trigger_id)
                .ok()
                .and_then(|entity| entity.detach(ComponentKind::Trigger))
            else {
                continue;
            };

            let roster: Vec<ObjectId> = self
                .area(area_id)
                .map(|area| area.roster().to_vec())
                .unwrap_or_default();
            let mut inside = BTreeSet::new();
            for id in roster {
                if id == trigger_id {
                    continue;
                }
                let Ok(entity) = self.entity(id) else {
                    continue;
                };
                if entity.object_type() != ObjectType::Creature {
                    continue;
                }
                let Some(position) = entity.transform().map(|t| t.position) else {
                    continue;
                };
                if trigger.contains_xy(position) {
                    inside.insert(id);
                }
            }

            let entered: Vec<ObjectId> = inside
                .iter()
                .copied()
                .filter(|id| !trigger.occupants.contains(id))
                .collect();
            let exited: Vec<ObjectId> = trigger
                .occupants
                .iter()
                .copied()
                .filter(|id| !inside.contains(id) && self.is_valid(*id))
                .collect();
            trigger.occupants = inside;

            if let Ok(entity) = self.entity_mut(trigger_id) {
                entity.attach(Component::Trigger(trigger));
            }
            for id in entered {
                self.events.push(WorldEvent::TriggerEntered {
                    trigger: trigger_id,
                    object: id,
                });
                self.fire_hook(trigger_id, HookKind::Enter, Some(id));
            }
            for id in exited {
                self.events.push(WorldEvent::TriggerExited {
                    trigger: trigger_id,
                    object: id,
                });
                self.fire_hook(trigger_id, HookKind::Exit, Some(id));
            }
        }
    }
}

/// Attaches the default component set for a freshly spawned entity.
fn attach_defaults(entity: &mut Entity, object_type: ObjectType) {
    entity.attach(Component::Transform(Transform::default()));
    entity.attach(Component::ScriptHooks(ScriptHooks::default()));
    match object_type {
        ObjectType::Creature => {
            entity.attach(Component::ActionQueue(ActionQueue::new()));
            entity.attach(Component::Stats(Stats {
                hp: 10,
                max_hp: 10,
                damage: 1,
                ..Stats::default()
            }));
            entity.attach(Component::Perception(Perception::default()));
            entity.attach(Component::Inventory(Inventory::default()));
            entity.attach(Component::Faction(Faction::default()));
        }
        ObjectType::Door => {
            entity.attach(Component::Door(Door::default()));
        }
        ObjectType::Placeable => {
            entity.attach(Component::Placeable(Placeable::default()));
            entity.attach(Component::Inventory(Inventory::default()));
        }
        ObjectType::Trigger => {
            entity.attach(Component::Trigger(Trigger::default()));
        }
        ObjectType::Waypoint => {
            entity.attach(Component::Waypoint(Waypoint::default()));
        }
        ObjectType::Item | ObjectType::Sound => {}
    }
}
