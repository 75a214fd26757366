//! The per-entity wire record.
//!
//! Fixed section order: identity, Transform, Stats, Inventory, ScriptHooks,
//! Door, Placeable, custom tail. Every optional section is prefixed by a
//! flag byte, so absent components cost one byte and stay absent through a
//! round-trip.

use std::io::{Read, Write};

use boreal_foundation::{AreaId, Error, LocalValue, ObjectId, ObjectType, Result};
use boreal_world::{
    ActionQueue, Component, Door, Entity, Faction, HookKind, Inventory, Perception, Placeable,
    ScriptHooks, Stats, Transform, World,
};

use crate::codec::{SaveReader, SaveWriter};

/// One serialized entity.
///
/// Only state modules cannot rebuild is carried: action queues, perception
/// sets, faction relations, and trigger volumes come back from module data.
/// Cross-references (transform parent, inventory item ids) are raw
/// identifiers until [`crate::resolve_references`] runs over the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// Saved arena id. Restore reproduces it exactly.
    pub id: ObjectId,
    /// Script-facing tag.
    pub tag: String,
    /// What kind of object this is.
    pub object_type: ObjectType,
    /// The area the entity occupied, if any.
    pub area: Option<AreaId>,
    /// Whether the entity was still alive in the arena. Destroyed shells are
    /// saved so the id space survives a round-trip.
    pub valid: bool,
    /// World placement.
    pub transform: Option<Transform>,
    /// Vitals and combat numbers.
    pub stats: Option<Stats>,
    /// Carried item handles, raw.
    pub inventory: Option<Vec<ObjectId>>,
    /// Script bindings plus named dynamic locals.
    pub hooks: Option<HooksRecord>,
    /// Door state.
    pub door: Option<Door>,
    /// Placeable state.
    pub placeable: Option<Placeable>,
    /// Engine-specific extension values. Boreal writes an empty tail; values
    /// found in foreign saves ride along and re-serialize verbatim.
    pub custom: Vec<LocalValue>,
}

/// The ScriptHooks section: event bindings and named dynamic locals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HooksRecord {
    /// `(event, script resref)` pairs.
    pub bindings: Vec<(HookKind, String)>,
    /// Named locals, including object handles resolved after the batch.
    pub locals: Vec<(String, LocalValue)>,
}

impl HooksRecord {
    fn capture(hooks: &ScriptHooks) -> Self {
        Self {
            bindings: hooks
                .bindings()
                .map(|(kind, script)| (kind, script.to_owned()))
                .collect(),
            locals: hooks.export_locals(),
        }
    }
}

impl EntityRecord {
    /// Snapshots one entity, live or destroyed shell.
    #[must_use]
    pub fn capture(entity: &Entity) -> Self {
        Self {
            id: entity.id(),
            tag: entity.tag.clone(),
            object_type: entity.object_type(),
            area: entity.area,
            valid: entity.is_valid(),
            transform: entity.transform().copied(),
            // Tick-carry fractions are transient, not state.
            stats: entity.stats().map(|stats| Stats {
                hp_fraction: 0.0,
                fp_fraction: 0.0,
                ..*stats
            }),
            inventory: entity.inventory().map(|inventory| inventory.items.clone()),
            hooks: entity.script_hooks().map(HooksRecord::capture),
            door: entity.door().cloned(),
            placeable: entity.placeable().copied(),
            custom: Vec::new(),
        }
    }

    /// Recreates this record's entity in `world` at its saved id.
    ///
    /// Sections attach exactly as saved; creatures additionally get the
    /// runtime components a module load would give them (empty action queue,
    /// fresh perception, default faction), since those are never persisted.
    /// References stay raw; run [`crate::resolve_references`] after the
    /// whole batch.
    ///
    /// # Errors
    ///
    /// Returns `Argument` when the saved id is already allocated in `world`.
    pub fn restore(&self, world: &mut World) -> Result<ObjectId> {
        let id = world.spawn_at(self.id, self.object_type, self.tag.clone())?;
        let entity = world.entity_mut(id)?;
        if self.object_type == ObjectType::Creature {
            entity.attach(Component::ActionQueue(ActionQueue::new()));
            entity.attach(Component::Perception(Perception::default()));
            entity.attach(Component::Faction(Faction::default()));
        }
        if let Some(transform) = self.transform {
            entity.attach(Component::Transform(transform));
        }
        if let Some(stats) = self.stats {
            entity.attach(Component::Stats(stats));
        }
        if let Some(items) = &self.inventory {
            entity.attach(Component::Inventory(Inventory {
                items: items.clone(),
            }));
        }
        if let Some(hooks) = &self.hooks {
            let mut component = ScriptHooks::default();
            for (kind, script) in &hooks.bindings {
                component.bind(*kind, script.clone());
            }
            component.import_locals(hooks.locals.iter().cloned());
            entity.attach(Component::ScriptHooks(component));
        }
        if let Some(door) = &self.door {
            entity.attach(Component::Door(door.clone()));
        }
        if let Some(placeable) = self.placeable {
            entity.attach(Component::Placeable(placeable));
        }
        if let Some(area) = self.area {
            if world.move_to_area(id, area).is_err() {
                tracing::warn!(%id, %area, "saved area is not loaded, leaving the entity unplaced");
            }
        }
        if !self.valid {
            world.destroy(id)?;
        }
        Ok(id)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut SaveWriter<W>) -> Result<()> {
        writer.write_object_id(self.id)?;
        writer.write_string(&self.tag)?;
        writer.write_u8(self.object_type as u8)?;
        match self.area {
            Some(area) => {
                writer.write_bool(true)?;
                writer.write_u32(area.raw())?;
            }
            None => writer.write_bool(false)?,
        }
        writer.write_bool(self.valid)?;

        match &self.transform {
            Some(transform) => {
                writer.write_bool(true)?;
                write_transform(writer, transform)?;
            }
            None => writer.write_bool(false)?,
        }
        match &self.stats {
            Some(stats) => {
                writer.write_bool(true)?;
                write_stats(writer, stats)?;
            }
            None => writer.write_bool(false)?,
        }
        match &self.inventory {
            Some(items) => {
                writer.write_bool(true)?;
                writer.write_u32(section_len(items.len())?)?;
                for item in items {
                    writer.write_object_id(*item)?;
                }
            }
            None => writer.write_bool(false)?,
        }
        match &self.hooks {
            Some(hooks) => {
                writer.write_bool(true)?;
                write_hooks(writer, hooks)?;
            }
            None => writer.write_bool(false)?,
        }
        match &self.door {
            Some(door) => {
                writer.write_bool(true)?;
                writer.write_bool(door.open)?;
                writer.write_bool(door.locked)?;
                writer.write_string(&door.key_tag)?;
            }
            None => writer.write_bool(false)?,
        }
        match &self.placeable {
            Some(placeable) => {
                writer.write_bool(true)?;
                writer.write_bool(placeable.useable)?;
                writer.write_bool(placeable.is_static)?;
            }
            None => writer.write_bool(false)?,
        }

        writer.write_u32(section_len(self.custom.len())?)?;
        for value in &self.custom {
            writer.write_value(value)?;
        }
        Ok(())
    }

    pub(crate) fn read_from<R: Read>(reader: &mut SaveReader<R>) -> Result<Self> {
        let id = reader.read_object_id()?;
        let tag = reader.read_string()?;
        let raw_type = reader.read_u8()?;
        let object_type = ObjectType::from_raw(raw_type)
            .ok_or_else(|| Error::corrupt_data(format!("unknown object type {raw_type}")))?;
        let area = if reader.read_bool()? {
            Some(AreaId::from_raw(reader.read_u32()?))
        } else {
            None
        };
        let valid = reader.read_bool()?;

        let transform = if reader.read_bool()? {
            Some(read_transform(reader)?)
        } else {
            None
        };
        let stats = if reader.read_bool()? {
            Some(read_stats(reader)?)
        } else {
            None
        };
        let inventory = if reader.read_bool()? {
            let count = reader.read_u32()?;
            let mut items = Vec::with_capacity(count.min(1024) as usize);
            for _ in 0..count {
                items.push(reader.read_object_id()?);
            }
            Some(items)
        } else {
            None
        };
        let hooks = if reader.read_bool()? {
            Some(read_hooks(reader)?)
        } else {
            None
        };
        let door = if reader.read_bool()? {
            Some(Door {
                open: reader.read_bool()?,
                locked: reader.read_bool()?,
                key_tag: reader.read_string()?,
            })
        } else {
            None
        };
        let placeable = if reader.read_bool()? {
            Some(Placeable {
                useable: reader.read_bool()?,
                is_static: reader.read_bool()?,
            })
        } else {
            None
        };

        let custom_count = reader.read_u32()?;
        let mut custom = Vec::with_capacity(custom_count.min(1024) as usize);
        for _ in 0..custom_count {
            custom.push(reader.read_value()?);
        }

        Ok(Self {
            id,
            tag,
            object_type,
            area,
            valid,
            transform,
            stats,
            inventory,
            hooks,
            door,
            placeable,
            custom,
        })
    }
}

fn section_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::argument("section exceeds the u32 count prefix"))
}

fn write_transform<W: Write>(writer: &mut SaveWriter<W>, transform: &Transform) -> Result<()> {
    writer.write_vec3(transform.position)?;
    writer.write_f32(transform.facing)?;
    writer.write_f32(transform.scale)?;
    match transform.parent {
        Some(parent) => {
            writer.write_bool(true)?;
            writer.write_object_id(parent)
        }
        None => writer.write_bool(false),
    }
}

fn read_transform<R: Read>(reader: &mut SaveReader<R>) -> Result<Transform> {
    let position = reader.read_vec3()?;
    let facing = reader.read_f32()?;
    let scale = reader.read_f32()?;
    let parent = if reader.read_bool()? {
        Some(reader.read_object_id()?)
    } else {
        None
    };
    Ok(Transform {
        position,
        facing,
        scale,
        parent,
    })
}

fn write_stats<W: Write>(writer: &mut SaveWriter<W>, stats: &Stats) -> Result<()> {
    writer.write_i32(stats.hp)?;
    writer.write_i32(stats.max_hp)?;
    writer.write_i32(stats.fp)?;
    writer.write_i32(stats.max_fp)?;
    writer.write_f32(stats.hp_regen)?;
    writer.write_f32(stats.fp_regen)?;
    writer.write_i32(stats.damage)
}

fn read_stats<R: Read>(reader: &mut SaveReader<R>) -> Result<Stats> {
    Ok(Stats {
        hp: reader.read_i32()?,
        max_hp: reader.read_i32()?,
        fp: reader.read_i32()?,
        max_fp: reader.read_i32()?,
        hp_regen: reader.read_f32()?,
        fp_regen: reader.read_f32()?,
        damage: reader.read_i32()?,
        hp_fraction: 0.0,
        fp_fraction: 0.0,
    })
}

fn write_hooks<W: Write>(writer: &mut SaveWriter<W>, hooks: &HooksRecord) -> Result<()> {
    writer.write_u32(section_len(hooks.bindings.len())?)?;
    for (kind, script) in &hooks.bindings {
        writer.write_u8(hook_code(*kind))?;
        writer.write_string(script)?;
    }
    writer.write_u32(section_len(hooks.locals.len())?)?;
    for (name, value) in &hooks.locals {
        writer.write_string(name)?;
        writer.write_value(value)?;
    }
    Ok(())
}

fn read_hooks<R: Read>(reader: &mut SaveReader<R>) -> Result<HooksRecord> {
    let binding_count = reader.read_u32()?;
    let mut bindings = Vec::with_capacity(binding_count.min(64) as usize);
    for _ in 0..binding_count {
        let code = reader.read_u8()?;
        let kind = hook_from_code(code)
            .ok_or_else(|| Error::corrupt_data(format!("unknown hook code {code}")))?;
        bindings.push((kind, reader.read_string()?));
    }
    let local_count = reader.read_u32()?;
    let mut locals = Vec::with_capacity(local_count.min(1024) as usize);
    for _ in 0..local_count {
        let name = reader.read_string()?;
        locals.push((name, reader.read_value()?));
    }
    Ok(HooksRecord { bindings, locals })
}

/// Stable wire codes for hook kinds. Enum order is an in-memory detail; the
/// file format pins these explicitly.
fn hook_code(kind: HookKind) -> u8 {
    match kind {
        HookKind::Heartbeat => 0,
        HookKind::Perception => 1,
        HookKind::Damaged => 2,
        HookKind::Death => 3,
        HookKind::Enter => 4,
        HookKind::Exit => 5,
        HookKind::Used => 6,
        HookKind::Spawn => 7,
    }
}

fn hook_from_code(code: u8) -> Option<HookKind> {
    Some(match code {
        0 => HookKind::Heartbeat,
        1 => HookKind::Perception,
        2 => HookKind::Damaged,
        3 => HookKind::Death,
        4 => HookKind::Enter,
        5 => HookKind::Exit,
        6 => HookKind::Used,
        7 => HookKind::Spawn,
        _ => return None,
    })
}
