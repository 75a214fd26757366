//! Resource contracts between the runtime and the format decoders.
//!
//! Template, area, and instance decoding lives outside this workspace; what
//! crosses the boundary is a [`ModuleBlueprint`] of already-decoded
//! primitives. [`StaticProvider`] is the in-memory implementation used by
//! tests, the demo runner, and embedders that build modules programmatically.

use std::collections::BTreeMap;

use boreal_foundation::{ObjectType, Result};
use boreal_nav::SurfaceMaterial;
use boreal_world::{Door, HookKind, Perception, Placeable, Stats};
use glam::Vec3;

/// Hands the runtime decoded modules by name.
pub trait ResourceProvider: Send + Sync {
    /// Whether the named module exists.
    fn has_module(&self, name: &str) -> bool;

    /// Decodes the named module.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown names and `CorruptData` when the
    /// backing data cannot be decoded.
    fn module(&self, name: &str) -> Result<ModuleBlueprint>;
}

/// Narrow tabular lookups against the game's balance data.
pub trait GameDataProvider: Send + Sync {
    /// Borrows a decoded table by name.
    fn table(&self, name: &str) -> Option<&DataTable>;

    /// One float cell, falling back to `default` for missing tables, rows,
    /// columns, or unparseable cells.
    fn table_float(&self, table: &str, row: usize, column: &str, default: f32) -> f32 {
        self.table(table)
            .and_then(|table| table.cell(row, column))
            .and_then(|cell| cell.parse().ok())
            .unwrap_or(default)
    }
}

/// A decoded two-dimensional data table: named columns, rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    /// Column labels.
    pub columns: Vec<String>,
    /// Row cells, one inner vector per row.
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// The cell at `row` under the named column.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }
}

/// A decoded module: areas, entity instances, and the entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleBlueprint {
    /// Module name, unique per provider.
    pub name: String,
    /// Area geometry in load order.
    pub areas: Vec<AreaBlueprint>,
    /// Index into [`ModuleBlueprint::areas`] where the player starts.
    pub entry_area: usize,
    /// Player start position.
    pub entry_position: Vec3,
    /// Player start facing in radians.
    pub entry_facing: f32,
    /// Entity instances to spawn.
    pub instances: Vec<InstanceBlueprint>,
    /// Faction reputation triples `(a, b, reputation)`, applied mutually.
    pub hostility: Vec<(u16, u16, u8)>,
}

/// One area's name and raw walkmesh arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaBlueprint {
    /// Display name.
    pub name: String,
    /// Walkmesh vertices.
    pub vertices: Vec<Vec3>,
    /// Face index triples into the vertex array.
    pub faces: Vec<[u32; 3]>,
    /// Per-face neighbor indices, `-1` for boundary edges.
    pub adjacency: Vec<[i32; 3]>,
    /// Per-face surface material.
    pub materials: Vec<SurfaceMaterial>,
}

/// One decoded entity instance.
///
/// Payload fields override the spawn-time defaults for the object type;
/// `None` keeps the default.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceBlueprint {
    /// What to spawn.
    pub object_type: ObjectType,
    /// Script-facing tag.
    pub tag: String,
    /// Index into the module's area list.
    pub area: usize,
    /// World position.
    pub position: Vec3,
    /// Heading in radians.
    pub facing: f32,
    /// Vitals override.
    pub stats: Option<Stats>,
    /// Senses override.
    pub perception: Option<Perception>,
    /// Door state override.
    pub door: Option<Door>,
    /// Placeable state override.
    pub placeable: Option<Placeable>,
    /// Trigger volume outline, for trigger instances.
    pub trigger_polygon: Option<Vec<Vec3>>,
    /// Script hook bindings.
    pub hooks: Vec<(HookKind, String)>,
    /// Faction row.
    pub faction: Option<u16>,
}

impl InstanceBlueprint {
    /// An instance with every payload left at the spawn default.
    #[must_use]
    pub fn new(
        object_type: ObjectType,
        tag: impl Into<String>,
        area: usize,
        position: Vec3,
    ) -> Self {
        Self {
            object_type,
            tag: tag.into(),
            area,
            position,
            facing: 0.0,
            stats: None,
            perception: None,
            door: None,
            placeable: None,
            trigger_polygon: None,
            hooks: Vec::new(),
            faction: None,
        }
    }
}

impl ModuleBlueprint {
    /// The built-in demonstration module: one stone courtyard with a
    /// patrolling guard, a hostile thug, a locked gate, a supply crate, and
    /// an ambush trigger.
    #[must_use]
    pub fn demo() -> Self {
        let courtyard = AreaBlueprint {
            name: "courtyard".to_owned(),
            vertices: vec![
                Vec3::new(-30.0, -30.0, 0.0),
                Vec3::new(30.0, -30.0, 0.0),
                Vec3::new(30.0, 30.0, 0.0),
                Vec3::new(-30.0, 30.0, 0.0),
            ],
            faces: vec![[0, 1, 2], [0, 2, 3]],
            adjacency: vec![[-1, -1, 1], [0, -1, -1]],
            materials: vec![SurfaceMaterial::Stone; 2],
        };

        let mut guard =
            InstanceBlueprint::new(ObjectType::Creature, "guard", 0, Vec3::new(-10.0, -10.0, 0.0));
        guard.faction = Some(1);
        guard.hooks.push((HookKind::Heartbeat, "demo_guard_hb".to_owned()));

        let mut thug =
            InstanceBlueprint::new(ObjectType::Creature, "thug", 0, Vec3::new(18.0, 0.0, 0.0));
        thug.faction = Some(2);
        thug.stats = Some(Stats {
            hp: 8,
            max_hp: 8,
            damage: 2,
            ..Stats::default()
        });

        let mut gate =
            InstanceBlueprint::new(ObjectType::Door, "courtyard_gate", 0, Vec3::new(0.0, 25.0, 0.0));
        gate.door = Some(Door {
            open: false,
            locked: true,
            key_tag: "gate_key".to_owned(),
        });

        let mut ambush =
            InstanceBlueprint::new(ObjectType::Trigger, "ambush_zone", 0, Vec3::new(15.0, 0.0, 0.0));
        ambush.trigger_polygon = Some(vec![
            Vec3::new(10.0, -5.0, 0.0),
            Vec3::new(20.0, -5.0, 0.0),
            Vec3::new(20.0, 5.0, 0.0),
            Vec3::new(10.0, 5.0, 0.0),
        ]);
        ambush.hooks.push((HookKind::Enter, "demo_ambush_enter".to_owned()));

        Self {
            name: "demo".to_owned(),
            areas: vec![courtyard],
            entry_area: 0,
            entry_position: Vec3::new(0.0, -20.0, 0.0),
            entry_facing: 0.0,
            instances: vec![
                guard,
                InstanceBlueprint::new(ObjectType::Waypoint, "guard_1", 0, Vec3::new(-10.0, 10.0, 0.0)),
                InstanceBlueprint::new(ObjectType::Waypoint, "guard_2", 0, Vec3::new(10.0, 10.0, 0.0)),
                thug,
                gate,
                InstanceBlueprint::new(ObjectType::Placeable, "supply_crate", 0, Vec3::new(5.0, -5.0, 0.0)),
                ambush,
            ],
            hostility: vec![(1, 2, 0), (0, 2, 0)],
        }
    }
}

/// In-memory [`ResourceProvider`] and [`GameDataProvider`].
#[derive(Debug, Default)]
pub struct StaticProvider {
    modules: BTreeMap<String, ModuleBlueprint>,
    tables: BTreeMap<String, DataTable>,
}

impl StaticProvider {
    /// An empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider holding only the built-in demo module.
    #[must_use]
    pub fn demo() -> Self {
        let mut provider = Self::new();
        provider.insert_module(ModuleBlueprint::demo());
        provider
    }

    /// Registers a module under its own name, replacing any previous one.
    pub fn insert_module(&mut self, blueprint: ModuleBlueprint) {
        self.modules.insert(blueprint.name.clone(), blueprint);
    }

    /// Registers a data table.
    pub fn insert_table(&mut self, name: impl Into<String>, table: DataTable) {
        self.tables.insert(name.into(), table);
    }
}

impl ResourceProvider for StaticProvider {
    fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    fn module(&self, name: &str) -> Result<ModuleBlueprint> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| boreal_foundation::Error::not_found(format!("module '{name}'")))
    }
}

impl GameDataProvider for StaticProvider {
    fn table(&self, name: &str) -> Option<&DataTable> {
        self.tables.get(name)
    }
}
