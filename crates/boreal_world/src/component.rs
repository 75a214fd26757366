//! Typed components and the capability catalog.
//!
//! An entity carries at most one component per [`ComponentKind`]. The kind's
//! declaration order is load-bearing: the world applies per-tick component
//! behavior in this order, so movement lands before stat regeneration and
//! regeneration before anything that reads hit points.

use std::collections::{BTreeMap, BTreeSet};

use boreal_foundation::{LocalValue, ObjectId};
use glam::Vec3;

use crate::action::ActionQueue;
use crate::event::HookKind;

/// The capability catalog. Declaration order fixes per-tick update order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    /// Position, facing, scale, and optional attachment parent.
    Transform,
    /// FIFO behavior execution.
    ActionQueue,
    /// Hit points, force points, regeneration, damage.
    Stats,
    /// Senses and stealth skills.
    Perception,
    /// Carried item handles.
    Inventory,
    /// Faction membership.
    Faction,
    /// Script hook bindings and named locals.
    ScriptHooks,
    /// Door state.
    Door,
    /// Placeable state.
    Placeable,
    /// Trigger volume.
    Trigger,
    /// Navigation landmark marker.
    Waypoint,
}

impl ComponentKind {
    /// All kinds in update order.
    pub const ALL: [Self; 11] = [
        Self::Transform,
        Self::ActionQueue,
        Self::Stats,
        Self::Perception,
        Self::Inventory,
        Self::Faction,
        Self::ScriptHooks,
        Self::Door,
        Self::Placeable,
        Self::Trigger,
        Self::Waypoint,
    ];
}

/// A component value, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// See [`Transform`].
    Transform(Transform),
    /// See [`ActionQueue`].
    ActionQueue(ActionQueue),
    /// See [`Stats`].
    Stats(Stats),
    /// See [`Perception`].
    Perception(Perception),
    /// See [`Inventory`].
    Inventory(Inventory),
    /// See [`Faction`].
    Faction(Faction),
    /// See [`ScriptHooks`].
    ScriptHooks(ScriptHooks),
    /// See [`Door`].
    Door(Door),
    /// See [`Placeable`].
    Placeable(Placeable),
    /// See [`Trigger`].
    Trigger(Trigger),
    /// See [`Waypoint`].
    Waypoint(Waypoint),
}

impl Component {
    /// The kind tag of this component value.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Transform(_) => ComponentKind::Transform,
            Self::ActionQueue(_) => ComponentKind::ActionQueue,
            Self::Stats(_) => ComponentKind::Stats,
            Self::Perception(_) => ComponentKind::Perception,
            Self::Inventory(_) => ComponentKind::Inventory,
            Self::Faction(_) => ComponentKind::Faction,
            Self::ScriptHooks(_) => ComponentKind::ScriptHooks,
            Self::Door(_) => ComponentKind::Door,
            Self::Placeable(_) => ComponentKind::Placeable,
            Self::Trigger(_) => ComponentKind::Trigger,
            Self::Waypoint(_) => ComponentKind::Waypoint,
        }
    }
}

/// World placement. Z is up; the ground plane is XY.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position.
    pub position: Vec3,
    /// Heading in radians around Z.
    pub facing: f32,
    /// Uniform render scale.
    pub scale: f32,
    /// Attachment parent, resolved lazily against the arena. Cleared when
    /// the parent no longer exists.
    pub parent: Option<ObjectId>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: 0.0,
            scale: 1.0,
            parent: None,
        }
    }
}

/// Vital and combat statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    /// Current hit points. Zero or less is dead.
    pub hp: i32,
    /// Hit point ceiling.
    pub max_hp: i32,
    /// Current force points.
    pub fp: i32,
    /// Force point ceiling.
    pub max_fp: i32,
    /// Hit points regained per second.
    pub hp_regen: f32,
    /// Force points regained per second.
    pub fp_regen: f32,
    /// Flat damage dealt per melee swing.
    pub damage: i32,
    /// Fractional hit-point carry between ticks. Not persisted.
    pub hp_fraction: f32,
    /// Fractional force-point carry between ticks. Not persisted.
    pub fp_fraction: f32,
}

impl Stats {
    /// Whether this object is dead.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Advances regeneration, carrying fractional points across ticks.
    /// Dead objects do not regenerate.
    #[allow(clippy::cast_possible_truncation)]
    pub fn regenerate(&mut self, dt: f32) {
        if self.is_dead() {
            return;
        }
        if self.hp < self.max_hp && self.hp_regen > 0.0 {
            self.hp_fraction += self.hp_regen * dt;
            let whole = self.hp_fraction.floor();
            if whole >= 1.0 {
                self.hp = (self.hp + whole as i32).min(self.max_hp);
                self.hp_fraction -= whole;
            }
        }
        if self.fp < self.max_fp && self.fp_regen > 0.0 {
            self.fp_fraction += self.fp_regen * dt;
            let whole = self.fp_fraction.floor();
            if whole >= 1.0 {
                self.fp = (self.fp + whole as i32).min(self.max_fp);
                self.fp_fraction -= whole;
            }
        }
    }
}

/// Senses and stealth skills, plus the current perception sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Perception {
    /// Sight range in world units.
    pub sight_range: f32,
    /// Hearing range in world units.
    pub hearing_range: f32,
    /// Spot skill, rolled against a hider's hide skill.
    pub spot: i32,
    /// Listen skill.
    pub listen: i32,
    /// Hide skill.
    pub hide: i32,
    /// Move-silently skill.
    pub move_silently: i32,
    /// Objects currently seen.
    pub seen: BTreeSet<ObjectId>,
    /// Objects currently heard.
    pub heard: BTreeSet<ObjectId>,
}

impl Default for Perception {
    fn default() -> Self {
        Self {
            sight_range: 30.0,
            hearing_range: 20.0,
            spot: 0,
            listen: 0,
            hide: 0,
            move_silently: 0,
            seen: BTreeSet::new(),
            heard: BTreeSet::new(),
        }
    }
}

impl Perception {
    /// Whether any living thing is currently noticed.
    #[must_use]
    pub fn notices_anything(&self) -> bool {
        !self.seen.is_empty() || !self.heard.is_empty()
    }

    /// Whether `id` is currently seen or heard.
    #[must_use]
    pub fn notices(&self, id: ObjectId) -> bool {
        self.seen.contains(&id) || self.heard.contains(&id)
    }

    /// Drops a destroyed object from both sets.
    pub fn forget(&mut self, id: ObjectId) {
        self.seen.remove(&id);
        self.heard.remove(&id);
    }
}

/// Carried items, by handle. Items are entities of their own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inventory {
    /// Item handles in acquisition order.
    pub items: Vec<ObjectId>,
}

impl Inventory {
    /// Whether the inventory holds `item`.
    #[must_use]
    pub fn contains(&self, item: ObjectId) -> bool {
        self.items.contains(&item)
    }

    /// Adds an item handle if not already present.
    pub fn add(&mut self, item: ObjectId) {
        if !self.contains(item) {
            self.items.push(item);
        }
    }

    /// Removes an item handle. Returns whether it was present.
    pub fn remove(&mut self, item: ObjectId) -> bool {
        let before = self.items.len();
        self.items.retain(|&held| held != item);
        self.items.len() != before
    }
}

/// Faction membership. Relations live in the world's reputation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Faction {
    /// Faction row id.
    pub faction: u16,
}

/// Script hook bindings and script-visible named locals.
///
/// Locals cross the save boundary through [`ScriptHooks::export_locals`] and
/// [`ScriptHooks::import_locals`]; nothing inspects fields reflectively.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptHooks {
    scripts: BTreeMap<HookKind, String>,
    locals: BTreeMap<String, LocalValue>,
}

impl ScriptHooks {
    /// Binds a script name to a hook slot, replacing any previous binding.
    pub fn bind(&mut self, kind: HookKind, script: impl Into<String>) {
        self.scripts.insert(kind, script.into());
    }

    /// The script bound to a hook slot.
    #[must_use]
    pub fn script(&self, kind: HookKind) -> Option<&str> {
        self.scripts.get(&kind).map(String::as_str)
    }

    /// All bindings in hook order.
    pub fn bindings(&self) -> impl Iterator<Item = (HookKind, &str)> {
        self.scripts.iter().map(|(kind, script)| (*kind, script.as_str()))
    }

    /// Sets a named local. `Null` removes the entry.
    pub fn set_local(&mut self, name: impl Into<String>, value: LocalValue) {
        let name = name.into();
        if value.is_null() {
            self.locals.remove(&name);
        } else {
            self.locals.insert(name, value);
        }
    }

    /// Reads a named local. Unset names read as `Null`.
    #[must_use]
    pub fn local(&self, name: &str) -> LocalValue {
        self.locals.get(name).cloned().unwrap_or(LocalValue::Null)
    }

    /// Snapshots all locals in name order, for serialization.
    #[must_use]
    pub fn export_locals(&self) -> Vec<(String, LocalValue)> {
        self.locals
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Replaces all locals from a snapshot.
    pub fn import_locals(&mut self, entries: impl IntoIterator<Item = (String, LocalValue)>) {
        self.locals.clear();
        for (name, value) in entries {
            self.set_local(name, value);
        }
    }

    /// Locals referencing world objects, for post-load reference resolution.
    pub fn object_locals_mut(&mut self) -> impl Iterator<Item = &mut ObjectId> {
        self.locals.values_mut().filter_map(|value| match value {
            LocalValue::Object(id) => Some(id),
            _ => None,
        })
    }
}

/// Door state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Door {
    /// Whether the door stands open.
    pub open: bool,
    /// Whether the door is locked.
    pub locked: bool,
    /// Tag of the key item that opens the lock, empty for none.
    pub key_tag: String,
}

/// Placeable object state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeable {
    /// Whether creatures can use it.
    pub useable: bool,
    /// Static scenery never participates in saves or scripting.
    pub is_static: bool,
}

impl Default for Placeable {
    fn default() -> Self {
        Self {
            useable: true,
            is_static: false,
        }
    }
}

/// A trigger volume on the ground plane.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trigger {
    /// Volume outline in world space; only XY participates in the test.
    pub polygon: Vec<Vec3>,
    /// Creatures currently inside.
    pub occupants: BTreeSet<ObjectId>,
}

impl Trigger {
    /// Whether an XY point lies inside the polygon (even-odd rule).
    #[must_use]
    pub fn contains_xy(&self, point: Vec3) -> bool {
        let polygon = &self.polygon;
        if polygon.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = polygon.len() - 1;
        for i in 0..polygon.len() {
            let a = polygon[i];
            let b = polygon[j];
            if (a.y > point.y) != (b.y > point.y) {
                let slope_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
                if point.x < slope_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Navigation landmark. Carries no state; the tag is the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Waypoint {}
