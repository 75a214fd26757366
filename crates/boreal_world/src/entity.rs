//! Game object shells.
//!
//! An entity is identity plus a component bag. It holds no reference back to
//! the world; systems resolve [`ObjectId`] handles against the arena instead,
//! which keeps ownership single-rooted and serialization flat.

use std::collections::BTreeMap;

use bitflags::bitflags;
use boreal_foundation::{AreaId, ObjectId, ObjectType};

use crate::action::ActionQueue;
use crate::component::{
    Component, ComponentKind, Door, Faction, Inventory, Perception, Placeable, ScriptHooks,
    Stats, Transform, Trigger,
};

bitflags! {
    /// Entity-level state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntityFlags: u8 {
        /// Player-controlled; the AI never drives it.
        const PLAYER = 1;
        /// Mid-dialog; the AI leaves it alone.
        const IN_CONVERSATION = 1 << 1;
        /// Plot-critical; effects may not kill it.
        const PLOT = 1 << 2;
    }
}

/// A game object: identity, flags, and at most one component per kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: ObjectId,
    object_type: ObjectType,
    /// Script-visible lookup name. Mutable; many entities share a tag.
    pub tag: String,
    /// The area this entity currently occupies.
    pub area: Option<AreaId>,
    /// Entity-level state bits.
    pub flags: EntityFlags,
    valid: bool,
    components: BTreeMap<ComponentKind, Component>,
}

impl Entity {
    /// Creates a bare entity with no components.
    pub(crate) fn new(id: ObjectId, object_type: ObjectType, tag: impl Into<String>) -> Self {
        Self {
            id,
            object_type,
            tag: tag.into(),
            area: None,
            flags: EntityFlags::empty(),
            valid: true,
            components: BTreeMap::new(),
        }
    }

    /// The arena handle. Never reused within a world.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The immutable object category.
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Whether the entity still exists. Destroyed entities linger as invalid
    /// shells so their ids stay retired.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Marks the entity destroyed and drops its components.
    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
        self.area = None;
        self.components.clear();
    }

    /// Attaches a component, replacing any existing one of the same kind.
    pub fn attach(&mut self, component: Component) {
        self.components.insert(component.kind(), component);
    }

    /// Detaches and returns a component.
    pub fn detach(&mut self, kind: ComponentKind) -> Option<Component> {
        self.components.remove(&kind)
    }

    /// Whether a component of `kind` is attached.
    #[must_use]
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    /// Borrows a component by kind.
    #[must_use]
    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.get(&kind)
    }

    /// Attached kinds in update order.
    pub fn component_kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }

    /// Borrows the transform.
    #[must_use]
    pub fn transform(&self) -> Option<&Transform> {
        match self.components.get(&ComponentKind::Transform) {
            Some(Component::Transform(transform)) => Some(transform),
            _ => None,
        }
    }

    /// Mutably borrows the transform.
    #[must_use]
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        match self.components.get_mut(&ComponentKind::Transform) {
            Some(Component::Transform(transform)) => Some(transform),
            _ => None,
        }
    }

    /// Borrows the action queue.
    #[must_use]
    pub fn action_queue(&self) -> Option<&ActionQueue> {
        match self.components.get(&ComponentKind::ActionQueue) {
            Some(Component::ActionQueue(queue)) => Some(queue),
            _ => None,
        }
    }

    /// Mutably borrows the action queue.
    #[must_use]
    pub fn action_queue_mut(&mut self) -> Option<&mut ActionQueue> {
        match self.components.get_mut(&ComponentKind::ActionQueue) {
            Some(Component::ActionQueue(queue)) => Some(queue),
            _ => None,
        }
    }

    /// Borrows the stats block.
    #[must_use]
    pub fn stats(&self) -> Option<&Stats> {
        match self.components.get(&ComponentKind::Stats) {
            Some(Component::Stats(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Mutably borrows the stats block.
    #[must_use]
    pub fn stats_mut(&mut self) -> Option<&mut Stats> {
        match self.components.get_mut(&ComponentKind::Stats) {
            Some(Component::Stats(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Borrows the perception state.
    #[must_use]
    pub fn perception(&self) -> Option<&Perception> {
        match self.components.get(&ComponentKind::Perception) {
            Some(Component::Perception(perception)) => Some(perception),
            _ => None,
        }
    }

    /// Mutably borrows the perception state.
    #[must_use]
    pub fn perception_mut(&mut self) -> Option<&mut Perception> {
        match self.components.get_mut(&ComponentKind::Perception) {
            Some(Component::Perception(perception)) => Some(perception),
            _ => None,
        }
    }

    /// Borrows the inventory.
    #[must_use]
    pub fn inventory(&self) -> Option<&Inventory> {
        match self.components.get(&ComponentKind::Inventory) {
            Some(Component::Inventory(inventory)) => Some(inventory),
            _ => None,
        }
    }

    /// Mutably borrows the inventory.
    #[must_use]
    pub fn inventory_mut(&mut self) -> Option<&mut Inventory> {
        match self.components.get_mut(&ComponentKind::Inventory) {
            Some(Component::Inventory(inventory)) => Some(inventory),
            _ => None,
        }
    }

    /// Borrows the faction membership.
    #[must_use]
    pub fn faction(&self) -> Option<&Faction> {
        match self.components.get(&ComponentKind::Faction) {
            Some(Component::Faction(faction)) => Some(faction),
            _ => None,
        }
    }

    /// Mutably borrows the faction membership.
    #[must_use]
    pub fn faction_mut(&mut self) -> Option<&mut Faction> {
        match self.components.get_mut(&ComponentKind::Faction) {
            Some(Component::Faction(faction)) => Some(faction),
            _ => None,
        }
    }

    /// Borrows the script hooks.
    #[must_use]
    pub fn script_hooks(&self) -> Option<&ScriptHooks> {
        match self.components.get(&ComponentKind::ScriptHooks) {
            Some(Component::ScriptHooks(hooks)) => Some(hooks),
            _ => None,
        }
    }

    /// Mutably borrows the script hooks.
    #[must_use]
    pub fn script_hooks_mut(&mut self) -> Option<&mut ScriptHooks> {
        match self.components.get_mut(&ComponentKind::ScriptHooks) {
            Some(Component::ScriptHooks(hooks)) => Some(hooks),
            _ => None,
        }
    }

    /// Borrows the door state.
    #[must_use]
    pub fn door(&self) -> Option<&Door> {
        match self.components.get(&ComponentKind::Door) {
            Some(Component::Door(door)) => Some(door),
            _ => None,
        }
    }

    /// Mutably borrows the door state.
    #[must_use]
    pub fn door_mut(&mut self) -> Option<&mut Door> {
        match self.components.get_mut(&ComponentKind::Door) {
            Some(Component::Door(door)) => Some(door),
            _ => None,
        }
    }

    /// Borrows the placeable state.
    #[must_use]
    pub fn placeable(&self) -> Option<&Placeable> {
        match self.components.get(&ComponentKind::Placeable) {
            Some(Component::Placeable(placeable)) => Some(placeable),
            _ => None,
        }
    }

    /// Mutably borrows the placeable state.
    #[must_use]
    pub fn placeable_mut(&mut self) -> Option<&mut Placeable> {
        match self.components.get_mut(&ComponentKind::Placeable) {
            Some(Component::Placeable(placeable)) => Some(placeable),
            _ => None,
        }
    }

    /// Borrows the trigger volume.
    #[must_use]
    pub fn trigger(&self) -> Option<&Trigger> {
        match self.components.get(&ComponentKind::Trigger) {
            Some(Component::Trigger(trigger)) => Some(trigger),
            _ => None,
        }
    }

    /// Mutably borrows the trigger volume.
    #[must_use]
    pub fn trigger_mut(&mut self) -> Option<&mut Trigger> {
        match self.components.get_mut(&ComponentKind::Trigger) {
            Some(Component::Trigger(trigger)) => Some(trigger),
            _ => None,
        }
    }
}
