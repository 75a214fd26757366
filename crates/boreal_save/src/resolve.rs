//! Post-restore reference resolution.
//!
//! Save records carry raw ids, and a skipped record leaves holes: transforms
//! parented to nothing, inventories holding retired handles, object locals
//! naming entities that never came back. Resolution runs after the whole
//! batch, in two passes, so restore order never matters: first the set of
//! live ids, then a sweep that clears everything pointing outside it.

use std::collections::BTreeSet;

use boreal_foundation::{LocalValue, ObjectId};
use boreal_world::{Entity, World};
use tracing::debug;

/// Tally of references cleared by [`resolve_references`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveReport {
    /// Transform parents cleared (dangling or self-referential).
    pub parents_cleared: u32,
    /// Inventory item handles dropped.
    pub items_cleared: u32,
    /// Object-valued script locals nulled.
    pub locals_cleared: u32,
    /// Party members pruned.
    pub party_cleared: u32,
}

impl ResolveReport {
    /// Total references cleared.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.parents_cleared + self.items_cleared + self.locals_cleared + self.party_cleared
    }
}

/// Clears every cross-reference that does not point at a live entity.
///
/// A transform whose parent is itself counts as dangling; attachment cycles
/// of length one would otherwise hang position resolution.
#[allow(clippy::cast_possible_truncation)]
pub fn resolve_references(world: &mut World) -> ResolveReport {
    let mut report = ResolveReport::default();
    let live: BTreeSet<ObjectId> = world.live_entities().map(Entity::id).collect();

    for id in live.iter().copied() {
        let Ok(entity) = world.entity_mut(id) else {
            continue;
        };
        if let Some(transform) = entity.transform_mut() {
            if let Some(parent) = transform.parent {
                if parent == id || !live.contains(&parent) {
                    transform.parent = None;
                    report.parents_cleared += 1;
                }
            }
        }
        if let Some(inventory) = entity.inventory_mut() {
            let before = inventory.items.len();
            inventory.items.retain(|item| live.contains(item));
            report.items_cleared += (before - inventory.items.len()) as u32;
        }
        if let Some(hooks) = entity.script_hooks_mut() {
            let dangling: Vec<String> = hooks
                .export_locals()
                .into_iter()
                .filter_map(|(name, value)| match value {
                    LocalValue::Object(target) if !live.contains(&target) => Some(name),
                    _ => None,
                })
                .collect();
            for name in dangling {
                hooks.set_local(name, LocalValue::Null);
                report.locals_cleared += 1;
            }
        }
    }

    let departed: Vec<ObjectId> = world
        .party()
        .members()
        .iter()
        .copied()
        .filter(|member| !live.contains(member))
        .collect();
    for member in departed {
        world.party_mut().remove_member(member);
        report.party_cleared += 1;
    }

    if report.total() > 0 {
        debug!(
            parents = report.parents_cleared,
            items = report.items_cleared,
            locals = report.locals_cleared,
            party = report.party_cleared,
            "cleared dangling references"
        );
    }
    report
}
