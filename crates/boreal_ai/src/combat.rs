//! Combat engagement.

use boreal_foundation::ObjectId;
use boreal_world::{Action, World};
use glam::Vec3;

use crate::perception;
use crate::policy::COMBAT_SEARCH_RADIUS;

/// Whether `id` should be fighting: wounded, or a living hostile is
/// currently perceived.
pub(crate) fn in_combat(world: &World, id: ObjectId) -> bool {
    let Ok(entity) = world.entity(id) else {
        return false;
    };
    if let Some(stats) = entity.stats() {
        if stats.hp < stats.max_hp {
            return true;
        }
    }
    let Some(perception) = entity.perception() else {
        return false;
    };
    perception::notices_living_hostile(world, id, perception)
}

/// Queues an attack on the nearest living perceived hostile within
/// [`COMBAT_SEARCH_RADIUS`]. Distance ties break toward the lower id.
pub(crate) fn engage(world: &mut World, id: ObjectId, position: Vec3) {
    let Ok(entity) = world.entity(id) else {
        return;
    };
    let Some(perception) = entity.perception() else {
        return;
    };
    let mut best: Option<(f32, ObjectId)> = None;
    for &other in perception.seen.iter().chain(perception.heard.iter()) {
        if !world.is_alive(other) || !world.are_hostile(id, other) {
            continue;
        }
        let Some(other_position) = world.position(other) else {
            continue;
        };
        let distance = position.distance(other_position);
        if distance > COMBAT_SEARCH_RADIUS {
            continue;
        }
        let closer = match best {
            None => true,
            Some((best_distance, best_id)) => {
                distance < best_distance || (distance == best_distance && other < best_id)
            }
        };
        if closer {
            best = Some((distance, other));
        }
    }
    let Some((_, target)) = best else {
        return;
    };
    let Ok(entity) = world.entity_mut(id) else {
        return;
    };
    let Some(queue) = entity.action_queue_mut() else {
        return;
    };
    if queue.is_idle() {
        queue.add(Action::Attack { target });
    }
}
