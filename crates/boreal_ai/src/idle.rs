//! Idle behavior: patrols, wandering, look-arounds, fidgets.

use std::f32::consts::TAU;
use std::sync::Arc;

use boreal_foundation::{ObjectId, ObjectType};
use boreal_world::{Action, ActionQueue, Entity, World};
use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::controller::CreatureState;
use crate::policy::FamilyPolicy;

/// XY distance at which a patroller counts as having reached its waypoint.
/// Looser than movement arrival slop so a completed walk always registers.
const WAYPOINT_EPSILON: f32 = 0.5;

/// Seconds a fidget animation plays.
const FIDGET_SECONDS: f32 = 2.0;

/// Patrol bookkeeping. Routes are discovered once per creature; waypoints
/// spawned afterwards are not picked up.
#[derive(Debug)]
pub(crate) enum Patrol {
    Unsearched,
    NoRoute,
    Route(PatrolRoute),
}

#[derive(Debug)]
pub(crate) struct PatrolRoute {
    waypoints: Vec<ObjectId>,
    index: usize,
    waiting: f32,
}

/// One idle decision for a creature whose action queue is empty.
///
/// Patrollers walk their route and pause [`FamilyPolicy::idle`]'s
/// `patrol_wait` at each stop. Everyone else counts down the wander, look,
/// and fidget timers; wander claims the queue first, and the other two never
/// override whatever is already queued.
pub(crate) fn tick(
    world: &mut World,
    id: ObjectId,
    state: &mut CreatureState,
    policy: &FamilyPolicy,
    rng: &mut ChaCha8Rng,
    dt: f32,
) {
    if policy.supports_patrol {
        if matches!(state.patrol, Patrol::Unsearched) {
            state.patrol = discover_route(world, id);
        }
        if let Patrol::Route(route) = &mut state.patrol {
            patrol_tick(world, id, route, policy.idle.patrol_wait, dt);
            return;
        }
    }

    state.wander -= dt;
    state.look -= dt;
    state.idle_anim -= dt;

    if state.wander <= 0.0 {
        state.wander += policy.idle.wander_interval;
        let destination =
            wander_destination(world, id, state.spawn_position, policy.idle.wander_radius, rng);
        if let Some(destination) = destination {
            enqueue(world, id, Action::RandomWalk { destination });
        }
    }
    if state.look <= 0.0 {
        state.look += policy.idle.look_interval;
        if queue_is_idle(world, id) {
            let facing = rng.gen_range(0.0..TAU);
            enqueue(world, id, Action::TurnTo { facing });
        }
    }
    if state.idle_anim <= 0.0 {
        state.idle_anim += policy.idle.idle_anim_interval;
        if queue_is_idle(world, id) {
            enqueue(
                world,
                id,
                Action::PlayAnimation {
                    animation: "fidget".to_owned(),
                    duration: FIDGET_SECONDS,
                },
            );
        }
    }
}

/// Finds same-area waypoints tagged `"<tag>_<suffix>"` and orders them by
/// tag, so `guard_post_1` precedes `guard_post_2` regardless of spawn order.
fn discover_route(world: &World, id: ObjectId) -> Patrol {
    let Ok(entity) = world.entity(id) else {
        return Patrol::NoRoute;
    };
    if entity.tag.is_empty() {
        return Patrol::NoRoute;
    }
    let prefix = format!("{}_", entity.tag);
    let mut tagged: Vec<(&str, ObjectId)> = world
        .live_entities()
        .filter(|other| {
            other.object_type() == ObjectType::Waypoint
                && other.area == entity.area
                && other.tag.starts_with(&prefix)
        })
        .map(|other| (other.tag.as_str(), other.id()))
        .collect();
    if tagged.is_empty() {
        return Patrol::NoRoute;
    }
    tagged.sort_unstable();
    Patrol::Route(PatrolRoute {
        waypoints: tagged.into_iter().map(|(_, waypoint)| waypoint).collect(),
        index: 0,
        waiting: 0.0,
    })
}

fn patrol_tick(world: &mut World, id: ObjectId, route: &mut PatrolRoute, wait: f32, dt: f32) {
    if route.waiting > 0.0 {
        route.waiting -= dt;
        return;
    }
    let Some(position) = world.position(id) else {
        return;
    };
    let target = route.waypoints[route.index];
    let Some(goal) = world.position(target) else {
        // Waypoint destroyed mid-route: skip the stop, keep the route.
        route.index = (route.index + 1) % route.waypoints.len();
        return;
    };
    if position.truncate().distance(goal.truncate()) <= WAYPOINT_EPSILON {
        route.index = (route.index + 1) % route.waypoints.len();
        route.waiting = wait;
    } else {
        enqueue(
            world,
            id,
            Action::MoveToPoint {
                destination: goal,
                run: false,
            },
        );
    }
}

/// Samples a uniform point in the wander disc around `anchor` and projects
/// it onto the area's walkable surface. Off-mesh samples skip this wander;
/// without a navmesh the raw sample stands.
fn wander_destination(
    world: &World,
    id: ObjectId,
    anchor: Vec3,
    radius: f32,
    rng: &mut ChaCha8Rng,
) -> Option<Vec3> {
    let angle = rng.gen_range(0.0..TAU);
    let reach = radius * rng.gen_range(0.0f32..1.0).sqrt();
    let candidate = anchor + Vec3::new(reach * angle.cos(), reach * angle.sin(), 0.0);
    let navmesh = world
        .entity(id)
        .ok()
        .and_then(|entity| entity.area)
        .and_then(|area| world.area(area))
        .map(|area| Arc::clone(area.navmesh()));
    match navmesh {
        Some(mesh) => mesh
            .project_to_surface(candidate)
            .map(|surface| surface.position),
        None => Some(candidate),
    }
}

fn queue_is_idle(world: &World, id: ObjectId) -> bool {
    world
        .entity(id)
        .ok()
        .and_then(Entity::action_queue)
        .is_some_and(ActionQueue::is_idle)
}

fn enqueue(world: &mut World, id: ObjectId, action: Action) {
    if let Ok(entity) = world.entity_mut(id) {
        if let Some(queue) = entity.action_queue_mut() {
            queue.add(action);
        }
    }
}
