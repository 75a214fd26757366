//! Idle routines
//!
//! Patrol posts, heartbeat scripting, and perception through real area
//! geometry, without any hostiles in play.

use std::sync::Arc;

use boreal_ai::AiController;
use boreal_foundation::{EngineFamily, ObjectId, ObjectType};
use boreal_nav::{NavMesh, SurfaceMaterial};
use boreal_world::{HookKind, World, WorldEvent};
use glam::Vec3;

fn plate() -> Arc<NavMesh> {
    Arc::new(
        NavMesh::new(
            vec![
                Vec3::new(-100.0, -100.0, 0.0),
                Vec3::new(100.0, -100.0, 0.0),
                Vec3::new(100.0, 100.0, 0.0),
                Vec3::new(-100.0, 100.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            vec![[-1, -1, 1], [0, -1, -1]],
            vec![SurfaceMaterial::Dirt; 2],
        )
        .unwrap(),
    )
}

/// Open ground split down the middle by an opaque screen at x = 0.
fn walled() -> Arc<NavMesh> {
    Arc::new(
        NavMesh::new(
            vec![
                Vec3::new(-50.0, -50.0, 0.0),
                Vec3::new(50.0, -50.0, 0.0),
                Vec3::new(50.0, 50.0, 0.0),
                Vec3::new(-50.0, 50.0, 0.0),
                Vec3::new(0.0, -50.0, -1.0),
                Vec3::new(0.0, 50.0, -1.0),
                Vec3::new(0.0, 50.0, 5.0),
                Vec3::new(0.0, -50.0, 5.0),
            ],
            vec![[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]],
            vec![[-1, -1, 1], [0, -1, -1], [-1, -1, 3], [2, -1, -1]],
            vec![
                SurfaceMaterial::Stone,
                SurfaceMaterial::Stone,
                SurfaceMaterial::NonWalk,
                SurfaceMaterial::NonWalk,
            ],
        )
        .unwrap(),
    )
}

fn creature(world: &mut World, tag: &str, position: Vec3) -> ObjectId {
    let id = world.spawn(ObjectType::Creature, tag);
    world.entity_mut(id).unwrap().transform_mut().unwrap().position = position;
    id
}

/// Two neutral creatures six units apart on the given mesh, events drained.
fn facing_pair(mesh: Arc<NavMesh>) -> (World, ObjectId, ObjectId) {
    let mut world = World::new();
    let arena = world.add_area("arena", mesh);
    let west = creature(&mut world, "west", Vec3::new(-3.0, 0.0, 0.0));
    let east = creature(&mut world, "east", Vec3::new(3.0, 0.0, 0.0));
    world.move_to_area(west, arena).unwrap();
    world.move_to_area(east, arena).unwrap();
    world.drain_events();
    (world, west, east)
}

// =============================================================================
// Posts and heartbeats
// =============================================================================

#[test]
fn sentries_hold_their_post_while_timers_tick() {
    let mut world = World::new();
    let yard = world.add_area("yard", plate());
    let sentry = creature(&mut world, "statue", Vec3::ZERO);
    let post = world.spawn(ObjectType::Waypoint, "statue_1");
    world
        .entity_mut(sentry)
        .unwrap()
        .script_hooks_mut()
        .unwrap()
        .bind(HookKind::Heartbeat, "post_watch");
    world.move_to_area(sentry, yard).unwrap();
    world.move_to_area(post, yard).unwrap();
    world.drain_events();

    // A one-stop route under the sentry's feet: the patrol keeps claiming the
    // idle tick, so the sentry neither wanders nor walks, and its timers keep
    // running. Twelve and a half seconds covers the six-second heartbeat twice.
    let mut controller = AiController::new(EngineFamily::Odyssey, 7);
    let mut events = Vec::new();
    for _ in 0..25 {
        controller.update(&mut world, 0.5).unwrap();
        world.update(0.5).unwrap();
        events.extend(world.drain_events());
        assert_eq!(world.position(sentry), Some(Vec3::ZERO));
    }

    assert_eq!(
        events,
        vec![
            WorldEvent::Hook {
                owner: sentry,
                kind: HookKind::Heartbeat,
                script: "post_watch".into(),
                other: None,
            };
            2
        ]
    );
    assert!(
        world
            .entity(sentry)
            .unwrap()
            .action_queue()
            .unwrap()
            .is_idle()
    );
}

// =============================================================================
// Sensing through geometry
// =============================================================================

#[test]
fn screens_gate_sight_but_not_hearing() {
    let (mut world, west, east) = facing_pair(walled());

    let mut controller = AiController::new(EngineFamily::Odyssey, 11);
    let mut events = Vec::new();
    for _ in 0..2 {
        controller.update(&mut world, 0.5).unwrap();
        world.update(0.5).unwrap();
        events.extend(world.drain_events());
    }

    // One report per observer on the first pulse, then silence: nothing
    // about the pair changes on the second.
    assert_eq!(events.len(), 2);
    for (observer, perceived) in [(west, east), (east, west)] {
        assert!(events.contains(&WorldEvent::Perception {
            observer,
            perceived,
            seen: false,
            heard: true,
        }));
    }
}

#[test]
fn open_ground_reports_full_sightings() {
    let (mut world, west, east) = facing_pair(plate());

    let mut controller = AiController::new(EngineFamily::Odyssey, 11);
    let mut events = Vec::new();
    for _ in 0..2 {
        controller.update(&mut world, 0.5).unwrap();
        world.update(0.5).unwrap();
        events.extend(world.drain_events());
    }

    assert_eq!(events.len(), 2);
    for (observer, perceived) in [(west, east), (east, west)] {
        assert!(events.contains(&WorldEvent::Perception {
            observer,
            perceived,
            seen: true,
            heard: true,
        }));
    }
}
