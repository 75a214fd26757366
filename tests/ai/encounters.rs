//! Hostile encounters
//!
//! Perception-driven engagement running through the controller and the
//! world tick together, from first notice to the corpse.

use std::sync::Arc;

use boreal_ai::AiController;
use boreal_foundation::{EngineFamily, ObjectId, ObjectType};
use boreal_nav::{NavMesh, SurfaceMaterial};
use boreal_world::{World, WorldEvent};
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

fn creature(world: &mut World, tag: &str, position: Vec3, faction: u16) -> ObjectId {
    let id = world.spawn(ObjectType::Creature, tag);
    let entity = world.entity_mut(id).unwrap();
    entity.transform_mut().unwrap().position = position;
    entity.faction_mut().unwrap().faction = faction;
    id
}

// =============================================================================
// Engagement
// =============================================================================

#[test]
fn rivals_notice_engage_and_finish_the_brawl() {
    let mut world = World::new();
    let field = world.add_area("field", plate());
    let guard = creature(&mut world, "guard", Vec3::ZERO, 1);
    let thug = creature(&mut world, "thug", Vec3::new(10.0, 0.0, 0.0), 2);
    world.entity_mut(guard).unwrap().stats_mut().unwrap().damage = 4;
    world.move_to_area(guard, field).unwrap();
    world.move_to_area(thug, field).unwrap();
    world.factions_mut().set_mutual(1, 2, 0);
    world.drain_events();

    let mut controller = AiController::new(EngineFamily::Odyssey, 17);
    let mut events = Vec::new();
    for _ in 0..80 {
        controller.update(&mut world, 0.25).unwrap();
        world.update(0.25).unwrap();
        events.extend(world.drain_events());
    }

    assert!(
        events.iter().any(|event| matches!(
            event,
            WorldEvent::Perception { observer, perceived, seen: true, .. }
                if *observer == guard && *perceived == thug
        )),
        "the guard should spot the thug before anything else happens"
    );

    let death_at = events
        .iter()
        .position(|event| {
            matches!(
                event,
                WorldEvent::Death { victim, killer } if *victim == thug && *killer == guard
            )
        })
        .expect("the thug should fall to the guard");

    // Nothing keeps hitting the corpse.
    assert!(!events[death_at + 1..].iter().any(
        |event| matches!(event, WorldEvent::Damaged { target, .. } if *target == thug)
    ));

    assert!(!world.is_alive(thug));
    assert!(world.is_alive(guard));
    let guard_stats = *world.entity(guard).unwrap().stats().unwrap();
    assert!(
        guard_stats.hp < guard_stats.max_hp,
        "the thug should land at least one swing back"
    );
}

#[test]
fn heard_hostiles_beyond_chase_range_hold_the_creature_alert() {
    let mut world = World::new();
    let field = world.add_area("field", plate());
    let spawn = Vec3::ZERO;
    let listener = creature(&mut world, "listener", spawn, 1);
    let prowler = creature(&mut world, "prowler", Vec3::new(60.0, 0.0, 0.0), 2);
    // Sharp ears: the prowler is heard at sixty units but sits outside the
    // fifty-unit combat search radius.
    world
        .entity_mut(listener)
        .unwrap()
        .perception_mut()
        .unwrap()
        .hearing_range = 100.0;
    world.move_to_area(listener, field).unwrap();
    world.move_to_area(prowler, field).unwrap();
    world.factions_mut().set_mutual(1, 2, 0);
    world.drain_events();

    let mut controller = AiController::new(EngineFamily::Odyssey, 23);
    for _ in 0..20 {
        controller.update(&mut world, 0.5).unwrap();
        world.update(0.5).unwrap();
    }

    // Alert means frozen: no chase, no idle wandering, no swings.
    assert_eq!(world.position(listener), Some(spawn));
    assert!(
        world
            .entity(listener)
            .unwrap()
            .action_queue()
            .unwrap()
            .is_idle()
    );
    assert!(
        !world
            .drain_events()
            .iter()
            .any(|event| matches!(event, WorldEvent::Damaged { .. }))
    );
}

#[test]
fn wounds_put_a_loner_on_alert_instead_of_idling() {
    let mut world = World::new();
    let field = world.add_area("field", plate());
    let spawn = Vec3::new(2.0, -3.0, 0.0);
    let wounded = creature(&mut world, "wounded", spawn, 1);
    world.entity_mut(wounded).unwrap().stats_mut().unwrap().hp = 5;
    world.move_to_area(wounded, field).unwrap();

    let mut controller = AiController::new(EngineFamily::Odyssey, 41);
    for _ in 0..60 {
        controller.update(&mut world, 1.0).unwrap();
        world.update(1.0).unwrap();
        assert_eq!(world.position(wounded), Some(spawn));
    }
}

#[test]
fn healthy_loners_do_wander_off() {
    let mut world = World::new();
    let field = world.add_area("field", plate());
    let spawn = Vec3::new(2.0, -3.0, 0.0);
    let loner = creature(&mut world, "loner", spawn, 1);
    world.move_to_area(loner, field).unwrap();

    let mut controller = AiController::new(EngineFamily::Odyssey, 41);
    let mut strayed = false;
    for _ in 0..60 {
        controller.update(&mut world, 1.0).unwrap();
        world.update(1.0).unwrap();
        if world.position(loner).unwrap().distance(spawn) > 0.5 {
            strayed = true;
        }
    }
    assert!(strayed, "an unhurt idler should wander within a minute");
}
