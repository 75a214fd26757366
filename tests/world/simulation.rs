//! Whole-tick simulation behavior
//!
//! Damage and death, plot armor, regeneration, queued movement, melee
//! swings, and trigger sweeps, all driven through `World::update`.

use std::sync::Arc;

use boreal_foundation::ObjectType;
use boreal_nav::{NavMesh, SurfaceMaterial};
use boreal_world::{Action, EntityFlags, HookKind, World, WorldEvent};
use glam::Vec3;

/// A 200x200 grass plate shared by the movement scenarios.
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
            vec![SurfaceMaterial::Grass; 2],
        )
        .unwrap(),
    )
}

// =============================================================================
// Damage and death
// =============================================================================

#[test]
fn lethal_damage_kills_clears_the_queue_and_names_the_killer() {
    let mut world = World::new();
    let victim = world.spawn(ObjectType::Creature, "victim");
    let killer = world.spawn(ObjectType::Creature, "killer");
    world
        .entity_mut(victim)
        .unwrap()
        .action_queue_mut()
        .unwrap()
        .add(Action::Wait { seconds: 30.0 });

    world.apply_damage(victim, killer, 99);

    assert!(!world.is_alive(victim));
    assert!(world.is_valid(victim), "corpses persist");
    assert!(
        world
            .entity(victim)
            .unwrap()
            .action_queue()
            .unwrap()
            .is_empty()
    );
    let events = world.drain_events();
    assert!(events.contains(&WorldEvent::Damaged {
        target: victim,
        source: killer,
        amount: 99,
    }));
    assert!(events.contains(&WorldEvent::Death { victim, killer }));

    // The dead shrug off further blows.
    world.apply_damage(victim, killer, 5);
    assert!(world.drain_events().is_empty());
}

#[test]
fn plot_armor_stops_at_one_hit_point() {
    let mut world = World::new();
    let hero = world.spawn(ObjectType::Creature, "hero");
    let wolf = world.spawn(ObjectType::Creature, "wolf");
    world.entity_mut(hero).unwrap().flags |= EntityFlags::PLOT;

    world.apply_damage(hero, wolf, 50);
    assert_eq!(world.entity(hero).unwrap().stats().unwrap().hp, 1);
    let events = world.drain_events();
    assert!(events.contains(&WorldEvent::Damaged {
        target: hero,
        source: wolf,
        amount: 9,
    }));
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, WorldEvent::Death { .. }))
    );

    // Repeated blows cannot finish the job.
    world.apply_damage(hero, wolf, 50);
    assert_eq!(world.entity(hero).unwrap().stats().unwrap().hp, 1);
    assert!(world.is_alive(hero));
}

#[test]
fn damage_and_death_hooks_fire_in_order_with_the_attacker() {
    let mut world = World::new();
    let victim = world.spawn(ObjectType::Creature, "victim");
    let killer = world.spawn(ObjectType::Creature, "killer");
    {
        let hooks = world
            .entity_mut(victim)
            .unwrap()
            .script_hooks_mut()
            .unwrap();
        hooks.bind(HookKind::Damaged, "on_hurt");
        hooks.bind(HookKind::Death, "on_die");
    }

    world.apply_damage(victim, killer, 10);

    assert_eq!(
        world.drain_events(),
        vec![
            WorldEvent::Damaged {
                target: victim,
                source: killer,
                amount: 10,
            },
            WorldEvent::Hook {
                owner: victim,
                kind: HookKind::Damaged,
                script: "on_hurt".into(),
                other: Some(killer),
            },
            WorldEvent::Death {
                victim,
                killer,
            },
            WorldEvent::Hook {
                owner: victim,
                kind: HookKind::Death,
                script: "on_die".into(),
                other: Some(killer),
            },
        ]
    );
}

// =============================================================================
// Regeneration
// =============================================================================

#[test]
fn regeneration_carries_fractions_across_ticks() {
    let mut world = World::new();
    let troll = world.spawn(ObjectType::Creature, "troll");
    {
        let stats = world.entity_mut(troll).unwrap().stats_mut().unwrap();
        stats.hp = 5;
        stats.max_hp = 10;
        stats.hp_regen = 0.5;
    }

    for _ in 0..3 {
        world.update(1.0).unwrap();
    }
    assert_eq!(world.entity(troll).unwrap().stats().unwrap().hp, 6);

    world.update(1.0).unwrap();
    assert_eq!(world.entity(troll).unwrap().stats().unwrap().hp, 7);
}

#[test]
fn the_dead_do_not_regenerate() {
    let mut world = World::new();
    let troll = world.spawn(ObjectType::Creature, "troll");
    {
        let stats = world.entity_mut(troll).unwrap().stats_mut().unwrap();
        stats.hp = 0;
        stats.hp_regen = 5.0;
    }
    world.update(10.0).unwrap();
    assert_eq!(world.entity(troll).unwrap().stats().unwrap().hp, 0);
}

// =============================================================================
// Queued movement
// =============================================================================

#[test]
fn walk_orders_arrive_and_finish() {
    let mut world = World::new();
    let field = world.add_area("field", plate());
    let hero = world.spawn(ObjectType::Creature, "hero");
    world.move_to_area(hero, field).unwrap();
    world
        .entity_mut(hero)
        .unwrap()
        .action_queue_mut()
        .unwrap()
        .add(Action::MoveToPoint {
            destination: Vec3::new(6.0, 0.0, 0.0),
            run: false,
        });

    // Walking speed is two units per second.
    for _ in 0..40 {
        world.update(0.1).unwrap();
    }
    let position = world.position(hero).unwrap();
    assert!(position.distance(Vec3::new(6.0, 0.0, 0.0)) < 0.2);
    assert!(
        world
            .entity(hero)
            .unwrap()
            .action_queue()
            .unwrap()
            .is_empty()
    );
}

#[test]
fn melee_swings_are_deferred_into_damage() {
    let mut world = World::new();
    let duelist = world.spawn(ObjectType::Creature, "duelist");
    let rival = world.spawn(ObjectType::Creature, "rival");
    {
        let entity = world.entity_mut(duelist).unwrap();
        entity.stats_mut().unwrap().damage = 10;
        entity.transform_mut().unwrap().position = Vec3::new(1.0, 0.0, 0.0);
        entity
            .action_queue_mut()
            .unwrap()
            .add(Action::Attack { target: rival });
    }

    // In range, so the first swing lands on the first tick.
    world.update(0.1).unwrap();
    assert!(!world.is_alive(rival));
    let events = world.drain_events();
    assert!(events.contains(&WorldEvent::Death {
        victim: rival,
        killer: duelist,
    }));

    // The attack notices the kill and retires.
    world.update(0.1).unwrap();
    assert!(
        world
            .entity(duelist)
            .unwrap()
            .action_queue()
            .unwrap()
            .is_empty()
    );
}

// =============================================================================
// Trigger volumes
// =============================================================================

#[test]
fn marching_through_a_trigger_fires_one_enter_and_one_exit() {
    let mut world = World::new();
    let field = world.add_area("field", plate());

    let zone = world.spawn(ObjectType::Trigger, "alarm_zone");
    {
        let entity = world.entity_mut(zone).unwrap();
        entity.trigger_mut().unwrap().polygon = vec![
            Vec3::new(2.1, -2.0, 0.0),
            Vec3::new(5.9, -2.0, 0.0),
            Vec3::new(5.9, 2.0, 0.0),
            Vec3::new(2.1, 2.0, 0.0),
        ];
        entity
            .script_hooks_mut()
            .unwrap()
            .bind(HookKind::Enter, "on_alarm");
    }
    world.move_to_area(zone, field).unwrap();

    let scout = world.spawn(ObjectType::Creature, "scout");
    world.move_to_area(scout, field).unwrap();
    world.update(0.1).unwrap();
    world.drain_events();

    world
        .entity_mut(scout)
        .unwrap()
        .action_queue_mut()
        .unwrap()
        .add(Action::MoveToPoint {
            destination: Vec3::new(10.0, 0.0, 0.0),
            run: true,
        });

    let mut entered = 0;
    let mut exited = 0;
    let mut alarms = 0;
    for _ in 0..40 {
        world.update(0.1).unwrap();
        for event in world.drain_events() {
            match event {
                WorldEvent::TriggerEntered { trigger, object } => {
                    assert_eq!((trigger, object), (zone, scout));
                    entered += 1;
                }
                WorldEvent::TriggerExited { trigger, object } => {
                    assert_eq!((trigger, object), (zone, scout));
                    exited += 1;
                }
                WorldEvent::Hook {
                    owner,
                    kind: HookKind::Enter,
                    script,
                    other,
                } => {
                    assert_eq!(owner, zone);
                    assert_eq!(script, "on_alarm");
                    assert_eq!(other, Some(scout));
                    alarms += 1;
                }
                _ => {}
            }
        }
    }
    assert_eq!(entered, 1, "one crossing in");
    assert_eq!(exited, 1, "one crossing out");
    assert_eq!(alarms, 1);
    assert!(
        world
            .entity(zone)
            .unwrap()
            .trigger()
            .unwrap()
            .occupants
            .is_empty()
    );
}
