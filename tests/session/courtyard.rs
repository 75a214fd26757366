//! The demo courtyard
//!
//! One stone yard, a patrolling guard, a thug everyone hates, a locked gate,
//! and an ambush trigger the thug is standing in when the lights come on.

use boreal_foundation::EngineFamily;
use boreal_nav::SurfaceMaterial;
use boreal_session::{Engine, FamilyProfile, SessionState, StaticProvider};
use boreal_world::{HookKind, WorldEvent};
use glam::Vec3;

async fn running_demo(family: EngineFamily) -> boreal_session::GameSession {
    let mut engine = Engine::with_provider(FamilyProfile::for_family(family), StaticProvider::demo());
    engine.initialize();
    let mut session = engine.create_game_session().unwrap();
    session.load_module("demo", None).await.unwrap();
    session
}

// =============================================================================
// Scripted geometry
// =============================================================================

#[tokio::test]
async fn the_ambush_springs_on_the_first_tick() {
    let mut session = running_demo(EngineFamily::Odyssey).await;
    let thug = session.world().find_by_tag("thug").unwrap();
    let zone = session.world().find_by_tag("ambush_zone").unwrap();
    session.world_mut().drain_events();

    // The thug spawns already standing in the trigger volume.
    session.update(0.25).unwrap();
    assert_eq!(
        session.world_mut().drain_events(),
        vec![
            WorldEvent::TriggerEntered {
                trigger: zone,
                object: thug,
            },
            WorldEvent::Hook {
                owner: zone,
                kind: HookKind::Enter,
                script: "demo_ambush_enter".into(),
                other: Some(thug),
            },
        ]
    );
}

#[tokio::test]
async fn the_entry_walkmesh_answers_queries() {
    let session = running_demo(EngineFamily::Aurora).await;

    assert!(session.has_module("demo"));
    assert!(!session.has_module("tar_m02aa"));

    let mesh = session.navmesh().unwrap();
    let footing = mesh
        .project_to_surface(Vec3::new(0.0, -20.0, 5.0))
        .expect("the entry point must sit on walkable ground");
    assert!(footing.position.z.abs() < 1e-4);
    assert_eq!(footing.material, SurfaceMaterial::Stone);

    let entry = session.current_area().unwrap();
    let roster = session.world().area(entry).unwrap().roster();
    assert!(roster.contains(&session.player().unwrap()));
}

// =============================================================================
// The feud
// =============================================================================

#[tokio::test]
async fn the_courtyard_feud_runs_to_its_end() {
    let mut session = running_demo(EngineFamily::Odyssey).await;
    let player = session.player().unwrap();
    let guard = session.world().find_by_tag("guard").unwrap();
    let thug = session.world().find_by_tag("thug").unwrap();
    session.world_mut().drain_events();

    let mut deaths = Vec::new();
    for _ in 0..320 {
        session.update(0.25).unwrap();
        deaths.extend(
            session
                .world_mut()
                .drain_events()
                .into_iter()
                .filter(|event| matches!(event, WorldEvent::Death { .. })),
        );
    }

    // The thug picks off the nearer target first, then the guard closes in
    // from its patrol and loses the long trade. Nobody is left to fight.
    assert_eq!(
        deaths,
        vec![
            WorldEvent::Death {
                victim: player,
                killer: thug,
            },
            WorldEvent::Death {
                victim: guard,
                killer: thug,
            },
        ]
    );
    assert!(session.world().is_alive(thug));
    assert_eq!(session.state(), SessionState::ModuleRunning);
}

#[tokio::test]
async fn reloading_returns_a_pristine_courtyard() {
    let mut session = running_demo(EngineFamily::Odyssey).await;
    let player = session.player().unwrap();
    for _ in 0..40 {
        session.update(0.25).unwrap();
    }
    let thug = session.world().find_by_tag("thug").unwrap();
    session.world_mut().apply_damage(thug, player, 3);
    assert_eq!(session.world().entity(thug).unwrap().stats().unwrap().hp, 5);
    assert!(session.world().time() > 9.0);

    session.load_module("demo", None).await.unwrap();
    assert_eq!(session.state(), SessionState::ModuleLoaded);
    assert_eq!(session.world().time(), 0.0);
    assert_eq!(session.world().live_count(), 8);

    let thug = session.world().find_by_tag("thug").unwrap();
    assert_eq!(session.world().entity(thug).unwrap().stats().unwrap().hp, 8);
    let guard = session.world().find_by_tag("guard").unwrap();
    assert_eq!(
        session.world().position(guard),
        Some(Vec3::new(-10.0, -10.0, 0.0))
    );
}
