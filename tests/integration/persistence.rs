//! Saves across the whole stack
//!
//! Worlds built by the module loader and aged by the AI are captured,
//! encoded, and rebuilt outside the session, the way an embedder would
//! implement save slots and module travel.

use boreal_foundation::{EngineFamily, LocalValue, ObjectType};
use boreal_nav::SurfaceMaterial;
use boreal_save::SaveGame;
use boreal_session::{
    AreaBlueprint, Engine, FamilyProfile, GameSession, InstanceBlueprint, ModuleBlueprint,
    StaticProvider,
};
use boreal_world::World;
use glam::Vec3;

async fn running_demo(provider: StaticProvider) -> GameSession {
    let mut engine = Engine::with_provider(FamilyProfile::for_family(EngineFamily::Odyssey), provider);
    engine.initialize();
    let mut session = engine.create_game_session().unwrap();
    session.load_module("demo", None).await.unwrap();
    session
}

/// A second, unrelated module for travel tests.
fn cellar() -> ModuleBlueprint {
    let room = AreaBlueprint {
        name: "cellar".to_owned(),
        vertices: vec![
            Vec3::new(-10.0, -10.0, 0.0),
            Vec3::new(10.0, -10.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(-10.0, 10.0, 0.0),
        ],
        faces: vec![[0, 1, 2], [0, 2, 3]],
        adjacency: vec![[-1, -1, 1], [0, -1, -1]],
        materials: vec![SurfaceMaterial::Dirt; 2],
    };
    ModuleBlueprint {
        name: "cellar".to_owned(),
        areas: vec![room],
        entry_area: 0,
        entry_position: Vec3::ZERO,
        entry_facing: 0.0,
        instances: vec![InstanceBlueprint::new(
            ObjectType::Creature,
            "rat",
            0,
            Vec3::new(3.0, 0.0, 0.0),
        )],
        hostility: Vec::new(),
    }
}

// =============================================================================
// Whole-world round trips
// =============================================================================

#[tokio::test]
async fn a_mid_story_save_restores_the_whole_world() {
    let mut session = running_demo(StaticProvider::demo()).await;
    for _ in 0..60 {
        session.update(0.25).unwrap();
    }
    session
        .world_mut()
        .set_global("alarm_raised", LocalValue::Bool(true));

    let bytes = SaveGame::capture(session.world()).encode().unwrap();
    let loaded = SaveGame::decode(&bytes).unwrap();
    assert_eq!(loaded.records_skipped, 0);

    let mut restored = World::new();
    restored.add_area("courtyard", session.navmesh().unwrap());
    let report = loaded.save.restore(&mut restored);
    assert_eq!(report.records_failed, 0);
    assert_eq!(report.dangling_cleared, 0);

    let original = session.world();
    assert!((restored.time() - original.time()).abs() < f64::EPSILON);
    assert_eq!(restored.global("alarm_raised"), LocalValue::Bool(true));
    assert_eq!(restored.party().members(), original.party().members());
    assert_eq!(restored.party().leader(), original.party().leader());
    assert_eq!(restored.allocated(), original.allocated());
    assert_eq!(restored.live_count(), original.live_count());

    // Persisted sections match entity by entity. Factions, perception, and
    // trigger volumes are module data and deliberately absent here.
    for entity in original.live_entities() {
        let copy = restored.entity(entity.id()).unwrap();
        assert_eq!(entity.tag, copy.tag);
        assert_eq!(entity.object_type(), copy.object_type());
        assert_eq!(entity.area, copy.area);
        assert_eq!(entity.transform(), copy.transform());
        assert_eq!(entity.stats(), copy.stats());
        assert_eq!(entity.inventory(), copy.inventory());
        assert_eq!(entity.script_hooks(), copy.script_hooks());
        assert_eq!(entity.door(), copy.door());
    }
}

#[tokio::test]
async fn module_travel_keeps_the_old_world_reachable() {
    let mut provider = StaticProvider::demo();
    provider.insert_module(cellar());
    let mut session = running_demo(provider).await;

    for _ in 0..20 {
        session.update(0.25).unwrap();
    }
    session
        .world_mut()
        .set_global("alarm_raised", LocalValue::Bool(true));
    let player = session.player().unwrap();
    let courtyard_mesh = session.navmesh().unwrap();
    let bytes = SaveGame::capture(session.world()).encode().unwrap();

    // Travel. The session's old world is gone wholesale.
    session.load_module("cellar", None).await.unwrap();
    assert_eq!(session.current_module(), Some("cellar"));
    assert_eq!(session.world().live_count(), 2);
    assert_eq!(session.world().find_by_tag("guard"), None);
    assert_eq!(session.world().global("alarm_raised"), LocalValue::Null);

    // The save still rebuilds the courtyard as it was left.
    let mut courtyard = World::new();
    courtyard.add_area("courtyard", courtyard_mesh);
    let report = SaveGame::decode(&bytes)
        .unwrap()
        .save
        .restore(&mut courtyard);
    assert_eq!(report.records_failed, 0);
    assert_eq!(courtyard.live_count(), 8);
    assert!((courtyard.time() - 5.0).abs() < 1e-9);
    assert_eq!(courtyard.global("alarm_raised"), LocalValue::Bool(true));
    assert_eq!(courtyard.party().members(), &[player]);
    assert!(courtyard.find_by_tag("guard").is_some());
    assert!(courtyard.find_by_tag("thug").is_some());
}
