//! Degraded loads
//!
//! Saves that reference things the receiving world does not have: areas that
//! never loaded, entities that died before capture. Loads degrade entity by
//! entity and reference by reference, never wholesale.

use std::sync::Arc;

use boreal_foundation::{LocalValue, ObjectType};
use boreal_nav::{NavMesh, SurfaceMaterial};
use boreal_save::SaveGame;
use boreal_world::World;
use glam::Vec3;

fn single_quad() -> Arc<NavMesh> {
    Arc::new(
        NavMesh::new(
            vec![
                Vec3::new(-10.0, -10.0, 0.0),
                Vec3::new(10.0, -10.0, 0.0),
                Vec3::new(10.0, 10.0, 0.0),
                Vec3::new(-10.0, 10.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            vec![[-1, -1, 1], [0, -1, -1]],
            vec![SurfaceMaterial::Grass; 2],
        )
        .unwrap(),
    )
}

// =============================================================================
// Missing areas
// =============================================================================

#[test]
fn entities_from_unloaded_areas_restore_unplaced() {
    let mut source = World::new();
    let grove = source.add_area("grove", single_quad());
    let hermit = source.spawn(ObjectType::Creature, "hermit");
    source
        .entity_mut(hermit)
        .unwrap()
        .transform_mut()
        .unwrap()
        .position = Vec3::new(1.0, 2.0, 0.0);
    source.move_to_area(hermit, grove).unwrap();

    let bytes = SaveGame::capture(&source).encode().unwrap();
    let mut target = World::new();
    let report = SaveGame::decode(&bytes).unwrap().save.restore(&mut target);

    // The record itself is fine; only the placement is dropped.
    assert_eq!(report.records_failed, 0);
    assert_eq!(report.entities_restored, 1);
    let stranded = target.entity(hermit).unwrap();
    assert_eq!(stranded.area, None);
    assert_eq!(
        stranded.transform().unwrap().position,
        Vec3::new(1.0, 2.0, 0.0)
    );
    assert!(target.is_alive(hermit));
}

// =============================================================================
// Dangling references
// =============================================================================

#[test]
fn references_to_the_fallen_heal_on_load() {
    let mut source = World::new();
    let keeper = source.spawn(ObjectType::Creature, "keeper");
    let trophy = source.spawn(ObjectType::Item, "trophy");
    let relic = source.spawn(ObjectType::Item, "relic");
    let rival = source.spawn(ObjectType::Creature, "rival");
    {
        let entity = source.entity_mut(keeper).unwrap();
        let inventory = entity.inventory_mut().unwrap();
        inventory.add(trophy);
        inventory.add(relic);
        let hooks = entity.script_hooks_mut().unwrap();
        hooks.set_local("rival", LocalValue::Object(rival));
        hooks.set_local("kills", LocalValue::Int(7));
    }
    // Both die before the capture. Their shells ride along in the save, but
    // nothing may point at them afterwards.
    source.destroy(relic).unwrap();
    source.destroy(rival).unwrap();

    let bytes = SaveGame::capture(&source).encode().unwrap();
    let mut target = World::new();
    let report = SaveGame::decode(&bytes).unwrap().save.restore(&mut target);

    assert_eq!(report.records_failed, 0);
    assert_eq!(report.dangling_cleared, 2);

    let healed = target.entity(keeper).unwrap();
    assert_eq!(healed.inventory().unwrap().items, vec![trophy]);
    let hooks = healed.script_hooks().unwrap();
    assert_eq!(hooks.local("rival"), LocalValue::Null);
    assert_eq!(hooks.local("kills"), LocalValue::Int(7));

    // The shells came back retired, so their ids stay burned.
    assert!(!target.is_valid(relic));
    assert!(!target.is_valid(rival));
}

// =============================================================================
// Fixture state
// =============================================================================

#[test]
fn doors_and_containers_come_back_in_place() {
    let mesh = single_quad();
    let mut source = World::new();
    let cellar = source.add_area("cellar", Arc::clone(&mesh));

    let gate = source.spawn(ObjectType::Door, "cellar_gate");
    {
        let door = source.entity_mut(gate).unwrap().door_mut().unwrap();
        door.locked = true;
        door.key_tag = "cellar_key".to_owned();
    }
    let footlocker = source.spawn(ObjectType::Placeable, "footlocker");
    let coin = source.spawn(ObjectType::Item, "coin");
    source
        .entity_mut(footlocker)
        .unwrap()
        .inventory_mut()
        .unwrap()
        .add(coin);
    source.move_to_area(gate, cellar).unwrap();
    source.move_to_area(footlocker, cellar).unwrap();

    let bytes = SaveGame::capture(&source).encode().unwrap();
    let mut target = World::new();
    let restored_cellar = target.add_area("cellar", mesh);
    let report = SaveGame::decode(&bytes).unwrap().save.restore(&mut target);
    assert_eq!(report.records_failed, 0);
    assert_eq!(report.dangling_cleared, 0);

    assert_eq!(
        target.area(restored_cellar).unwrap().roster(),
        &[gate, footlocker]
    );
    let door = target.entity(gate).unwrap().door().unwrap();
    assert!(door.locked);
    assert!(!door.open);
    assert_eq!(door.key_tag, "cellar_key");
    assert_eq!(
        target.entity(footlocker).unwrap().inventory().unwrap().items,
        vec![coin]
    );
}
