//! Perception pulses: who notices whom.
//!
//! Sight requires range and a clear line over the area's navmesh, plus an
//! opposed spot-versus-hide roll on families that contest stealth. Hearing
//! is distance-only. Results land in the observer's [`Perception`] sets and
//! are reported as [`WorldEvent::Perception`] events, either on change
//! (edge-triggered families) or on every pulse (the rest).

use std::collections::BTreeSet;
use std::sync::Arc;

use boreal_foundation::{ObjectId, ObjectType};
use boreal_nav::NavMesh;
use boreal_world::{Entity, HookKind, Perception, World, WorldEvent};
use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::policy::PerceptionPolicy;

/// Sight rays are cast this far above each creature's ground position so
/// the walkable surface underfoot never occludes a level gaze.
const EYE_HEIGHT: f32 = 1.0;

/// Recomputes what `observer` sees and hears, stores the new sets on its
/// [`Perception`] component, and reports per `policy`.
pub(crate) fn pulse(
    world: &mut World,
    observer: ObjectId,
    policy: &PerceptionPolicy,
    rng: &mut ChaCha8Rng,
) {
    let Ok(entity) = world.entity(observer) else {
        return;
    };
    let Some(perception) = entity.perception() else {
        return;
    };
    let Some(position) = entity.transform().map(|transform| transform.position) else {
        return;
    };
    let sight_range = perception.sight_range;
    let hearing_range = perception.hearing_range;
    let spot = perception.spot;
    let old_seen = perception.seen.clone();
    let old_heard = perception.heard.clone();
    let area = entity.area;

    let navmesh: Option<Arc<NavMesh>> = area
        .and_then(|id| world.area(id))
        .map(|area| Arc::clone(area.navmesh()));
    // The area roster is the broad phase. Outside any area (sandbox worlds,
    // unit tests) everyone area-less shares one space.
    let candidates: Vec<ObjectId> = match area.and_then(|id| world.area(id)) {
        Some(area) => area.roster().to_vec(),
        None => world
            .live_entities()
            .filter(|other| other.area.is_none())
            .map(Entity::id)
            .collect(),
    };

    let mut seen = BTreeSet::new();
    let mut heard = BTreeSet::new();
    let max_range = sight_range.max(hearing_range);
    for other_id in candidates {
        if other_id == observer {
            continue;
        }
        let Ok(other) = world.entity(other_id) else {
            continue;
        };
        if other.object_type() != ObjectType::Creature {
            continue;
        }
        let Some(other_position) = other.transform().map(|transform| transform.position) else {
            continue;
        };
        let distance = position.distance(other_position);
        if distance > max_range {
            continue;
        }
        if distance <= hearing_range {
            heard.insert(other_id);
        }
        if distance <= sight_range && clear_sight(navmesh.as_deref(), position, other_position) {
            let hide = other.perception().map_or(0, |p| p.hide);
            if !policy.contested_checks || contested_spot(rng, spot, hide) {
                seen.insert(other_id);
            }
        }
    }

    let report = build_report(policy, &old_seen, &old_heard, &seen, &heard);

    if let Ok(entity) = world.entity_mut(observer) {
        if let Some(perception) = entity.perception_mut() {
            perception.seen = seen;
            perception.heard = heard;
        }
    }
    for (perceived, now_seen, now_heard) in report {
        world.push_event(WorldEvent::Perception {
            observer,
            perceived,
            seen: now_seen,
            heard: now_heard,
        });
        world.fire_hook(observer, HookKind::Perception, Some(perceived));
    }
}

/// Which `(perceived, seen, heard)` tuples this pulse reports.
fn build_report(
    policy: &PerceptionPolicy,
    old_seen: &BTreeSet<ObjectId>,
    old_heard: &BTreeSet<ObjectId>,
    seen: &BTreeSet<ObjectId>,
    heard: &BTreeSet<ObjectId>,
) -> Vec<(ObjectId, bool, bool)> {
    let mut involved: BTreeSet<ObjectId> = seen.union(heard).copied().collect();
    if policy.edge_triggered {
        involved.extend(old_seen.iter().copied());
        involved.extend(old_heard.iter().copied());
    }
    let mut report = Vec::new();
    for id in involved {
        let now_seen = seen.contains(&id);
        let now_heard = heard.contains(&id);
        if policy.edge_triggered
            && now_seen == old_seen.contains(&id)
            && now_heard == old_heard.contains(&id)
        {
            continue;
        }
        report.push((id, now_seen, now_heard));
    }
    report
}

fn clear_sight(navmesh: Option<&NavMesh>, from: Vec3, to: Vec3) -> bool {
    let Some(mesh) = navmesh else {
        return true;
    };
    let eye = Vec3::new(0.0, 0.0, EYE_HEIGHT);
    mesh.has_line_of_sight(from + eye, to + eye)
}

/// Opposed d20 spot-versus-hide roll. The observer wins ties.
fn contested_spot(rng: &mut ChaCha8Rng, spot: i32, hide: i32) -> bool {
    let observer = rng.gen_range(1..=20) + spot;
    let hider = rng.gen_range(1..=20) + hide;
    observer >= hider
}

/// Whether `perception` currently notices a live hostile of `of`.
pub(crate) fn notices_living_hostile(
    world: &World,
    of: ObjectId,
    perception: &Perception,
) -> bool {
    perception
        .seen
        .iter()
        .chain(perception.heard.iter())
        .any(|&other| world.is_alive(other) && world.are_hostile(of, other))
}
