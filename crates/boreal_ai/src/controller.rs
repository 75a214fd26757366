//! The per-tick AI driver.

use std::collections::BTreeMap;

use boreal_foundation::{EngineFamily, Error, ObjectId, ObjectType, Result};
use boreal_world::{EntityFlags, HookKind, Stats, World};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::combat;
use crate::idle::{self, Patrol};
use crate::perception;
use crate::policy::FamilyPolicy;

/// Seconds between heartbeat script hooks.
pub const HEARTBEAT_INTERVAL: f32 = 6.0;

/// Seconds between perception pulses.
pub const PERCEPTION_INTERVAL: f32 = 0.5;

/// Countdown timers and idle bookkeeping for one creature.
///
/// Lives only in the controller; it is rebuilt from scratch after a module
/// load or a save restore, so nothing here is ever persisted.
#[derive(Debug)]
pub(crate) struct CreatureState {
    pub(crate) heartbeat: f32,
    pub(crate) perception: f32,
    pub(crate) spawn_position: Vec3,
    pub(crate) wander: f32,
    pub(crate) look: f32,
    pub(crate) idle_anim: f32,
    pub(crate) patrol: Patrol,
}

impl CreatureState {
    pub(crate) fn new(spawn_position: Vec3, policy: &FamilyPolicy) -> Self {
        Self {
            heartbeat: HEARTBEAT_INTERVAL,
            perception: PERCEPTION_INTERVAL,
            spawn_position,
            wander: policy.idle.wander_interval,
            look: policy.idle.look_interval,
            idle_anim: policy.idle.idle_anim_interval,
            patrol: Patrol::Unsearched,
        }
    }
}

/// Drives every non-player creature in a [`World`].
///
/// The controller never mutates entities directly; each decision becomes a
/// queued [`boreal_world::Action`], a fired script hook, or a perception
/// update, all of which the world executes on its own tick. Randomness comes
/// from a single seeded ChaCha stream, so two controllers built with the same
/// family and seed drive identical worlds identically.
pub struct AiController {
    policy: FamilyPolicy,
    rng: ChaCha8Rng,
    states: BTreeMap<ObjectId, CreatureState>,
}

impl AiController {
    /// Creates a controller for `family` with a deterministic seed.
    #[must_use]
    pub fn new(family: EngineFamily, seed: u64) -> Self {
        Self::with_rng(family, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a controller from an explicit generator state.
    #[must_use]
    pub fn with_rng(family: EngineFamily, rng: ChaCha8Rng) -> Self {
        Self {
            policy: FamilyPolicy::for_family(family),
            rng,
            states: BTreeMap::new(),
        }
    }

    /// The family this controller was built for.
    #[must_use]
    pub fn family(&self) -> EngineFamily {
        self.policy.family
    }

    /// The behavior policy in effect.
    #[must_use]
    pub fn policy(&self) -> &FamilyPolicy {
        &self.policy
    }

    /// How many creatures the controller is currently tracking.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.states.len()
    }

    /// Runs one AI tick over every live creature.
    ///
    /// Creatures are visited in id order. A creature is skipped while it is
    /// invalid, dead, player-controlled, in a conversation, or already has an
    /// action queued; skipped creatures keep their timers frozen. State for
    /// creatures that no longer exist is dropped at the end of the tick.
    ///
    /// # Errors
    ///
    /// Returns [`boreal_foundation::ErrorKind::Argument`] when `dt` is
    /// negative or non-finite.
    pub fn update(&mut self, world: &mut World, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::argument(format!(
                "tick delta must be finite and non-negative, got {dt}"
            )));
        }
        let creatures: Vec<ObjectId> = world
            .live_entities()
            .filter(|entity| entity.object_type() == ObjectType::Creature)
            .map(boreal_world::Entity::id)
            .collect();
        for id in creatures {
            self.update_creature(world, id, dt);
        }
        self.states.retain(|id, _| world.is_valid(*id));
        Ok(())
    }

    fn update_creature(&mut self, world: &mut World, id: ObjectId, dt: f32) {
        let Ok(entity) = world.entity(id) else {
            return;
        };
        if entity.flags.contains(EntityFlags::PLAYER)
            || entity.flags.contains(EntityFlags::IN_CONVERSATION)
        {
            return;
        }
        if entity.stats().is_some_and(Stats::is_dead) {
            return;
        }
        let Some(position) = entity.transform().map(|transform| transform.position) else {
            return;
        };
        let busy = entity.action_queue().is_none_or(|queue| !queue.is_idle());

        let Self {
            policy,
            rng,
            states,
        } = self;
        let state = states
            .entry(id)
            .or_insert_with(|| CreatureState::new(position, policy));
        if busy {
            return;
        }

        state.heartbeat -= dt;
        state.perception -= dt;
        if state.heartbeat <= 0.0 {
            state.heartbeat += HEARTBEAT_INTERVAL;
            world.fire_hook(id, HookKind::Heartbeat, None);
        }
        if state.perception <= 0.0 {
            state.perception += PERCEPTION_INTERVAL;
            perception::pulse(world, id, &policy.perception, rng);
        }

        if combat::in_combat(world, id) {
            combat::engage(world, id, position);
        } else {
            idle::tick(world, id, state, policy, rng, dt);
        }
    }

    /// Drops all state for a destroyed creature.
    ///
    /// [`AiController::update`] also prunes lazily, so calling this is an
    /// optimization rather than a requirement.
    pub fn on_entity_destroyed(&mut self, id: ObjectId) {
        self.states.remove(&id);
    }

    /// Forgets every tracked creature, e.g. when a module unloads.
    pub fn reset(&mut self) {
        self.states.clear();
    }
}

impl std::fmt::Debug for AiController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiController")
            .field("family", &self.policy.family)
            .field("tracked", &self.states.len())
            .finish_non_exhaustive()
    }
}
