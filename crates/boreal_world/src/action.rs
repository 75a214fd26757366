//! Action queue execution.
//!
//! Every behaving entity carries a FIFO of [`Action`]s; the world executes
//! the head action once per tick. Cross-entity effects (damage) never touch
//! the other entity directly; they are queued as commands the world applies
//! after the entity loop, so execution order cannot depend on arena layout.

use std::collections::VecDeque;

use boreal_foundation::{Error, ObjectId, Result};
use boreal_nav::NavMesh;
use glam::Vec3;

use crate::entity::Entity;
use crate::world::{Command, World};

/// Walking speed in world units per second.
pub const WALK_SPEED: f32 = 2.0;

/// Running speed in world units per second.
pub const RUN_SPEED: f32 = 4.0;

/// Maximum distance for a melee swing.
pub const MELEE_RANGE: f32 = 2.0;

/// Seconds between melee swings.
pub const ATTACK_INTERVAL: f32 = 3.0;

/// Arrival slop for movement actions.
const ARRIVE_EPSILON: f32 = 0.1;

/// A unit of queued behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Run or walk to a fixed point.
    MoveToPoint {
        /// Where to go.
        destination: Vec3,
        /// Run rather than walk.
        run: bool,
    },
    /// Move until within `range` of a target object. Completes immediately
    /// when the target no longer exists.
    MoveToObject {
        /// The object to approach.
        target: ObjectId,
        /// Run rather than walk.
        run: bool,
        /// Stop once this close.
        range: f32,
    },
    /// Close to melee range and swing until the target dies or the queue is
    /// cleared.
    Attack {
        /// The object to attack.
        target: ObjectId,
    },
    /// Stand still for a duration.
    Wait {
        /// Seconds to wait.
        seconds: f32,
    },
    /// Snap to a heading.
    TurnTo {
        /// Heading in radians around Z.
        facing: f32,
    },
    /// Play a named animation for a duration. The runtime only times it; the
    /// render layer owns playback.
    PlayAnimation {
        /// Animation name.
        animation: String,
        /// Seconds until the action completes.
        duration: f32,
    },
    /// Walk to a point chosen by the idle AI.
    RandomWalk {
        /// Where to amble.
        destination: Vec3,
    },
}

/// The head action plus its countdown (wait remaining, swing cooldown,
/// animation remaining).
#[derive(Debug, Clone, PartialEq)]
struct InFlight {
    action: Action,
    timer: f32,
}

enum StepOutcome {
    Continue,
    Complete,
}

/// FIFO behavior queue. At most one action executes per tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionQueue {
    pending: VecDeque<Action>,
    current: Option<InFlight>,
}

impl ActionQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action behind everything already queued.
    pub fn add(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    /// Drops the executing action and everything pending.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
    }

    /// Whether nothing is executing or pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    /// Queued action count, including the one executing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.current.is_some())
    }

    /// Whether the queue is empty. Alias of [`ActionQueue::is_idle`] for the
    /// collection-like API shape.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_idle()
    }

    /// The action currently executing, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Action> {
        self.current.as_ref().map(|flight| &flight.action)
    }

    /// Iterates the executing action, if any, followed by everything pending.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.current
            .as_ref()
            .map(|flight| &flight.action)
            .into_iter()
            .chain(self.pending.iter())
    }

    /// Executes one step of the head action.
    ///
    /// `entity` is the queue's owner, detached from the arena for the
    /// duration of its update; `world` serves read-only lookups of everyone
    /// else. A failing action is dropped so it cannot fail every tick.
    pub(crate) fn advance(
        &mut self,
        entity: &mut Entity,
        world: &World,
        commands: &mut Vec<Command>,
        navmesh: Option<&NavMesh>,
        dt: f32,
    ) -> Result<()> {
        if self.current.is_none() {
            let Some(action) = self.pending.pop_front() else {
                return Ok(());
            };
            let timer = initial_timer(&action);
            self.current = Some(InFlight { action, timer });
        }
        let Some(mut flight) = self.current.take() else {
            return Ok(());
        };
        match step(&mut flight, entity, world, commands, navmesh, dt)? {
            StepOutcome::Continue => {
                self.current = Some(flight);
            }
            StepOutcome::Complete => {}
        }
        Ok(())
    }
}

fn initial_timer(action: &Action) -> f32 {
    match action {
        Action::Wait { seconds } => *seconds,
        Action::PlayAnimation { duration, .. } => *duration,
        // First swing lands as soon as the attacker is in range.
        _ => 0.0,
    }
}

fn step(
    flight: &mut InFlight,
    entity: &mut Entity,
    world: &World,
    commands: &mut Vec<Command>,
    navmesh: Option<&NavMesh>,
    dt: f32,
) -> Result<StepOutcome> {
    // Every binding below is `Copy`, so the match releases its borrow of the
    // action before the arms mutate `flight`.
    match flight.action {
        Action::MoveToPoint { destination, run } => {
            let speed = if run { RUN_SPEED } else { WALK_SPEED };
            move_towards(entity, destination, speed, navmesh, dt)
        }
        Action::RandomWalk { destination } => {
            move_towards(entity, destination, WALK_SPEED, navmesh, dt)
        }
        Action::MoveToObject { target, run, range } => {
            if target == entity.id() || !world.is_valid(target) {
                return Ok(StepOutcome::Complete);
            }
            let Some(goal) = world.position(target) else {
                return Ok(StepOutcome::Complete);
            };
            let Some(position) = entity.transform().map(|t| t.position) else {
                return Ok(StepOutcome::Complete);
            };
            if position.distance(goal) <= range.max(ARRIVE_EPSILON) {
                return Ok(StepOutcome::Complete);
            }
            let speed = if run { RUN_SPEED } else { WALK_SPEED };
            // Range arrival is judged above, re-checked next tick.
            let _ = move_towards(entity, goal, speed, navmesh, dt)?;
            Ok(StepOutcome::Continue)
        }
        Action::Attack { target } => step_attack(flight, entity, world, commands, navmesh, target, dt),
        Action::Wait { .. } => {
            flight.timer -= dt;
            if flight.timer <= 0.0 {
                Ok(StepOutcome::Complete)
            } else {
                Ok(StepOutcome::Continue)
            }
        }
        Action::TurnTo { facing } => {
            if !facing.is_finite() {
                return Err(Error::argument("turn facing must be finite"));
            }
            if let Some(transform) = entity.transform_mut() {
                transform.facing = facing;
            }
            Ok(StepOutcome::Complete)
        }
        Action::PlayAnimation { .. } => {
            flight.timer -= dt;
            if flight.timer <= 0.0 {
                Ok(StepOutcome::Complete)
            } else {
                Ok(StepOutcome::Continue)
            }
        }
    }
}

fn step_attack(
    flight: &mut InFlight,
    entity: &mut Entity,
    world: &World,
    commands: &mut Vec<Command>,
    navmesh: Option<&NavMesh>,
    target: ObjectId,
    dt: f32,
) -> Result<StepOutcome> {
    if target == entity.id() || !world.is_valid(target) || !world.is_alive(target) {
        return Ok(StepOutcome::Complete);
    }
    let Some(damage) = entity.stats().map(|stats| stats.damage) else {
        return Ok(StepOutcome::Complete);
    };
    let Some(goal) = world.position(target) else {
        return Ok(StepOutcome::Complete);
    };
    let Some(position) = entity.transform().map(|t| t.position) else {
        return Ok(StepOutcome::Complete);
    };

    if position.distance(goal) > MELEE_RANGE {
        move_towards(entity, goal, RUN_SPEED, navmesh, dt)?;
        return Ok(StepOutcome::Continue);
    }

    if let Some(transform) = entity.transform_mut() {
        let flat = goal - position;
        if flat.truncate().length_squared() > f32::EPSILON {
            transform.facing = flat.y.atan2(flat.x);
        }
    }
    flight.timer -= dt;
    if flight.timer <= 0.0 {
        commands.push(Command::Damage {
            target,
            source: entity.id(),
            amount: damage,
        });
        flight.timer = ATTACK_INTERVAL;
    }
    Ok(StepOutcome::Continue)
}

/// Moves the entity toward `goal`, turning to face travel and gluing height
/// to the navmesh when one is present. Completes on arrival.
fn move_towards(
    entity: &mut Entity,
    goal: Vec3,
    speed: f32,
    navmesh: Option<&NavMesh>,
    dt: f32,
) -> Result<StepOutcome> {
    if !goal.is_finite() {
        return Err(Error::argument("movement destination must be finite"));
    }
    let Some(transform) = entity.transform_mut() else {
        return Ok(StepOutcome::Complete);
    };
    let position = transform.position;
    let delta = goal - position;
    let distance = delta.length();
    if distance <= ARRIVE_EPSILON {
        transform.position = goal;
        return Ok(StepOutcome::Complete);
    }

    let flat = delta.truncate();
    if flat.length_squared() > f32::EPSILON {
        transform.facing = flat.y.atan2(flat.x);
    }

    let step = speed * dt;
    let arrived = step >= distance;
    let mut next = if arrived {
        goal
    } else {
        position + delta / distance * step
    };
    if let Some(mesh) = navmesh {
        if let Some(point) = mesh.project_to_surface(next) {
            next = point.position;
        }
    }
    transform.position = next;
    Ok(if arrived {
        StepOutcome::Complete
    } else {
        StepOutcome::Continue
    })
}
