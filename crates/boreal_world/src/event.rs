//! Observable simulation events.
//!
//! Every event kind gets its own variant with its own payload. The legacy
//! engines multiplexed several meanings through one numeric event id, which
//! is how an area-transition handler once ran on damage events; distinct
//! variants make that class of bug unrepresentable.

use std::collections::VecDeque;

use boreal_foundation::{AreaId, ObjectId};

/// Script hook slots an entity can bind handlers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookKind {
    /// Periodic pulse, fired by the AI heartbeat timer.
    Heartbeat,
    /// Another object entered or left this creature's senses.
    Perception,
    /// This object took damage.
    Damaged,
    /// This object died.
    Death,
    /// A creature entered this trigger or area.
    Enter,
    /// A creature left this trigger or area.
    Exit,
    /// A placeable or door was used.
    Used,
    /// The object finished spawning into the area.
    Spawn,
}

/// Something observable happened in the simulation.
///
/// Events are buffered on the world and drained by the embedding layer
/// (session, scripting, UI) once per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// A bound script hook fired. The runtime does not execute scripts; it
    /// reports the binding and lets the embedder dispatch it.
    Hook {
        /// The entity whose hook fired.
        owner: ObjectId,
        /// Which hook slot fired.
        kind: HookKind,
        /// The bound script name.
        script: String,
        /// The other object involved, when the hook has one.
        other: Option<ObjectId>,
    },
    /// An observer noticed or lost track of another object.
    Perception {
        /// The perceiving creature.
        observer: ObjectId,
        /// The object that was noticed or lost.
        perceived: ObjectId,
        /// Whether the object is currently seen.
        seen: bool,
        /// Whether the object is currently heard.
        heard: bool,
    },
    /// An object took damage.
    Damaged {
        /// The damaged object.
        target: ObjectId,
        /// The damage source.
        source: ObjectId,
        /// Hit points removed.
        amount: i32,
    },
    /// An object's hit points reached zero.
    Death {
        /// The object that died.
        victim: ObjectId,
        /// The object that landed the killing blow.
        killer: ObjectId,
    },
    /// An object moved between areas.
    AreaTransition {
        /// The object that moved.
        object: ObjectId,
        /// The area it left, if any.
        from: Option<AreaId>,
        /// The area it entered.
        to: AreaId,
    },
    /// A creature crossed into a trigger volume.
    TriggerEntered {
        /// The trigger.
        trigger: ObjectId,
        /// The creature that entered.
        object: ObjectId,
    },
    /// A creature crossed out of a trigger volume.
    TriggerExited {
        /// The trigger.
        trigger: ObjectId,
        /// The creature that left.
        object: ObjectId,
    },
}

/// FIFO buffer of [`WorldEvent`]s.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<WorldEvent>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: WorldEvent) {
        self.events.push_back(event);
    }

    /// Removes and returns all buffered events in emission order.
    pub fn drain(&mut self) -> Vec<WorldEvent> {
        self.events.drain(..).collect()
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates buffered events without draining them.
    pub fn iter(&self) -> impl Iterator<Item = &WorldEvent> {
        self.events.iter()
    }
}
