//! Simulation object identity.
//!
//! Every simulation object carries an [`ObjectId`] that is unique for the
//! lifetime of its world and is never reused, even after the object is
//! destroyed. Ids double as arena indices, so cross-object links are handles
//! rather than references and can never dangle.

use std::fmt;

/// Unique identifier of a simulation object.
///
/// Ids index into the owning world's entity arena. Slots are retired on
/// destruction instead of being recycled, so an id observed once refers to
/// the same object forever.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Sentinel for "no object". Never allocated.
    pub const INVALID: Self = Self(u32::MAX);

    /// Creates an id from a raw arena index.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns true if this is the invalid sentinel.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "ObjectId(invalid)")
        } else {
            write!(f, "ObjectId({})", self.0)
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "Object(invalid)")
        } else {
            write!(f, "Object({})", self.0)
        }
    }
}

/// The fixed kind of a simulation object, immutable after creation.
///
/// The kind selects the default component set attached at spawn time and the
/// specialized sections written by the save serializer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum ObjectType {
    /// A creature: player character, party member, or NPC.
    Creature = 0,
    /// A door linking walkable regions.
    Door = 1,
    /// A placeable object (container, lever, furniture).
    Placeable = 2,
    /// An inventory item.
    Item = 3,
    /// An invisible script-firing volume.
    Trigger = 4,
    /// A named navigation marker.
    Waypoint = 5,
    /// A positioned sound emitter.
    Sound = 6,
}

impl ObjectType {
    /// Decodes a persisted type tag.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Creature),
            1 => Some(Self::Door),
            2 => Some(Self::Placeable),
            3 => Some(Self::Item),
            4 => Some(Self::Trigger),
            5 => Some(Self::Waypoint),
            6 => Some(Self::Sound),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Creature => "creature",
            Self::Door => "door",
            Self::Placeable => "placeable",
            Self::Item => "item",
            Self::Trigger => "trigger",
            Self::Waypoint => "waypoint",
            Self::Sound => "sound",
        };
        f.write_str(name)
    }
}

/// Identifier of a loaded area within the current module.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AreaId(u32);

impl AreaId {
    /// Creates an area id from a raw index.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Area({})", self.0)
    }
}
