//! Surface materials from the legacy walkmesh table.
//!
//! All four engine families stamp each walkmesh face with a row from the same
//! surface-material table, so the ids are shared verbatim. Walkability is a
//! fixed function of the material; gameplay never overrides it per face.

/// Surface material of a navigation mesh face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum SurfaceMaterial {
    /// Unset or unknown material. Never walkable.
    Undefined = 0,
    /// Packed dirt.
    Dirt = 1,
    /// Blocks line of sight but not movement intent; not walkable.
    Obscuring = 2,
    /// Grass.
    Grass = 3,
    /// Stone.
    Stone = 4,
    /// Wood.
    Wood = 5,
    /// Shallow water; walkable.
    Water = 6,
    /// Explicitly unwalkable.
    NonWalk = 7,
    /// Invisible collision; not walkable.
    Transparent = 8,
    /// Carpet.
    Carpet = 9,
    /// Metal plating.
    Metal = 10,
    /// Puddles.
    Puddles = 11,
    /// Swamp.
    Swamp = 12,
    /// Mud.
    Mud = 13,
    /// Leaves.
    Leaves = 14,
    /// Lava; lethal, not walkable.
    Lava = 15,
    /// Bottomless pit; not walkable.
    BottomlessPit = 16,
    /// Deep water; not walkable.
    DeepWater = 17,
    /// Door threshold face.
    Door = 18,
    /// Snow.
    Snow = 19,
    /// Sand.
    Sand = 20,
    /// Stone bridge.
    StoneBridge = 21,
}

impl SurfaceMaterial {
    /// Decodes a raw material id from walkmesh data. Ids outside the table
    /// decode to [`SurfaceMaterial::Undefined`], which is never walkable.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Dirt,
            2 => Self::Obscuring,
            3 => Self::Grass,
            4 => Self::Stone,
            5 => Self::Wood,
            6 => Self::Water,
            7 => Self::NonWalk,
            8 => Self::Transparent,
            9 => Self::Carpet,
            10 => Self::Metal,
            11 => Self::Puddles,
            12 => Self::Swamp,
            13 => Self::Mud,
            14 => Self::Leaves,
            15 => Self::Lava,
            16 => Self::BottomlessPit,
            17 => Self::DeepWater,
            18 => Self::Door,
            19 => Self::Snow,
            20 => Self::Sand,
            21 => Self::StoneBridge,
            _ => Self::Undefined,
        }
    }

    /// Raw table id.
    #[must_use]
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Whether creatures may stand on and path across this material.
    #[must_use]
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            Self::Dirt
                | Self::Grass
                | Self::Stone
                | Self::Wood
                | Self::Water
                | Self::Carpet
                | Self::Metal
                | Self::Puddles
                | Self::Swamp
                | Self::Mud
                | Self::Leaves
                | Self::Door
                | Self::Snow
                | Self::Sand
                | Self::StoneBridge
        )
    }
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self::Undefined
    }
}
