//! Faction reputation.
//!
//! Reputation is directional: how faction `of` feels about faction `toward`,
//! on a 0-100 scale. Unset pairs default to 50 (indifferent), a faction
//! always likes itself, and anything at or below [`HOSTILE_THRESHOLD`] is
//! attack-on-sight.

use std::collections::BTreeMap;

/// Reputation at or below this value means hostile.
pub const HOSTILE_THRESHOLD: u8 = 10;

const DEFAULT_REPUTATION: u8 = 50;
const SELF_REPUTATION: u8 = 100;

/// The world's faction reputation matrix.
#[derive(Debug, Clone, Default)]
pub struct FactionRelations {
    reputation: BTreeMap<(u16, u16), u8>,
}

impl FactionRelations {
    /// Creates an empty matrix where everyone is indifferent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How `of` feels about `toward`.
    #[must_use]
    pub fn reputation(&self, of: u16, toward: u16) -> u8 {
        if of == toward {
            return SELF_REPUTATION;
        }
        self.reputation
            .get(&(of, toward))
            .copied()
            .unwrap_or(DEFAULT_REPUTATION)
    }

    /// Sets how `of` feels about `toward`, clamped to 0-100.
    pub fn set_reputation(&mut self, of: u16, toward: u16, value: u8) {
        self.reputation.insert((of, toward), value.min(100));
    }

    /// Sets the reputation in both directions at once.
    pub fn set_mutual(&mut self, a: u16, b: u16, value: u8) {
        self.set_reputation(a, b, value);
        self.set_reputation(b, a, value);
    }

    /// Whether `of` attacks `toward` on sight.
    #[must_use]
    pub fn is_hostile(&self, of: u16, toward: u16) -> bool {
        self.reputation(of, toward) <= HOSTILE_THRESHOLD
    }

    /// Drops all configured reputation, restoring defaults.
    pub fn clear(&mut self) {
        self.reputation.clear();
    }
}
