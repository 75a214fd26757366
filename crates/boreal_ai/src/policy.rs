//! Per-family behavior tuning.
//!
//! Each legacy lineage shipped its own idle pacing and stealth rules. Those
//! differences are captured here as plain data so the controller logic can
//! stay family-agnostic: construct a [`FamilyPolicy`] once and every
//! divergent decision reads a field instead of matching on the family.

use boreal_foundation::EngineFamily;

/// Radius, in meters, within which a creature will pick combat targets.
///
/// Perception can extend further than this. A creature that hears a hostile
/// beyond the radius is in combat (alert, hooks firing) but will not chase.
pub const COMBAT_SEARCH_RADIUS: f32 = 50.0;

/// Pacing for idle behavior, fixed per family.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IdleProfile {
    /// Maximum distance, in meters, of a wander destination from the
    /// creature's spawn position.
    pub wander_radius: f32,
    /// Seconds between wander moves.
    pub wander_interval: f32,
    /// Seconds between idle look-arounds.
    pub look_interval: f32,
    /// Seconds between fidget animations.
    pub idle_anim_interval: f32,
    /// Seconds a patrolling creature pauses at each waypoint.
    pub patrol_wait: f32,
}

impl IdleProfile {
    /// The baseline profile, used verbatim by Aurora and adjusted by the
    /// later lineages.
    pub const DEFAULT: Self = Self {
        wander_radius: 5.0,
        wander_interval: 10.0,
        look_interval: 7.0,
        idle_anim_interval: 15.0,
        patrol_wait: 2.0,
    };
}

impl Default for IdleProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How a family resolves and reports perception.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PerceptionPolicy {
    /// Sight inside range and line of sight still requires winning an
    /// opposed d20 spot-versus-hide check. Aurora only.
    pub contested_checks: bool,
    /// Perception events fire only when an object's noticed state changes.
    /// When false the family re-reports everything noticed on every pulse.
    pub edge_triggered: bool,
}

/// The full behavior policy for one engine family.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FamilyPolicy {
    /// The lineage this policy was built for.
    pub family: EngineFamily,
    /// Idle pacing.
    pub idle: IdleProfile,
    /// Perception rules.
    pub perception: PerceptionPolicy,
    /// Whether creatures follow waypoint patrol routes. When false, idle
    /// creatures only wander near their spawn position.
    pub supports_patrol: bool,
}

impl FamilyPolicy {
    /// Returns the built-in policy for `family`.
    #[must_use]
    pub fn for_family(family: EngineFamily) -> Self {
        match family {
            EngineFamily::Aurora => Self {
                family,
                idle: IdleProfile::DEFAULT,
                perception: PerceptionPolicy {
                    contested_checks: true,
                    edge_triggered: true,
                },
                supports_patrol: true,
            },
            EngineFamily::Odyssey => Self {
                family,
                idle: IdleProfile {
                    wander_radius: 4.0,
                    wander_interval: 8.0,
                    look_interval: 6.0,
                    idle_anim_interval: 12.0,
                    patrol_wait: 3.0,
                },
                perception: PerceptionPolicy {
                    contested_checks: false,
                    edge_triggered: true,
                },
                supports_patrol: true,
            },
            EngineFamily::Electron => Self {
                family,
                idle: IdleProfile {
                    wander_radius: 6.0,
                    wander_interval: 12.0,
                    look_interval: 8.0,
                    idle_anim_interval: 20.0,
                    patrol_wait: IdleProfile::DEFAULT.patrol_wait,
                },
                perception: PerceptionPolicy {
                    contested_checks: false,
                    edge_triggered: false,
                },
                supports_patrol: false,
            },
            EngineFamily::Eclipse => Self {
                family,
                idle: IdleProfile {
                    wander_radius: 3.0,
                    wander_interval: 15.0,
                    look_interval: 10.0,
                    idle_anim_interval: 25.0,
                    patrol_wait: IdleProfile::DEFAULT.patrol_wait,
                },
                perception: PerceptionPolicy {
                    contested_checks: false,
                    edge_triggered: false,
                },
                supports_patrol: false,
            },
        }
    }
}
