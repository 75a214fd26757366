//! The legacy engine lineages unified by this runtime.

use std::fmt;

/// One of the four engine lineages whose content this runtime can simulate.
///
/// Family-divergent behavior (idle tuning, perception policy, module file
/// layout) is selected once at construction from this value; the simulation
/// loop itself is family-agnostic.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EngineFamily {
    /// The first-generation lineage (contested stealth checks, waypoint
    /// patrols).
    Aurora,
    /// The console-era offshoot of Aurora (waypoint patrols, distance-only
    /// stealth).
    Odyssey,
    /// The second-generation successor to Aurora.
    Electron,
    /// The action-oriented lineage that replaced Electron.
    Eclipse,
}

impl EngineFamily {
    /// All families, in lineage order.
    pub const ALL: [Self; 4] = [Self::Aurora, Self::Odyssey, Self::Electron, Self::Eclipse];
}

impl fmt::Display for EngineFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aurora => "aurora",
            Self::Odyssey => "odyssey",
            Self::Electron => "electron",
            Self::Eclipse => "eclipse",
        };
        f.write_str(name)
    }
}
