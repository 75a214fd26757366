//! Game install detection.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use boreal_foundation::EngineFamily;
use tracing::debug;

/// A recognized game installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInstall {
    /// Which engine family the install belongs to.
    pub family: EngineFamily,
    /// Human-readable game title.
    pub title: String,
    /// The directory that was probed.
    pub root: PathBuf,
}

/// Main executables, checked first. Filenames are compared case-insensitively
/// since installs moved between filesystems lose their original casing.
const EXECUTABLE_PROBES: &[(&str, EngineFamily, &str)] = &[
    ("nwmain.exe", EngineFamily::Aurora, "Neverwinter Nights"),
    (
        "swkotor.exe",
        EngineFamily::Odyssey,
        "Star Wars: Knights of the Old Republic",
    ),
    (
        "swkotor2.exe",
        EngineFamily::Odyssey,
        "Star Wars: Knights of the Old Republic II - The Sith Lords",
    ),
    ("nwn2main.exe", EngineFamily::Electron, "Neverwinter Nights 2"),
    ("daorigins.exe", EngineFamily::Eclipse, "Dragon Age: Origins"),
];

/// Data-file fallbacks for installs shipped without the Windows executable,
/// e.g. aspyr ports and mobile builds.
const SIGNATURE_PROBES: &[(&str, EngineFamily, &str)] = &[
    ("nwn.ini", EngineFamily::Aurora, "Neverwinter Nights"),
    (
        "swkotor.ini",
        EngineFamily::Odyssey,
        "Star Wars: Knights of the Old Republic",
    ),
    (
        "swkotor2.ini",
        EngineFamily::Odyssey,
        "Star Wars: Knights of the Old Republic II - The Sith Lords",
    ),
    ("nwn2.ini", EngineFamily::Electron, "Neverwinter Nights 2"),
    ("dragonage.ini", EngineFamily::Eclipse, "Dragon Age: Origins"),
];

/// Identifies which game, if any, is installed at `path`.
///
/// Executable probes run first; data-file signatures are only consulted when
/// no executable matches. Unreadable or unrecognized directories yield
/// `None`.
#[must_use]
pub fn detect_install(path: &Path) -> Option<GameInstall> {
    let entries = std::fs::read_dir(path).ok()?;
    let names: BTreeSet<String> = entries
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .map(|name| name.to_lowercase())
        .collect();

    for &(probe, family, title) in EXECUTABLE_PROBES {
        if names.contains(probe) {
            debug!(%family, probe, "matched executable probe");
            return Some(GameInstall {
                family,
                title: title.to_owned(),
                root: path.to_owned(),
            });
        }
    }
    for &(probe, family, title) in SIGNATURE_PROBES {
        if names.contains(probe) {
            debug!(%family, probe, "matched signature probe");
            return Some(GameInstall {
                family,
                title: title.to_owned(),
                root: path.to_owned(),
            });
        }
    }
    debug!(path = %path.display(), "no install detected");
    None
}
