use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub mod extensions;
pub mod util;

pub use extensions::{SAVE_MEMORY_EXTENSIONS, SAVE_STATE_EXTENSIONS, SaveExtensions, detect_slot};

/// A game declared by a system's catalog.
///
/// Produced per catalog file and consumed immediately by the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    /// System folder name (e.g., "snes", "psx")
    pub system: String,
    /// Display title from the catalog
    pub title: String,
    /// ROM path as written in the catalog; relative to the system's ROM
    /// directory or absolute.
    pub rom_path: String,
}

impl GameEntry {
    pub fn new(
        system: impl Into<String>,
        title: impl Into<String>,
        rom_path: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            title: title.into(),
            rom_path: rom_path.into(),
        }
    }
}

/// Content-derived identity of one ROM file.
///
/// Field names on disk follow the cache format shared with other clients
/// (`rom_path`, `rom_hash`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub system: String,
    pub title: String,
    /// Absolute path of the ROM at the time it was hashed.
    pub rom_path: PathBuf,
    /// Lowercase hex digest of the full file content.
    #[serde(rename = "rom_hash")]
    pub content_hash: String,
}

impl IdentityRecord {
    /// ROM file name including its extension (`zelda.sfc`).
    pub fn rom_basename(&self) -> &str {
        util::file_name_str(&self.rom_path)
    }

    /// ROM file name without its extension (`zelda`).
    pub fn rom_stem(&self) -> &str {
        util::file_stem_str(&self.rom_path)
    }
}

/// Which kind of save file an association refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SaveKind {
    /// Battery-backed / flash memory image.
    #[serde(rename = "sram")]
    SaveMemory,
    /// Full emulator snapshot.
    #[serde(rename = "state")]
    SaveState,
}

impl SaveKind {
    /// Identifier used by the remote store (`sram` / `state`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SaveMemory => "sram",
            Self::SaveState => "state",
        }
    }

    /// Extension given to downloaded files of this kind.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::SaveMemory => "srm",
            Self::SaveState => "state",
        }
    }
}

impl fmt::Display for SaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown save kind.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown save kind: '{0}' (expected 'sram' or 'state')")]
pub struct SaveKindParseError(pub String);

impl std::str::FromStr for SaveKind {
    type Err = SaveKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sram" | "save" | "srm" => Ok(Self::SaveMemory),
            "state" | "savestate" => Ok(Self::SaveState),
            other => Err(SaveKindParseError(other.to_string())),
        }
    }
}

/// A save file on disk matched to the ROM it belongs to.
///
/// `content_hash` and `title` are copied from the matched [`IdentityRecord`],
/// never derived from the save file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAssociation {
    pub system: String,
    pub kind: SaveKind,
    pub content_hash: String,
    pub title: String,
    pub path: PathBuf,
    /// Save-state slot number, when the file name carries one.
    pub slot: Option<u32>,
    /// Emulator core that produced a save-state (user supplied).
    pub core: Option<String>,
}

impl SaveAssociation {
    pub fn file_name(&self) -> &str {
        util::file_name_str(&self.path)
    }

    /// Whether this association points at the given file.
    pub fn is_at(&self, path: &Path) -> bool {
        self.path == path
    }
}
