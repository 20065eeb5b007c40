//! Save file classification tables.
//!
//! The two extension sets are fixed for compatibility with existing save
//! layouts. [`SaveExtensions`] wraps them so callers (and tests) can supply
//! their own tables instead.

use std::collections::BTreeSet;
use std::path::Path;

use crate::SaveKind;

/// Battery/flash save image extensions (lowercase, no leading dot).
pub const SAVE_MEMORY_EXTENSIONS: &[&str] = &["sav", "srm", "mcr", "eep", "fla", "rmc"];

/// Save-state extensions (lowercase, no leading dot).
pub const SAVE_STATE_EXTENSIONS: &[&str] =
    &["state", "state1", "state2", "state3", "0", "1", "2", "3"];

/// Extension tables used to classify save files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveExtensions {
    memory: BTreeSet<String>,
    state: BTreeSet<String>,
}

impl SaveExtensions {
    /// Build tables from arbitrary extension lists. Leading dots are
    /// stripped and matching is case-insensitive.
    pub fn new(memory: &[&str], state: &[&str]) -> Self {
        Self {
            memory: normalize_set(memory),
            state: normalize_set(state),
        }
    }

    /// Classify a file by its extension. Returns `None` for files that are
    /// neither save-memory nor save-state.
    ///
    /// Save-memory wins if an extension appears in both tables.
    pub fn classify(&self, path: &Path) -> Option<SaveKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if self.memory.contains(&ext) {
            Some(SaveKind::SaveMemory)
        } else if self.state.contains(&ext) {
            Some(SaveKind::SaveState)
        } else {
            None
        }
    }
}

impl Default for SaveExtensions {
    fn default() -> Self {
        Self::new(SAVE_MEMORY_EXTENSIONS, SAVE_STATE_EXTENSIONS)
    }
}

fn normalize_set(exts: &[&str]) -> BTreeSet<String> {
    exts.iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Extract a save-state slot from a file name.
///
/// The slot is the single trailing digit when it directly follows `state`
/// or a dot: `game.state2` → 2, `game.3` → 3. Anything else (no trailing
/// digit, multi-digit suffixes like `game.state10`) yields `None`.
pub fn detect_slot(file_name: &str) -> Option<u32> {
    let mut chars = file_name.chars();
    let slot = chars.next_back()?.to_digit(10)?;
    let rest = chars.as_str();
    if rest.ends_with('.') || rest.ends_with("state") {
        Some(slot)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests/extensions_tests.rs"]
mod tests;
