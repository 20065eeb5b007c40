//! Save file discovery and matching.
//!
//! Saves live under `<save_root>/<system>/**`. Each file with a known save
//! extension is tied to an indexed ROM of the same system by file name:
//!
//! 1. `<stem>.<ext>` equals a ROM file name,
//! 2. `<stem>` equals a ROM file name (`zelda.sfc.srm` → `zelda.sfc`),
//! 3. `<stem>` equals a ROM file name without its extension
//!    (`zelda.srm` → `zelda.sfc`).
//!
//! When several ROMs qualify under rule 3 the one with the smallest path
//! wins and the ambiguity is logged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use save_share_core::{IdentityRecord, SaveAssociation, SaveExtensions, SaveKind, detect_slot};

/// Everything a scan found, including the files it could not place.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Saves matched to an indexed ROM.
    pub saves: Vec<SaveAssociation>,
    /// Save files whose name matched no indexed ROM of their system.
    pub unmatched: Vec<PathBuf>,
    /// Matches that had to pick between several ROMs sharing a stem.
    pub ambiguous: usize,
}

/// Per-system map of ROM file name to record.
type SystemLookup<'a> = BTreeMap<&'a str, BTreeMap<&'a str, &'a IdentityRecord>>;

enum RomMatch<'a> {
    Found(&'a IdentityRecord),
    Ambiguous(&'a IdentityRecord, Vec<&'a IdentityRecord>),
    None,
}

/// Walks a save directory tree and associates save files with ROMs.
#[derive(Debug, Clone)]
pub struct SaveMatcher {
    save_root: PathBuf,
    extensions: SaveExtensions,
}

impl SaveMatcher {
    pub fn new(save_root: impl Into<PathBuf>) -> Self {
        Self {
            save_root: save_root.into(),
            extensions: SaveExtensions::default(),
        }
    }

    /// Replace the save-memory / save-state extension tables.
    pub fn with_extensions(mut self, extensions: SaveExtensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Matched saves only; see [`scan_report`](Self::scan_report).
    pub fn scan(&self, records: &[IdentityRecord]) -> Vec<SaveAssociation> {
        self.scan_report(records).saves
    }

    /// Walk the save folder of every system that has indexed ROMs.
    ///
    /// Systems are visited in lexicographic order and files in file-name
    /// order, so the result is stable across runs. Nothing is written.
    pub fn scan_report(&self, records: &[IdentityRecord]) -> ScanReport {
        let mut report = ScanReport::default();

        for (system, roms) in build_lookup(records) {
            let system_dir = self.save_root.join(system);
            if !system_dir.is_dir() {
                continue;
            }
            log::debug!("Scanning saves in {}", system_dir.display());

            for entry in WalkDir::new(&system_dir).sort_by_file_name() {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        log::warn!("Skipping unreadable entry under {}: {e}", system_dir.display());
                        continue;
                    }
                };
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                self.visit_file(system, &roms, path, &mut report);
            }
        }

        if !report.unmatched.is_empty() {
            log::info!(
                "{} save file(s) did not match any indexed ROM",
                report.unmatched.len()
            );
        }
        report
    }

    fn visit_file(
        &self,
        system: &str,
        roms: &BTreeMap<&str, &IdentityRecord>,
        path: &Path,
        report: &mut ScanReport,
    ) {
        let Some(kind) = self.extensions.classify(path) else {
            return;
        };
        let (Some(file_name), Some(stem), Some(ext)) = (
            path.file_name().and_then(|n| n.to_str()),
            path.file_stem().and_then(|n| n.to_str()),
            path.extension().and_then(|e| e.to_str()),
        ) else {
            return;
        };

        let slot = match kind {
            SaveKind::SaveState => detect_slot(file_name),
            SaveKind::SaveMemory => None,
        };

        let record = match match_rom(roms, stem, &ext.to_ascii_lowercase()) {
            RomMatch::Found(r) => r,
            RomMatch::Ambiguous(r, candidates) => {
                let others: Vec<String> = candidates
                    .iter()
                    .map(|c| c.rom_path.display().to_string())
                    .collect();
                log::warn!(
                    "{} matches {} ROMs by name ({}); using {}",
                    path.display(),
                    candidates.len(),
                    others.join(", "),
                    r.rom_path.display()
                );
                report.ambiguous += 1;
                r
            }
            RomMatch::None => {
                log::debug!("No ROM in {system} for save {}", path.display());
                report.unmatched.push(path.to_path_buf());
                return;
            }
        };

        report.saves.push(SaveAssociation {
            system: system.to_string(),
            kind,
            content_hash: record.content_hash.clone(),
            title: record.title.clone(),
            path: path.to_path_buf(),
            slot,
            core: None,
        });
    }
}

fn build_lookup(records: &[IdentityRecord]) -> SystemLookup<'_> {
    let mut lookup: SystemLookup<'_> = BTreeMap::new();
    for record in records {
        lookup
            .entry(record.system.as_str())
            .or_default()
            .insert(record.rom_basename(), record);
    }
    lookup
}

fn match_rom<'a>(
    roms: &BTreeMap<&'a str, &'a IdentityRecord>,
    stem: &str,
    ext: &str,
) -> RomMatch<'a> {
    if let Some(&record) = roms.get(format!("{stem}.{ext}").as_str()) {
        return RomMatch::Found(record);
    }
    if let Some(&record) = roms.get(stem) {
        return RomMatch::Found(record);
    }

    let mut candidates: Vec<&IdentityRecord> = roms
        .values()
        .copied()
        .filter(|r| r.rom_stem() == stem)
        .collect();
    candidates.sort_by(|a, b| a.rom_path.cmp(&b.rom_path));

    match candidates.len() {
        0 => RomMatch::None,
        1 => RomMatch::Found(candidates[0]),
        _ => RomMatch::Ambiguous(candidates[0], candidates),
    }
}

#[cfg(test)]
#[path = "tests/saves_tests.rs"]
mod tests;
