//! Content-hash index of the ROM library.
//!
//! Every indexing run re-hashes each ROM named by the catalogs and replaces
//! the working set wholesale, so ROMs dropped from a catalog also drop out of
//! the index. The working set is persisted as a JSON document:
//!
//! ```json
//! { "roms": [ { "system": "snes", "title": "Zelda", "rom_path": "/roms/snes/zelda.sfc", "rom_hash": "…" } ] }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use save_share_core::util::absolute_normalized;
use save_share_core::{GameEntry, IdentityRecord};

use crate::error::IndexError;
use crate::hasher;

/// On-disk layout of the cache file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheDocument {
    #[serde(default)]
    roms: Vec<IdentityRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<String>,
}

/// Progress events emitted while indexing.
#[derive(Debug, Clone, Copy)]
pub enum IndexProgress<'a> {
    /// About to hash the ROM for `entry`.
    Hashing {
        entry: &'a GameEntry,
        path: &'a Path,
    },
    /// Bytes hashed so far for the current ROM.
    Bytes { done: u64 },
    /// The catalog names a ROM that is not on disk.
    Missing {
        entry: &'a GameEntry,
        path: &'a Path,
    },
    /// A record was produced.
    Indexed { record: &'a IdentityRecord },
}

/// The identity records of a ROM library plus the cache file backing them.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    cache_path: Option<PathBuf>,
    records: Vec<IdentityRecord>,
}

impl ContentIndex {
    /// An index persisted at `cache_path`.
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: Some(cache_path.into()),
            records: Vec::new(),
        }
    }

    /// An index with no backing file; `load_cache`/`save_cache` are no-ops.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// The current working set.
    pub fn records(&self) -> &[IdentityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load the persisted records into the working set.
    ///
    /// A missing cache file, or one without a `roms` list, yields an empty
    /// set. A file that is not valid JSON is an error and leaves the working
    /// set untouched.
    pub fn load_cache(&mut self) -> Result<&[IdentityRecord], IndexError> {
        let Some(path) = self.cache_path.as_deref() else {
            return Ok(&self.records);
        };

        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No cache at {}", path.display());
                self.records.clear();
                return Ok(&self.records);
            }
            Err(e) => {
                return Err(IndexError::CacheRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let doc: CacheDocument =
            serde_json::from_str(&contents).map_err(|e| IndexError::CacheParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        log::debug!("Loaded {} cached records from {}", doc.roms.len(), path.display());
        self.records = doc.roms;
        Ok(&self.records)
    }

    /// Hash every catalog entry whose ROM exists and make the result the new
    /// working set.
    ///
    /// Relative ROM paths are resolved against `roms_root/<system>`. Entries
    /// whose ROM is missing are logged and skipped. A read error while
    /// hashing aborts the run; the previous working set is kept in that case.
    pub fn index_games(
        &mut self,
        roms_root: &Path,
        entries: impl IntoIterator<Item = GameEntry>,
    ) -> Result<&[IdentityRecord], IndexError> {
        self.index_games_with_progress(roms_root, entries, &|_| {})
    }

    /// [`index_games`](Self::index_games) with a progress callback.
    pub fn index_games_with_progress(
        &mut self,
        roms_root: &Path,
        entries: impl IntoIterator<Item = GameEntry>,
        progress: &dyn Fn(IndexProgress<'_>),
    ) -> Result<&[IdentityRecord], IndexError> {
        let mut indexed = Vec::new();

        for entry in entries {
            let rom_path = resolve_rom_path(roms_root, &entry);
            if !rom_path.is_file() {
                log::warn!(
                    "ROM for '{}' ({}) not found at {}",
                    entry.title,
                    entry.system,
                    rom_path.display()
                );
                progress(IndexProgress::Missing {
                    entry: &entry,
                    path: &rom_path,
                });
                continue;
            }

            progress(IndexProgress::Hashing {
                entry: &entry,
                path: &rom_path,
            });
            let content_hash = hash_rom(&rom_path, progress)?;
            let absolute =
                absolute_normalized(&rom_path).map_err(|e| IndexError::hash(&rom_path, e))?;

            let record = IdentityRecord {
                system: entry.system,
                title: entry.title,
                rom_path: absolute,
                content_hash,
            };
            log::debug!(
                "Indexed {} [{}] {}",
                record.system,
                record.content_hash,
                record.rom_path.display()
            );
            progress(IndexProgress::Indexed { record: &record });
            indexed.push(record);
        }

        self.records = indexed;
        Ok(&self.records)
    }

    /// Write the working set to the cache file, replacing what was there.
    pub fn save_cache(&self) -> Result<(), IndexError> {
        let Some(path) = self.cache_path.as_deref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| IndexError::cache_write(parent, e))?;
        }

        let doc = CacheDocument {
            roms: self.records.clone(),
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        let contents = serde_json::to_string_pretty(&doc)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|e| IndexError::cache_write(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| IndexError::cache_write(path, e))?;
        log::debug!("Saved {} records to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Delete the cache file. Returns whether a file was removed.
    pub fn clear_cache(&self) -> Result<bool, IndexError> {
        let Some(path) = self.cache_path.as_deref() else {
            return Ok(false);
        };
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(IndexError::cache_write(path, e)),
        }
    }

    /// Records grouped by system, systems in lexicographic order.
    pub fn by_system(&self) -> BTreeMap<&str, Vec<&IdentityRecord>> {
        let mut systems: BTreeMap<&str, Vec<&IdentityRecord>> = BTreeMap::new();
        for record in &self.records {
            systems.entry(record.system.as_str()).or_default().push(record);
        }
        systems
    }

    /// Records keyed by `"system:rom_basename"`. Later records win when two
    /// share a key.
    pub fn as_lookup(&self) -> HashMap<String, &IdentityRecord> {
        self.records
            .iter()
            .map(|r| (lookup_key(&r.system, r.rom_basename()), r))
            .collect()
    }

    /// Find the local record for a remote `(system, content_hash)` identity.
    pub fn find(&self, system: &str, content_hash: &str) -> Option<&IdentityRecord> {
        self.records
            .iter()
            .find(|r| r.system == system && r.content_hash == content_hash)
    }
}

/// Key format used by [`ContentIndex::as_lookup`].
pub fn lookup_key(system: &str, rom_basename: &str) -> String {
    format!("{system}:{rom_basename}")
}

fn resolve_rom_path(roms_root: &Path, entry: &GameEntry) -> PathBuf {
    let declared = Path::new(&entry.rom_path);
    if declared.is_absolute() {
        declared.to_path_buf()
    } else {
        roms_root.join(&entry.system).join(declared)
    }
}

fn hash_rom(path: &Path, progress: &dyn Fn(IndexProgress<'_>)) -> Result<String, IndexError> {
    let mut file = std::fs::File::open(path).map_err(|e| IndexError::hash(path, e))?;
    hasher::hash_reader_with_progress(&mut file, &|done| progress(IndexProgress::Bytes { done }))
        .map_err(|e| IndexError::hash(path, e))
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod tests;
