use std::path::PathBuf;

use save_share_core::GameEntry;

use crate::error::CatalogError;
use crate::gamelist::parse_gamelist_file;

/// Catalog file name expected inside each system folder.
pub const GAMELIST_FILE: &str = "gamelist.xml";

/// Reads the catalogs of every system folder under a ROM library root.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    root: PathBuf,
    file_name: String,
}

impl CatalogLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: GAMELIST_FILE.to_string(),
        }
    }

    /// Use a different catalog file name than `gamelist.xml`.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Path of the catalog file for `system` (which may not exist).
    pub fn catalog_path(&self, system: &str) -> PathBuf {
        self.root.join(system).join(&self.file_name)
    }

    /// System folder names under the root, sorted lexicographically.
    ///
    /// Plain files and folders with non-UTF-8 names are ignored.
    pub fn systems(&self) -> Result<Vec<String>, CatalogError> {
        let entries =
            std::fs::read_dir(&self.root).map_err(|e| CatalogError::io(&self.root, e))?;
        let mut systems: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        systems.sort();
        Ok(systems)
    }

    /// Parse the catalog of a single system. No catalog means no entries.
    pub fn load_system(&self, system: &str) -> Result<Vec<GameEntry>, CatalogError> {
        parse_gamelist_file(&self.catalog_path(system), system)
    }

    /// Iterate the entries of every system, in system order and then
    /// catalog order.
    ///
    /// Each system's catalog is parsed only when the iterator reaches it. A
    /// catalog that cannot be read is logged and skipped; the other systems
    /// are still produced. Calling this again restarts from the first system.
    pub fn entries(&self) -> Result<CatalogEntries<'_>, CatalogError> {
        Ok(CatalogEntries {
            loader: self,
            systems: self.systems()?.into_iter(),
            current: Vec::new().into_iter(),
            failed: Vec::new(),
        })
    }
}

/// Lazy iterator over all catalog entries of a library. See
/// [`CatalogLoader::entries`].
#[derive(Debug)]
pub struct CatalogEntries<'a> {
    loader: &'a CatalogLoader,
    systems: std::vec::IntoIter<String>,
    current: std::vec::IntoIter<GameEntry>,
    failed: Vec<String>,
}

impl CatalogEntries<'_> {
    /// Systems whose catalog failed to parse so far.
    pub fn failed_systems(&self) -> &[String] {
        &self.failed
    }
}

impl Iterator for CatalogEntries<'_> {
    type Item = GameEntry;

    fn next(&mut self) -> Option<GameEntry> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some(entry);
            }
            let system = self.systems.next()?;
            match self.loader.load_system(&system) {
                Ok(entries) => {
                    log::debug!("Catalog for {system}: {} entries", entries.len());
                    self.current = entries.into_iter();
                }
                Err(e) => {
                    log::warn!("Skipping catalog for {system}: {e}");
                    self.failed.push(system);
                }
            }
        }
    }
}
