//! Per-system game catalogs.
//!
//! A library root holds one folder per system; each folder may carry an
//! EmulationStation-style `gamelist.xml` naming its games and ROM paths.
//! This crate turns those files into [`GameEntry`] values without touching
//! the ROMs themselves.

pub mod error;
pub mod gamelist;
pub mod loader;

pub use error::CatalogError;
pub use gamelist::{parse_gamelist, parse_gamelist_file};
pub use loader::{CatalogEntries, CatalogLoader, GAMELIST_FILE};
pub use save_share_core::GameEntry;
