//! Indexing and save matching for save-share.
//!
//! [`ContentIndex`] turns catalog entries into content-hashed
//! [`IdentityRecord`]s and persists them; [`SaveMatcher`] walks the save tree
//! and ties each save file back to one of those records.

pub mod error;
pub mod hasher;
pub mod index;
pub mod saves;
pub mod settings;

pub use error::{IndexError, SettingsError};
pub use index::{ContentIndex, IndexProgress};
pub use saves::{SaveMatcher, ScanReport};
pub use settings::{RemoteSettings, SettingSource, Settings};

pub use save_share_catalog::{CatalogError, CatalogLoader};
pub use save_share_core::{
    GameEntry, IdentityRecord, SaveAssociation, SaveExtensions, SaveKind, detect_slot,
};
