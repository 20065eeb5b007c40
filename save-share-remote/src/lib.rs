//! Sharing saves through a remote store.
//!
//! Games are keyed remotely by `(system, content_hash)`, so a save uploaded
//! from one device matches the same ROM on another regardless of file names.

pub mod error;
pub mod store;
pub mod supabase;
pub mod sync;
pub mod types;

pub use error::RemoteError;
pub use store::RemoteStore;
pub use supabase::SupabaseStore;
pub use sync::{
    GroupedSaves, download_save, download_target, group_by_game, library_filter, storage_path,
    upload_save,
};
pub use types::{NewSave, RemoteSave, TAG_PRESETS, UploadMeta, UploadReceipt, normalize_tags};
