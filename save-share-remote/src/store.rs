use crate::error::RemoteError;
use crate::types::{NewSave, RemoteSave};

/// Operations the sync layer needs from a remote save store.
///
/// Games are identified by `(system, content_hash)`; saves by an id the
/// client generates. Storage paths are opaque keys inside the store's bucket.
pub trait RemoteStore {
    /// Create the game row if needed and return its id.
    fn upsert_game(&self, system: &str, content_hash: &str, title: &str)
    -> Result<String, RemoteError>;

    /// Register save metadata and return the stored id.
    fn register_save(&self, save: &NewSave) -> Result<String, RemoteError>;

    /// Store a save binary under `storage_path`.
    fn upload_object(&self, storage_path: &str, bytes: Vec<u8>) -> Result<(), RemoteError>;

    /// Saves shared for any of the given `(system, content_hash)` games.
    ///
    /// An empty filter returns no saves.
    fn list_saves(&self, games: &[(&str, &str)]) -> Result<Vec<RemoteSave>, RemoteError>;

    /// Fetch a save binary. `None` when nothing is stored at the path.
    fn download_object(&self, storage_path: &str) -> Result<Option<Vec<u8>>, RemoteError>;
}
