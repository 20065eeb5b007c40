//! Upload and download flows on top of a [`RemoteStore`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use save_share_core::{SaveAssociation, SaveKind};
use save_share_lib::ContentIndex;

use crate::error::RemoteError;
use crate::store::RemoteStore;
use crate::types::{NewSave, RemoteSave, UploadMeta, UploadReceipt};

/// Remote saves grouped by system, then by content hash.
pub type GroupedSaves<'a> = BTreeMap<&'a str, BTreeMap<&'a str, Vec<&'a RemoteSave>>>;

/// Storage key for a save binary: `<system>/<content_hash>/<save_id>.bin`.
pub fn storage_path(system: &str, content_hash: &str, save_id: &str) -> String {
    format!("{system}/{content_hash}/{save_id}.bin")
}

/// Share one local save.
///
/// The game row is upserted first, then the save row is registered under a
/// fresh id, then the file is uploaded. The file is read before anything is
/// sent so an unreadable save leaves the remote untouched.
pub fn upload_save(
    store: &dyn RemoteStore,
    save: &SaveAssociation,
    meta: &UploadMeta,
) -> Result<UploadReceipt, RemoteError> {
    let bytes = std::fs::read(&save.path).map_err(|e| RemoteError::io(&save.path, e))?;
    let size = bytes.len() as u64;

    let game_id = store.upsert_game(&save.system, &save.content_hash, &save.title)?;
    let save_id = Uuid::new_v4().to_string();
    let path = storage_path(&save.system, &save.content_hash, &save_id);

    let core = match save.kind {
        SaveKind::SaveState => meta.core.clone().or_else(|| save.core.clone()),
        SaveKind::SaveMemory => None,
    };
    let row = NewSave {
        id: save_id,
        game_id: game_id.clone(),
        kind: save.kind,
        core,
        tags: meta.tags.clone(),
        description: meta.description.clone(),
        uploader: meta.uploader.clone(),
        storage_path: path.clone(),
    };
    let save_id = store.register_save(&row)?;
    store.upload_object(&path, bytes)?;

    log::debug!("Uploaded {} as {save_id}", save.path.display());
    Ok(UploadReceipt {
        game_id,
        save_id,
        storage_path: path,
        bytes: size,
    })
}

/// Where [`download_save`] writes a remote save.
///
/// The file is named after the local ROM (`zelda.sfc` → `zelda.srm`) so the
/// next scan matches it. Without a local ROM the remote title is used.
pub fn download_target(remote: &RemoteSave, index: &ContentIndex, saves_root: &Path) -> PathBuf {
    let stem = index
        .find(&remote.system, &remote.content_hash)
        .map(|r| r.rom_stem().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| sanitize_file_stem(&remote.title));
    saves_root
        .join(&remote.system)
        .join(format!("{stem}.{}", remote.kind.file_extension()))
}

/// Fetch a remote save into the local save tree and return its path.
///
/// An existing file at the target is kept as `<name>.bak`.
pub fn download_save(
    store: &dyn RemoteStore,
    remote: &RemoteSave,
    index: &ContentIndex,
    saves_root: &Path,
) -> Result<PathBuf, RemoteError> {
    let bytes = store
        .download_object(&remote.storage_path)?
        .ok_or_else(|| RemoteError::not_found(remote.storage_path.clone()))?;

    let target = download_target(remote, index, saves_root);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| RemoteError::io(parent, e))?;
    }
    if target.exists() {
        let mut backup = target.clone().into_os_string();
        backup.push(".bak");
        let backup = PathBuf::from(backup);
        std::fs::rename(&target, &backup).map_err(|e| RemoteError::io(&backup, e))?;
        log::info!("Kept previous save as {}", backup.display());
    }
    std::fs::write(&target, &bytes).map_err(|e| RemoteError::io(&target, e))?;
    Ok(target)
}

/// Group remote saves for browsing. Saves keep their listed order.
pub fn group_by_game(saves: &[RemoteSave]) -> GroupedSaves<'_> {
    let mut grouped: GroupedSaves<'_> = BTreeMap::new();
    for save in saves {
        grouped
            .entry(save.system.as_str())
            .or_default()
            .entry(save.content_hash.as_str())
            .or_default()
            .push(save);
    }
    grouped
}

/// `(system, content_hash)` pairs of every indexed ROM, for [`RemoteStore::list_saves`].
pub fn library_filter(index: &ContentIndex) -> Vec<(&str, &str)> {
    index
        .records()
        .iter()
        .map(|r| (r.system.as_str(), r.content_hash.as_str()))
        .collect()
}

fn sanitize_file_stem(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "save".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
