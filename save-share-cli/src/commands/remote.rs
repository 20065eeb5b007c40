use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use save_share_core::util::{absolute_normalized, format_bytes_approx};
use save_share_lib::{SaveKind, Settings};
use save_share_remote::{
    RemoteStore, SupabaseStore, TAG_PRESETS, UploadMeta, download_save, group_by_game,
    library_filter, normalize_tags, upload_save,
};

use super::{kind_label, load_index, scan_saves};
use crate::error::CliError;

fn connect(settings: &Settings) -> Result<SupabaseStore, CliError> {
    let remote = settings.remote()?;
    log::debug!("Remote store {} (bucket {})", remote.url, remote.bucket);
    Ok(SupabaseStore::new(&remote)?)
}

/// Upload one scanned save with its description, tags and core.
pub(crate) fn run_upload(
    settings: &Settings,
    hide_progress: bool,
    save_path: &Path,
    description: String,
    tags: Vec<String>,
    core: Option<String>,
) -> Result<(), CliError> {
    let index = load_index(settings, hide_progress)?;
    let report = scan_saves(settings, &index);

    let wanted = absolute_normalized(save_path)?;
    let save = report
        .saves
        .iter()
        .find(|s| absolute_normalized(&s.path).is_ok_and(|p| p == wanted))
        .ok_or_else(|| {
            CliError::unknown_save(format!(
                "{} does not belong to an indexed ROM (run 'save-share scan' to list saves)",
                save_path.display()
            ))
        })?;

    if core.is_some() && save.kind == SaveKind::SaveMemory {
        log::warn!("--core only applies to save-states; ignoring it");
    }

    let tags = normalize_tags(tags);
    if tags.is_empty() {
        log::info!(
            "{}",
            format!("Tip: add --tag to help others find it ({})", TAG_PRESETS.join(", "))
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let store = connect(settings)?;
    let meta = UploadMeta {
        description,
        tags,
        core,
        uploader: Some(settings.device_nickname.clone()),
    };

    log::info!(
        "Uploading {} ({}) for {} [{}]",
        save.file_name().if_supports_color(Stdout, |t| t.cyan()),
        kind_label(save),
        save.title.if_supports_color(Stdout, |t| t.bold()),
        save.system,
    );
    let receipt = upload_save(&store, save, &meta)?;
    log::info!(
        "{} Upload complete: {} ({})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        receipt.save_id,
        format_bytes_approx(receipt.bytes),
    );
    log::debug!("Stored at {}", receipt.storage_path);
    Ok(())
}

/// List remote saves for games in the local library.
pub(crate) fn run_browse(settings: &Settings, hide_progress: bool) -> Result<(), CliError> {
    let index = load_index(settings, hide_progress)?;
    let store = connect(settings)?;
    let saves = store.list_saves(&library_filter(&index))?;

    if saves.is_empty() {
        log::info!(
            "{}",
            "No remote saves for your library yet.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    for (system, games) in group_by_game(&saves) {
        log::info!("");
        log::info!("{}", system.if_supports_color(Stdout, |t| t.bold()));
        for (hash, entries) in games {
            let title = index
                .find(system, hash)
                .map(|r| r.title.as_str())
                .or_else(|| entries.first().map(|s| s.title.as_str()))
                .unwrap_or(hash);
            log::info!(
                "  {} {}",
                title.if_supports_color(Stdout, |t| t.bold()),
                format!("({hash})").if_supports_color(Stdout, |t| t.dimmed()),
            );
            for save in entries {
                let core = save
                    .core
                    .as_deref()
                    .map(|c| format!(" [{c}]"))
                    .unwrap_or_default();
                let tags = if save.tags.is_empty() {
                    String::new()
                } else {
                    format!(" | {}", save.tags.join(", "))
                };
                log::info!(
                    "    {} {}{} by {}: {}{}",
                    save.id.if_supports_color(Stdout, |t| t.cyan()),
                    save.kind,
                    core,
                    save.uploader.as_deref().unwrap_or("anonymous"),
                    save.description,
                    tags,
                );
            }
        }
    }
    Ok(())
}

/// Download a remote save by id into the save tree.
pub(crate) fn run_download(
    settings: &Settings,
    hide_progress: bool,
    save_id: &str,
) -> Result<(), CliError> {
    let index = load_index(settings, hide_progress)?;
    let store = connect(settings)?;
    let saves = store.list_saves(&library_filter(&index))?;

    let remote = saves.iter().find(|s| s.id == save_id).ok_or_else(|| {
        CliError::unknown_save(format!(
            "{save_id} is not shared for any game in your library (run 'save-share browse')"
        ))
    })?;

    let path = download_save(&store, remote, &index, &settings.saves_path)?;
    log::info!(
        "{} Saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}
