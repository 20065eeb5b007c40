pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod index;
pub(crate) mod remote;
pub(crate) mod scan;

use std::cell::RefCell;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use save_share_core::util::format_bytes_approx;
use save_share_lib::{
    CatalogLoader, ContentIndex, IndexError, IndexProgress, SaveAssociation, SaveKind,
    SaveMatcher, ScanReport, Settings,
};

use crate::error::CliError;
use crate::spinner::spinner;

/// Open the cache-backed index. A corrupt cache is reported and treated as
/// empty so the next indexing run rebuilds it.
pub(crate) fn open_index(settings: &Settings) -> Result<ContentIndex, CliError> {
    let mut index = ContentIndex::new(&settings.cache_path);
    match index.load_cache() {
        Ok(records) => log::debug!("{} cached ROM records", records.len()),
        Err(e @ IndexError::CacheParse { .. }) => {
            log::warn!("{e}; ignoring it");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(index)
}

/// Re-hash every catalogued ROM and persist the result.
pub(crate) fn build_index(settings: &Settings, hide_progress: bool) -> Result<ContentIndex, CliError> {
    let mut index = open_index(settings)?;
    let loader = CatalogLoader::new(&settings.roms_path);
    let mut entries = loader.entries()?;

    let pb = spinner(hide_progress);
    let current = RefCell::new(String::new());
    let progress = |event: IndexProgress<'_>| match event {
        IndexProgress::Hashing { entry, .. } => {
            let label = format!("Hashing {} ({})", entry.title, entry.system);
            pb.set_message(label.clone());
            *current.borrow_mut() = label;
        }
        IndexProgress::Bytes { done } => {
            pb.set_message(format!("{} {}", current.borrow(), format_bytes_approx(done)));
        }
        IndexProgress::Missing { .. } | IndexProgress::Indexed { .. } => {}
    };

    let indexed = index
        .index_games_with_progress(&settings.roms_path, &mut entries, &progress)
        .map(|records| records.len());
    pb.finish_and_clear();
    let indexed = indexed?;

    index.save_cache()?;
    let failed = entries.failed_systems();
    if !failed.is_empty() {
        log::warn!(
            "{} unreadable catalog(s) skipped: {}",
            failed.len(),
            failed.join(", "),
        );
    }
    log::info!(
        "{} Indexed {} ROMs",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        indexed,
    );
    Ok(index)
}

/// Use the cached index, building it first when there is none.
pub(crate) fn load_index(settings: &Settings, hide_progress: bool) -> Result<ContentIndex, CliError> {
    let index = open_index(settings)?;
    if !index.is_empty() {
        return Ok(index);
    }
    log::info!("No cached ROM index; indexing the library first.");
    build_index(settings, hide_progress)
}

pub(crate) fn scan_saves(settings: &Settings, index: &ContentIndex) -> ScanReport {
    SaveMatcher::new(&settings.saves_path).scan_report(index.records())
}

/// `sram`, `state` or `state (slot N)`.
pub(crate) fn kind_label(save: &SaveAssociation) -> String {
    match (save.kind, save.slot) {
        (SaveKind::SaveState, Some(slot)) => format!("{} (slot {slot})", save.kind),
        _ => save.kind.to_string(),
    }
}
