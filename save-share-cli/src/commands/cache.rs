use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use save_share_core::util::format_bytes_approx;
use save_share_lib::{ContentIndex, Settings};

use crate::error::CliError;

/// Summarize the cached ROM records.
pub(crate) fn run_cache_show(settings: &Settings) -> Result<(), CliError> {
    let path = &settings.cache_path;
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!(
                "{}",
                "No ROM index cached yet.".if_supports_color(Stdout, |t| t.dimmed()),
            );
            log::info!("Run 'save-share index' to build it.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut index = ContentIndex::new(path);
    index.load_cache()?;

    log::info!(
        "{}",
        "ROM identity cache:".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "  File: {} ({})",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        format_bytes_approx(size),
    );
    log::info!("");
    for (system, records) in index.by_system() {
        log::info!(
            "  {} {} ROMs",
            system.if_supports_color(Stdout, |t| t.bold()),
            records.len(),
        );
    }
    log::info!("");
    log::info!("Total: {} ROMs", index.len());
    Ok(())
}

/// Delete the cache file.
pub(crate) fn run_cache_clear(settings: &Settings) -> Result<(), CliError> {
    let index = ContentIndex::new(&settings.cache_path);
    if index.clear_cache()? {
        log::info!(
            "{} Cache cleared ({})",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            settings.cache_path.display(),
        );
    } else {
        log::info!(
            "{}",
            "No cache to clear.".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Print the cache file path.
pub(crate) fn run_cache_path(settings: &Settings) {
    log::info!("{}", settings.cache_path.display());
}
