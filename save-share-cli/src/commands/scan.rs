use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use save_share_lib::Settings;

use super::{build_index, kind_label, scan_saves};
use crate::error::CliError;

/// Index the library, then list every save that belongs to an indexed ROM.
pub(crate) fn run_scan(settings: &Settings, hide_progress: bool) -> Result<(), CliError> {
    let index = build_index(settings, hide_progress)?;
    let report = scan_saves(settings, &index);

    log::info!("Detected {} saves/states", report.saves.len());
    for save in &report.saves {
        log::info!(
            "{} | {} | {} | {}",
            save.system.if_supports_color(Stdout, |t| t.cyan()),
            save.title.if_supports_color(Stdout, |t| t.bold()),
            kind_label(save),
            save.path.display(),
        );
    }

    if report.ambiguous > 0 {
        log::warn!(
            "{} save(s) matched several ROMs by name; the first by path was used",
            report.ambiguous
        );
    }
    Ok(())
}
