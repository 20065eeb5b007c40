use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use save_share_lib::Settings;

use super::build_index;
use crate::error::CliError;

/// Rebuild the ROM index and print a per-system summary.
pub(crate) fn run_index(settings: &Settings, hide_progress: bool) -> Result<(), CliError> {
    let index = build_index(settings, hide_progress)?;
    for (system, records) in index.by_system() {
        log::info!(
            "  {} {}",
            system.if_supports_color(Stdout, |t| t.bold()),
            format!("{} ROMs", records.len()).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
