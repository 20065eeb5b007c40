//! save-share CLI
//!
//! Indexes a handheld's ROM library by content hash and shares save files
//! through a remote store.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use save_share_lib::{Settings, SettingsError};

use crate::cli_types::{CacheAction, Cli, Commands, ConfigAction};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    // Settings are loaded before the logger so a configured log file applies
    // from the first line.
    let settings = Settings::load(cli.config_file.as_deref());
    let logfile = cli.logfile.clone().or_else(|| {
        settings
            .as_ref()
            .ok()
            .and_then(Settings::effective_log_path)
    });

    if let Err(e) = logging::init(cli.quiet, cli.verbose, logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, settings) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

/// Dispatch a command. `config path` and `config init` work even when the
/// existing config file is broken.
fn run(cli: &Cli, settings: Result<Settings, SettingsError>) -> Result<(), CliError> {
    let hide_progress = cli.quiet || cli.verbose;
    let config_file = cli.config_file.as_deref();

    match &cli.command {
        Commands::Index => commands::index::run_index(&settings?, hide_progress),
        Commands::Scan => commands::scan::run_scan(&settings?, hide_progress),
        Commands::Upload {
            save_path,
            description,
            tags,
            core,
        } => commands::remote::run_upload(
            &settings?,
            hide_progress,
            save_path,
            description.clone(),
            tags.clone(),
            core.clone(),
        ),
        Commands::Browse => commands::remote::run_browse(&settings?, hide_progress),
        Commands::Download { save_id } => {
            commands::remote::run_download(&settings?, hide_progress, save_id)
        }
        Commands::Cache { action } => match action {
            CacheAction::Show => commands::cache::run_cache_show(&settings?),
            CacheAction::Clear => commands::cache::run_cache_clear(&settings?),
            CacheAction::Path => {
                commands::cache::run_cache_path(&settings?);
                Ok(())
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show(&settings?);
                Ok(())
            }
            ConfigAction::Path => commands::config::run_config_path(config_file),
            ConfigAction::Init { force } => commands::config::run_config_init(config_file, *force),
        },
    }
}
