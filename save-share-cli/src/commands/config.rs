use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use save_share_lib::Settings;
use save_share_lib::settings::{SettingSource, config_path, write_example};

use crate::error::CliError;

fn mask_value(s: &str) -> String {
    if s.chars().count() <= 2 {
        "****".to_string()
    } else {
        format!("{}****", s.chars().take(2).collect::<String>())
    }
}

/// Config file the command line points at, or the default one.
pub(crate) fn target_path(config_file: Option<&Path>) -> Result<PathBuf, CliError> {
    config_file
        .map(Path::to_path_buf)
        .or_else(config_path)
        .ok_or_else(|| CliError::config("could not determine config directory"))
}

/// Show resolved settings and their sources.
pub(crate) fn run_config_show(settings: &Settings) {
    log::info!(
        "{}",
        "save-share configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &settings.config_file {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let sources = &settings.sources;
    let path_value = |p: &Path| Some(p.display().to_string());
    let fields: [(&str, SettingSource, Option<String>); 8] = [
        ("roms_path", sources.roms_path, path_value(&settings.roms_path)),
        ("saves_path", sources.saves_path, path_value(&settings.saves_path)),
        ("cache_path", sources.cache_path, path_value(&settings.cache_path)),
        (
            "log_path",
            sources.log_path,
            settings.log_path.as_deref().and_then(path_value),
        ),
        (
            "device_nickname",
            sources.device_nickname,
            Some(settings.device_nickname.clone()),
        ),
        ("remote.url", sources.remote_url, settings.remote_url.clone()),
        (
            "remote.api_key",
            sources.remote_key,
            settings.remote_key.as_deref().map(mask_value),
        ),
        ("remote.bucket", sources.bucket, Some(settings.bucket.clone())),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({source})");
        match value {
            Some(v) => {
                log::info!(
                    "  {} {} {}",
                    format!("{name}:").if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                log::info!(
                    "  {} {} {}",
                    format!("{name}:").if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }
}

/// Print the config file path.
pub(crate) fn run_config_path(config_file: Option<&Path>) -> Result<(), CliError> {
    log::info!("{}", target_path(config_file)?.display());
    Ok(())
}

/// Write an example config file.
pub(crate) fn run_config_init(config_file: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = target_path(config_file)?;
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    write_example(&path)?;
    log::info!(
        "{} Wrote {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    log::info!("Edit the [remote] section before using upload, browse or download.");
    Ok(())
}
