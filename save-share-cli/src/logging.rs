//! Logger setup.
//!
//! All user-facing output goes through the `log` macros so `--quiet` and
//! `--logfile` apply to everything. Info lines print bare; warnings and
//! errors get a level prefix; `--verbose` adds timestamps and debug lines.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};

use crate::error::CliError;

/// Writes to stdout and appends an ANSI-stripped copy to a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(&strip_ansi_escapes::strip(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Level for this crate family given the global flags.
pub(crate) fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. `SAVE_SHARE_LOG` may add env_logger directives.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("save_share", level_for(quiet, verbose))
        .parse_env(env_logger::Env::new().filter("SAVE_SHARE_LOG"))
        .format(move |buf, record| {
            if verbose {
                writeln!(
                    buf,
                    "{} {:<5} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.args()
                )
            } else {
                match record.level() {
                    Level::Info => writeln!(buf, "{}", record.args()),
                    Level::Warn => writeln!(buf, "warning: {}", record.args()),
                    Level::Error => writeln!(buf, "error: {}", record.args()),
                    Level::Debug | Level::Trace => {
                        writeln!(buf, "[{}] {}", record.level(), record.args())
                    }
                }
            }
        });

    let mut file_error = None;
    match logfile.map(|p| (p, open_log_file(p))) {
        Some((_, Ok(file))) => {
            builder.target(Target::Pipe(Box::new(Tee { file })));
        }
        Some((path, Err(e))) => {
            file_error = Some(format!("Cannot open log file {}: {e}", path.display()));
            builder.target(Target::Stdout);
        }
        None => {
            builder.target(Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::logging(e.to_string()))?;

    if let Some(msg) = file_error {
        log::warn!("{msg}");
    }
    Ok(())
}
