//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "save-share")]
#[command(about = "Index a ROM library and share save files between handhelds", long_about = None)]
pub(crate) struct Cli {
    /// Config file to use instead of ~/.config/save-share/config.toml
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Hash every ROM named by the catalogs and refresh the cache
    Index,

    /// Index, then list the save files that belong to indexed ROMs
    Scan,

    /// Upload one local save or save-state
    Upload {
        /// Path of the save file (as listed by `scan`)
        save_path: PathBuf,

        /// Short description shown to other users
        #[arg(short, long, default_value = "")]
        description: String,

        /// Tag to attach; repeat for more. Preset tags match case-insensitively
        #[arg(short, long = "tag", action = ArgAction::Append)]
        tags: Vec<String>,

        /// Emulator core that made a save-state (e.g., snes9x, pcsx_rearmed)
        #[arg(long)]
        core: Option<String>,
    },

    /// List remote saves shared for games in the local library
    Browse,

    /// Download a remote save into the save folder
    Download {
        /// Id of the remote save (as listed by `browse`)
        save_id: String,
    },

    /// Inspect or clear the ROM identity cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show or create the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// Summarize the cached ROM records
    Show,

    /// Delete the cache file
    Clear,

    /// Print the cache file path
    Path,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and where each value came from
    Show,

    /// Print the config file path
    Path,

    /// Write an example config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_upload_collects_repeated_tags() {
        let cli = Cli::try_parse_from([
            "save-share",
            "upload",
            "/userdata/saves/snes/zelda.srm",
            "--tag",
            "Boss",
            "-t",
            "100%",
            "--description",
            "before Ganon",
        ])
        .unwrap();
        match cli.command {
            Commands::Upload {
                save_path,
                description,
                tags,
                core,
            } => {
                assert_eq!(save_path, PathBuf::from("/userdata/saves/snes/zelda.srm"));
                assert_eq!(description, "before Ganon");
                assert_eq!(tags, vec!["Boss", "100%"]);
                assert_eq!(core, None);
            }
            _ => panic!("expected upload"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["save-share", "cache", "show", "--config", "/tmp/c.toml", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config_file, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(
            cli.command,
            Commands::Cache {
                action: CacheAction::Show
            }
        ));
    }
}
