use thiserror::Error;

use save_share_lib::{CatalogError, IndexError, SettingsError};
use save_share_remote::RemoteError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Index(#[from] IndexError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// No scanned save or remote save matches what the user asked for
    #[error("Unknown save: {0}")]
    UnknownSave(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Logger setup failed
    #[error("Logging error: {0}")]
    Logging(String),
}

impl CliError {
    pub(crate) fn unknown_save(msg: impl Into<String>) -> Self {
        Self::UnknownSave(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
