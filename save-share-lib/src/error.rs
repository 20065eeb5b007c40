use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or persisting the ROM index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Reading a ROM failed part-way; no record is produced for it.
    #[error("Failed to hash {}: {source}", path.display())]
    Hash {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read cache {}: {source}", path.display())]
    CacheRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt cache {}: {source}", path.display())]
    CacheParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write cache {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IndexError {
    pub fn hash(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Hash {
            path: path.into(),
            source,
        }
    }

    pub fn cache_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheWrite {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur while loading or writing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Missing setting: {0}")]
    Missing(String),
}

impl SettingsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        Self::Missing(msg.into())
    }
}
