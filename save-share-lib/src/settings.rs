//! Application settings.
//!
//! Every field resolves through the same chain: environment variable, then
//! the TOML config file (`~/.config/save-share/config.toml` unless a path is
//! given), then the built-in default for a KNULLI handheld.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

pub const DEFAULT_ROMS_PATH: &str = "/userdata/roms";
pub const DEFAULT_SAVES_PATH: &str = "/userdata/saves";
pub const DEFAULT_CACHE_PATH: &str = "/userdata/system/configs/save-share/cache.json";
pub const DEFAULT_LOG_PATH: &str = "/userdata/system/logs/save-share.log";
pub const DEFAULT_DEVICE_NICKNAME: &str = "knulli-user";
pub const DEFAULT_BUCKET: &str = "saves";

/// Values written by [`write_example`]; treated as unset by [`Settings::remote`].
const PLACEHOLDER_URL: &str = "https://your-project.supabase.co";
const PLACEHOLDER_KEY: &str = "public-anon-key";

pub const ENV_ROMS_PATH: &str = "SAVE_SHARE_ROMS_PATH";
pub const ENV_SAVES_PATH: &str = "SAVE_SHARE_SAVES_PATH";
pub const ENV_CACHE_PATH: &str = "SAVE_SHARE_CACHE_PATH";
pub const ENV_LOG_PATH: &str = "SAVE_SHARE_LOG_PATH";
pub const ENV_DEVICE: &str = "SAVE_SHARE_DEVICE";
pub const ENV_REMOTE_URL: &str = "SAVE_SHARE_REMOTE_URL";
pub const ENV_REMOTE_KEY: &str = "SAVE_SHARE_REMOTE_KEY";

/// Canonical config file path: `<config dir>/save-share/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("save-share").join("config.toml"))
}

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    EnvVar(&'static str),
    ConfigFile,
    Default,
    Missing,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${var}"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each resolved setting.
#[derive(Debug, Clone)]
pub struct SettingSources {
    pub roms_path: SettingSource,
    pub saves_path: SettingSource,
    pub cache_path: SettingSource,
    pub log_path: SettingSource,
    pub device_nickname: SettingSource,
    pub remote_url: SettingSource,
    pub remote_key: SettingSource,
    pub bucket: SettingSource,
}

/// Connection details for the remote save store, validated by
/// [`Settings::remote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub url: String,
    pub api_key: String,
    pub bucket: String,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub roms_path: PathBuf,
    pub saves_path: PathBuf,
    pub cache_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub device_nickname: String,
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
    pub bucket: String,
    /// Config file that was consulted, whether or not it existed.
    pub config_file: Option<PathBuf>,
    pub sources: SettingSources,
}

/// TOML config file format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    roms_path: Option<PathBuf>,
    saves_path: Option<PathBuf>,
    cache_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    device_nickname: Option<String>,
    remote: Option<RemoteSection>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RemoteSection {
    url: Option<String>,
    api_key: Option<String>,
    bucket: Option<String>,
}

impl Settings {
    /// Load settings from the process environment and the config file at
    /// `path` (or [`config_path`] when `None`).
    ///
    /// A missing config file is fine; one that is not valid TOML is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, |var| std::env::var(var).ok())
    }

    /// [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let config_file = path.map(Path::to_path_buf).or_else(config_path);
        let file = match &config_file {
            Some(p) => read_config_file(p)?,
            None => None,
        };
        Ok(Self::resolve(config_file, file.unwrap_or_default(), env))
    }

    fn resolve(
        config_file: Option<PathBuf>,
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let lookup = |var: &str| env(var).filter(|v| !v.trim().is_empty());
        let remote = file.remote.unwrap_or_default();

        let (roms_path, roms_src) = pick_path(
            lookup(ENV_ROMS_PATH),
            ENV_ROMS_PATH,
            file.roms_path,
            Some(DEFAULT_ROMS_PATH),
        );
        let (saves_path, saves_src) = pick_path(
            lookup(ENV_SAVES_PATH),
            ENV_SAVES_PATH,
            file.saves_path,
            Some(DEFAULT_SAVES_PATH),
        );
        let (cache_path, cache_src) = pick_path(
            lookup(ENV_CACHE_PATH),
            ENV_CACHE_PATH,
            file.cache_path,
            Some(DEFAULT_CACHE_PATH),
        );
        let (log_path, log_src) = pick_path(lookup(ENV_LOG_PATH), ENV_LOG_PATH, file.log_path, None);
        let (device_nickname, device_src) = pick(
            lookup(ENV_DEVICE),
            ENV_DEVICE,
            file.device_nickname,
            Some(DEFAULT_DEVICE_NICKNAME),
        );
        let (remote_url, url_src) = pick(lookup(ENV_REMOTE_URL), ENV_REMOTE_URL, remote.url, None);
        let (remote_key, key_src) = pick(lookup(ENV_REMOTE_KEY), ENV_REMOTE_KEY, remote.api_key, None);
        let (bucket, bucket_src) = match remote.bucket.filter(|b| !b.trim().is_empty()) {
            Some(b) => (b, SettingSource::ConfigFile),
            None => (DEFAULT_BUCKET.to_string(), SettingSource::Default),
        };

        Self {
            // Paths with a default are always resolved.
            roms_path: roms_path.unwrap_or_default(),
            saves_path: saves_path.unwrap_or_default(),
            cache_path: cache_path.unwrap_or_default(),
            log_path,
            device_nickname: device_nickname.unwrap_or_default(),
            remote_url,
            remote_key,
            bucket,
            config_file,
            sources: SettingSources {
                roms_path: roms_src,
                saves_path: saves_src,
                cache_path: cache_src,
                log_path: log_src,
                device_nickname: device_src,
                remote_url: url_src,
                remote_key: key_src,
                bucket: bucket_src,
            },
        }
    }

    /// Remote connection details, or an error naming what is still unset.
    pub fn remote(&self) -> Result<RemoteSettings, SettingsError> {
        let url = self
            .remote_url
            .as_deref()
            .filter(|u| *u != PLACEHOLDER_URL)
            .ok_or_else(|| {
                SettingsError::missing(format!(
                    "remote URL. Set {ENV_REMOTE_URL} or [remote] url in the config file"
                ))
            })?;
        let api_key = self
            .remote_key
            .as_deref()
            .filter(|k| *k != PLACEHOLDER_KEY)
            .ok_or_else(|| {
                SettingsError::missing(format!(
                    "remote API key. Set {ENV_REMOTE_KEY} or [remote] api_key in the config file"
                ))
            })?;
        Ok(RemoteSettings {
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            bucket: self.bucket.clone(),
        })
    }

    /// Log file to use: the configured one, or the default location when its
    /// parent folder exists.
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        if let Some(p) = &self.log_path {
            return Some(p.clone());
        }
        let default = PathBuf::from(DEFAULT_LOG_PATH);
        default
            .parent()
            .filter(|parent| parent.is_dir())
            .map(|_| default.clone())
    }
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>, SettingsError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No config file at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(SettingsError::io(path, e)),
    };
    let file = toml::from_str(&contents).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::debug!("Loaded config file {}", path.display());
    Ok(Some(file))
}

fn pick(
    env_value: Option<String>,
    var: &'static str,
    file_value: Option<String>,
    default: Option<&str>,
) -> (Option<String>, SettingSource) {
    if let Some(v) = env_value {
        (Some(v), SettingSource::EnvVar(var))
    } else if let Some(v) = file_value.filter(|v| !v.trim().is_empty()) {
        (Some(v), SettingSource::ConfigFile)
    } else if let Some(d) = default {
        (Some(d.to_string()), SettingSource::Default)
    } else {
        (None, SettingSource::Missing)
    }
}

fn pick_path(
    env_value: Option<String>,
    var: &'static str,
    file_value: Option<PathBuf>,
    default: Option<&str>,
) -> (Option<PathBuf>, SettingSource) {
    let file_value = file_value.map(|p| p.to_string_lossy().into_owned());
    let (value, source) = pick(env_value, var, file_value, default);
    (value.map(PathBuf::from), source)
}

/// Write a config file holding the defaults and placeholder remote values.
///
/// Parent folders are created. An existing file is replaced.
pub fn write_example(path: &Path) -> Result<(), SettingsError> {
    let example = ConfigFile {
        roms_path: Some(PathBuf::from(DEFAULT_ROMS_PATH)),
        saves_path: Some(PathBuf::from(DEFAULT_SAVES_PATH)),
        cache_path: Some(PathBuf::from(DEFAULT_CACHE_PATH)),
        log_path: Some(PathBuf::from(DEFAULT_LOG_PATH)),
        device_nickname: Some(DEFAULT_DEVICE_NICKNAME.to_string()),
        remote: Some(RemoteSection {
            url: Some(PLACEHOLDER_URL.to_string()),
            api_key: Some(PLACEHOLDER_KEY.to_string()),
            bucket: Some(DEFAULT_BUCKET.to_string()),
        }),
    };
    let serialized = toml::to_string_pretty(&example)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, serialized).map_err(|e| SettingsError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| SettingsError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
