use crate::game::{GameMode, Settings};
use crate::progress::DEFAULT_PROGRESS_FILE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Initial choices in the main menu
    #[serde(default)]
    pub(crate) defaults: Defaults,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Defaults {
    pub(crate) mode: GameMode,
    pub(crate) walls: bool,
}

impl Defaults {
    /// Settings for the main menu to start out with
    pub(crate) fn settings(self) -> Settings {
        Settings::new(self.mode, 1, self.walls)
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which progress is stored
    pub(crate) progress_file: PathBuf,

    /// Path to which log messages are appended.  If not set, nothing is
    /// logged.
    pub(crate) log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            progress_file: PathBuf::from(DEFAULT_PROGRESS_FILE),
            log_file: None,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
