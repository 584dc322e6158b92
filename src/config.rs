// src/config.rs

//! Operator settings, layered from the command line, the environment, an
//! optional TOML file and built-in defaults (highest precedence first).

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILENAME, DEFAULT_INTERPRETER, DEFAULT_LOG_LEVEL, KUBECONFIG_ENV,
    LOG_LEVELS,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while assembling [`Settings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Could not read settings file '{path}': {source}")]
    Io {
        /// Settings file path.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid TOML or has unknown keys.
    #[error("Failed to parse settings file '{path}': {source}")]
    Parse {
        /// Settings file path.
        path: String,
        /// The TOML decoder's report.
        #[source]
        source: toml::de::Error,
    },
    /// A settings file value names an environment variable that is not set.
    #[error("Failed to expand '{value}' from the settings file: {source}")]
    Expand {
        /// The value as written in the file.
        value: String,
        /// The failed lookup.
        #[source]
        source: shellexpand::LookupError<std::env::VarError>,
    },
    /// The log level is not one executors understand.
    #[error("Unknown log level '{0}'. Expected one of: DEBUG, INFO, WARNING, ERROR.")]
    InvalidLogLevel(String),
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    /// Interpreter for executor scripts.
    pub python: Option<String>,
    /// Kubeconfig path. `~` and `$VAR` are expanded.
    pub kubeconfig: Option<String>,
    /// Default log level.
    pub log_level: Option<String>,
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// `--python` or `VIRTBENCH_PYTHON`.
    pub python: Option<String>,
    /// `--kubeconfig`. Only a leading `~` is expanded; the rest is used verbatim.
    pub kubeconfig: Option<String>,
    /// `--log-level`.
    pub log_level: Option<String>,
    /// `--log-file`.
    pub log_file: Option<String>,
}

/// The effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Program that runs executor scripts.
    pub interpreter: String,
    /// Credential path exported as `KUBECONFIG`, when set.
    pub kubeconfig: Option<String>,
    /// Upper-case verbosity forwarded to executors.
    pub log_level: String,
    /// Global log file override, applied when a workload has none of its own.
    pub log_file: Option<String>,
}

impl Settings {
    /// Layers `overrides` on top of `file`, falling back to built-in defaults.
    pub fn layer(overrides: Overrides, file: FileSettings) -> Result<Self, ConfigError> {
        let interpreter = overrides
            .python
            .or(file.python)
            .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string());

        let kubeconfig = match (overrides.kubeconfig, file.kubeconfig) {
            (Some(path), _) if !path.is_empty() => Some(shellexpand::tilde(&path).into_owned()),
            (Some(_), _) => None,
            (None, Some(path)) if !path.is_empty() => Some(expand(&path)?),
            (None, _) => None,
        };

        let log_level = normalize_log_level(
            overrides
                .log_level
                .as_deref()
                .or(file.log_level.as_deref())
                .unwrap_or(DEFAULT_LOG_LEVEL),
        )?;

        Ok(Self {
            interpreter,
            kubeconfig,
            log_level,
            log_file: overrides.log_file.filter(|f| !f.is_empty()),
        })
    }

    /// Environment variables to add on top of the inherited environment.
    pub fn extra_env(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        if let Some(path) = self.kubeconfig.as_deref().filter(|p| !p.is_empty()) {
            env.insert(KUBECONFIG_ENV.to_string(), path.to_string());
        }
        env
    }
}

/// Returns `<config dir>/virtbench/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}

/// Loads the settings file.
///
/// An explicitly requested file must exist. The default location is optional:
/// if nothing is there, empty settings are returned. The file is never created.
pub fn load_file_settings(explicit: Option<&Path>) -> Result<FileSettings, ConfigError> {
    match explicit {
        Some(path) => read_settings(path),
        None => match default_config_path() {
            Some(path) if path.is_file() => read_settings(&path),
            Some(path) => {
                log::debug!("No settings file at '{}', using defaults.", path.display());
                Ok(FileSettings::default())
            }
            None => {
                log::debug!("No system config directory, using default settings.");
                Ok(FileSettings::default())
            }
        },
    }
}

fn read_settings(path: &Path) -> Result<FileSettings, ConfigError> {
    log::debug!("Loading settings from '{}'", path.display());
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

fn expand(value: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|e| ConfigError::Expand {
            value: value.to_string(),
            source: e,
        })
}

/// Upper-cases `level` and checks it against the levels executors understand.
pub fn normalize_log_level(level: &str) -> Result<String, ConfigError> {
    let upper = level.trim().to_uppercase();
    if LOG_LEVELS.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(ConfigError::InvalidLogLevel(level.to_string()))
    }
}
