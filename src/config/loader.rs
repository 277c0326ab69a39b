// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "taskdeck.toml";

/// Load a configuration file and return the raw, unvalidated contents.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the config for a session.
///
/// - An explicit path must exist and be valid.
/// - Otherwise `taskdeck.toml` in `dir` is used when present.
/// - Otherwise built-in defaults apply.
pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    let candidate = default_config_path(dir);
    if candidate.is_file() {
        debug!(path = ?candidate, "loading project config");
        load_and_validate(candidate)
    } else {
        debug!(dir = ?dir, "no config file; using defaults");
        Ok(ConfigFile::default())
    }
}

pub fn default_config_path(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_CONFIG_FILE)
}
