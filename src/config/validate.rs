// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TaskdeckError};
use crate::tasks::parser::is_valid_task_name;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TaskdeckError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

pub fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_gradle(cfg)?;
    validate_menu(cfg)?;
    validate_output(cfg)?;
    Ok(())
}

fn validate_gradle(cfg: &RawConfigFile) -> Result<()> {
    let wrapper = cfg.gradle.wrapper.trim();
    if wrapper.is_empty() {
        return Err(TaskdeckError::ConfigError(
            "[gradle].wrapper must not be empty".to_string(),
        ));
    }
    if wrapper.contains('/') || wrapper.contains('\\') {
        return Err(TaskdeckError::ConfigError(format!(
            "[gradle].wrapper must be a file name in the project directory, got '{}'",
            wrapper
        )));
    }
    if cfg.gradle.discovery_args.is_empty() {
        return Err(TaskdeckError::ConfigError(
            "[gradle].discovery_args must contain at least one argument".to_string(),
        ));
    }
    Ok(())
}

fn validate_menu(cfg: &RawConfigFile) -> Result<()> {
    let Some(curated) = cfg.menu.curated.as_ref() else {
        return Ok(());
    };

    let mut seen = HashSet::new();
    for base in curated {
        if !is_valid_task_name(base) || base.contains(':') {
            return Err(TaskdeckError::ConfigError(format!(
                "[menu].curated entry '{}' is not a plain task name",
                base
            )));
        }
        if !seen.insert(base.as_str()) {
            return Err(TaskdeckError::ConfigError(format!(
                "[menu].curated lists '{}' more than once",
                base
            )));
        }
    }
    Ok(())
}

fn validate_output(cfg: &RawConfigFile) -> Result<()> {
    if cfg.output.window_size == 0 {
        return Err(TaskdeckError::ConfigError(
            "[output].window_size must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
