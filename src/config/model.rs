// src/config/model.rs

use std::ops::Deref;

use serde::Deserialize;

/// Configuration as read from `taskdeck.toml`, before validation.
///
/// ```toml
/// [gradle]
/// wrapper = "gradlew"
/// discovery_args = ["tasks", "--all", "--console=plain"]
///
/// [menu]
/// show_toggle = true
/// start_with_all = false
/// curated = ["assembleDebug", "test", "lint"]
///
/// [output]
/// window_size = 20
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub gradle: GradleSection,

    #[serde(default)]
    pub menu: MenuSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// Validated configuration. Build one with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    inner: RawConfigFile,
}

impl ConfigFile {
    /// Wrap an already-validated raw config.
    pub(crate) fn new_unchecked(inner: RawConfigFile) -> Self {
        Self { inner }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}

impl Deref for ConfigFile {
    type Target = RawConfigFile;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// `[gradle]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradleSection {
    /// Wrapper script name, looked up in the working directory.
    #[serde(default = "default_wrapper")]
    pub wrapper: String,

    /// Arguments for the "list all tasks" invocation.
    #[serde(default = "default_discovery_args")]
    pub discovery_args: Vec<String>,
}

pub fn default_wrapper() -> String {
    if cfg!(windows) {
        "gradlew.bat".to_string()
    } else {
        "gradlew".to_string()
    }
}

pub fn default_discovery_args() -> Vec<String> {
    ["tasks", "--all", "--console=plain"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for GradleSection {
    fn default() -> Self {
        Self {
            wrapper: default_wrapper(),
            discovery_args: default_discovery_args(),
        }
    }
}

/// `[menu]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuSection {
    /// Offer the curated/all toggle entry.
    #[serde(default = "default_true")]
    pub show_toggle: bool,

    /// Open on the full task list instead of the curated one.
    #[serde(default)]
    pub start_with_all: bool,

    /// Ordered base names replacing the built-in shortlist.
    #[serde(default)]
    pub curated: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

impl Default for MenuSection {
    fn default() -> Self {
        Self {
            show_toggle: true,
            start_with_all: false,
            curated: None,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Visible output lines.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

fn default_window_size() -> usize {
    20
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
        }
    }
}
