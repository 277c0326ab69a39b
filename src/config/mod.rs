// src/config/mod.rs

//! Configuration loading and validation for taskdeck.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate wrapper, menu and output settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default, DEFAULT_CONFIG_FILE};
pub use model::{ConfigFile, GradleSection, MenuSection, OutputSection, RawConfigFile};
pub use validate::validate_raw_config;
