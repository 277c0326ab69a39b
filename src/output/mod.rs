// src/output/mod.rs

//! Captured task output.
//!
//! - [`decoder`] turns raw pipe reads into complete lines.
//! - [`scroll`] keeps the growing line list and the visible window over it.

pub mod decoder;
pub mod scroll;

pub use decoder::LineDecoder;
pub use scroll::{ActionOutput, ScrollBuffer};
