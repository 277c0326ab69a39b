// src/detect/mod.rs

//! Project detection.
//!
//! Decides whether a directory is an Android Gradle project that `taskdeck`
//! can drive:
//! - [`patterns`] holds the marker filenames, plugin ids and alias regexes.
//! - [`detector`] walks the marker files in order and produces a
//!   [`DetectionResult`].
//!
//! Results are snapshots; nothing here is cached between calls.

use std::fmt;
use std::path::PathBuf;

pub mod detector;
pub mod patterns;

pub use detector::ProjectDetector;

/// Kind of module the detected Android plugin declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Application,
    Library,
    Unknown,
}

/// Detection heuristic's self-reported certainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    pub is_project: bool,
    pub project_type: ProjectType,
    pub confidence: Confidence,
    /// Nearest directory (the probed one or an ancestor) holding a settings file.
    pub project_root: Option<PathBuf>,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectType::Application => "application",
            ProjectType::Library => "library",
            ProjectType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(s)
    }
}
