// src/detect/detector.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::detect::patterns::{
    alias_project_type, build_script_applies, catalog_declares, BUILD_FILES, PLUGINS,
    SETTINGS_FILES, VERSION_CATALOG,
};
use crate::detect::{Confidence, DetectionResult, ProjectType};
use crate::fs::{FileSystem, RealFileSystem};

/// Filesystem heuristic deciding whether a directory is an Android project.
#[derive(Debug, Clone)]
pub struct ProjectDetector {
    fs: Arc<dyn FileSystem>,
}

impl Default for ProjectDetector {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl ProjectDetector {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Probe `dir`.
    ///
    /// Order: settings file, version catalog, then build scripts. The first
    /// plugin match decides the project type; a bare settings file still
    /// counts as a project at medium confidence.
    pub fn detect(&self, dir: &Path) -> DetectionResult {
        let project_root = self.find_project_root(dir);

        if !self.has_settings_file(dir) {
            debug!(dir = ?dir, root = ?project_root, "no settings file; not a project");
            return DetectionResult {
                is_project: false,
                project_type: ProjectType::Unknown,
                confidence: Confidence::High,
                project_root,
            };
        }

        let found = self
            .plugin_from_catalog(dir)
            .or_else(|| self.plugin_from_build_files(dir));

        let result = match found {
            Some(project_type) => DetectionResult {
                is_project: true,
                project_type,
                confidence: Confidence::High,
                project_root,
            },
            None => DetectionResult {
                is_project: true,
                project_type: ProjectType::Unknown,
                confidence: Confidence::Medium,
                project_root,
            },
        };

        debug!(
            dir = ?dir,
            project_type = %result.project_type,
            confidence = %result.confidence,
            "project detection finished"
        );
        result
    }

    /// Walk from `start` towards the filesystem root looking for a settings
    /// file. Returns `None` when no ancestor has one.
    pub fn find_project_root(&self, start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| self.has_settings_file(dir))
            .map(Path::to_path_buf)
    }

    /// Is the wrapper executable present in `dir`?
    pub fn has_wrapper(&self, dir: &Path, wrapper: &str) -> bool {
        self.fs.is_file(&dir.join(wrapper))
    }

    /// Detection plus wrapper check: the gate used before any spawn.
    pub fn is_runnable(&self, dir: &Path, wrapper: &str) -> bool {
        self.detect(dir).is_project && self.has_wrapper(dir, wrapper)
    }

    fn has_settings_file(&self, dir: &Path) -> bool {
        SETTINGS_FILES
            .iter()
            .any(|name| self.fs.is_file(&dir.join(name)))
    }

    fn plugin_from_catalog(&self, dir: &Path) -> Option<ProjectType> {
        let text = self.read_if_exists(&dir.join(VERSION_CATALOG))?;
        PLUGINS
            .iter()
            .find(|(plugin, _)| catalog_declares(&text, plugin))
            .map(|(_, ty)| *ty)
    }

    fn plugin_from_build_files(&self, dir: &Path) -> Option<ProjectType> {
        BUILD_FILES.iter().find_map(|name| {
            let script = self.read_if_exists(&dir.join(name))?;
            PLUGINS
                .iter()
                .find(|(plugin, _)| build_script_applies(&script, plugin))
                .map(|(_, ty)| *ty)
                .or_else(|| alias_project_type(&script))
        })
    }

    fn read_if_exists(&self, path: &Path) -> Option<String> {
        if !self.fs.is_file(path) {
            return None;
        }
        match self.fs.read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(path = ?path, error = %e, "unreadable project file; skipping");
                None
            }
        }
    }
}
