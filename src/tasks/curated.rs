// src/tasks/curated.rs

//! The default shortlist of everyday Android tasks.

use super::Task;

/// Built-in shortlist: base name and the description shown when the
/// discovered task has none.
pub const DEFAULT_CURATED: [(&str, &str); 10] = [
    ("assembleDebug", "Build a debug APK"),
    ("assembleRelease", "Build a release APK"),
    ("installDebug", "Install the debug build on a connected device"),
    ("bundleRelease", "Build a release App Bundle"),
    ("test", "Run unit tests"),
    ("connectedAndroidTest", "Run instrumented tests on a connected device"),
    ("lint", "Run Android lint"),
    ("build", "Assemble and test the project"),
    ("clean", "Delete build outputs"),
    ("dependencies", "Show the dependency tree"),
];

/// A shortlist entry resolved against the discovered tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuratedTask {
    pub base: String,
    /// Name of the discovered task that will actually be run.
    pub task_name: String,
    pub description: String,
}

/// Fallback description for `base`, if it is one of the built-in entries.
pub fn fallback_description(base: &str) -> Option<&'static str> {
    DEFAULT_CURATED
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, desc)| *desc)
}

/// Resolve each base name to the best discovered task.
///
/// Preference: `:app:<base>`, then `app:<base>`, then bare `<base>`. Bases
/// with no match are skipped; order follows `bases`.
pub fn resolve_curated<S: AsRef<str>>(bases: &[S], discovered: &[Task]) -> Vec<CuratedTask> {
    bases
        .iter()
        .filter_map(|base| {
            let base = base.as_ref();
            let candidates = [format!(":app:{base}"), format!("app:{base}"), base.to_string()];

            let task = candidates
                .iter()
                .find_map(|candidate| discovered.iter().find(|t| &t.name == candidate))?;

            let description = if task.description.trim().is_empty() {
                fallback_description(base)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Run {base}"))
            } else {
                task.description.clone()
            };

            Some(CuratedTask {
                base: base.to_string(),
                task_name: task.name.clone(),
                description,
            })
        })
        .collect()
}
