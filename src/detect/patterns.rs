// src/detect/patterns.rs

//! Marker files and plugin declarations recognised by the detector.
//!
//! These literals follow common Gradle conventions and must match exactly.

use std::sync::LazyLock;

use regex::Regex;

use super::ProjectType;

pub const SETTINGS_FILES: [&str; 2] = ["settings.gradle", "settings.gradle.kts"];

pub const VERSION_CATALOG: &str = "gradle/libs.versions.toml";

/// Build scripts scanned for plugin declarations, in priority order.
pub const BUILD_FILES: [&str; 4] = [
    "build.gradle",
    "build.gradle.kts",
    "app/build.gradle",
    "app/build.gradle.kts",
];

pub const APPLICATION_PLUGIN: &str = "com.android.application";
pub const LIBRARY_PLUGIN: &str = "com.android.library";
pub const DYNAMIC_FEATURE_PLUGIN: &str = "com.android.dynamic-feature";

/// Plugin ids checked in order, with the project type each one implies.
///
/// A dynamic-feature module only exists inside an application, so it is
/// reported as one.
pub const PLUGINS: [(&str, ProjectType); 3] = [
    (APPLICATION_PLUGIN, ProjectType::Application),
    (LIBRARY_PLUGIN, ProjectType::Library),
    (DYNAMIC_FEATURE_PLUGIN, ProjectType::Application),
];

/// Version-catalog alias references (`alias(libs.plugins.…)`).
static ALIAS_PATTERNS: LazyLock<Vec<(Regex, ProjectType)>> = LazyLock::new(|| {
    [
        (r"alias\(\s*libs\.plugins\.android\.application\s*\)", ProjectType::Application),
        (r"alias\(\s*libs\.plugins\.android\.library\s*\)", ProjectType::Library),
        (
            r"alias\(\s*libs\.plugins\.com\.android\.application\s*\)",
            ProjectType::Application,
        ),
        (r"alias\(\s*libs\.plugins\.com\.android\.library\s*\)", ProjectType::Library),
    ]
    .into_iter()
    .map(|(pattern, ty)| (Regex::new(pattern).expect("alias pattern is valid"), ty))
    .collect()
});

/// Does the version catalog declare `plugin` (`id = "<plugin>"`)?
pub fn catalog_declares(catalog: &str, plugin: &str) -> bool {
    catalog.contains(&format!("id = \"{plugin}\""))
}

/// Does a build script apply `plugin` by literal id?
///
/// Accepts `'<plugin>'`, `"<plugin>"` and `id("<plugin>")`.
pub fn build_script_applies(script: &str, plugin: &str) -> bool {
    script.contains(&format!("'{plugin}'"))
        || script.contains(&format!("\"{plugin}\""))
        || script.contains(&format!("id(\"{plugin}\")"))
}

/// First alias pattern matching the script, if any.
pub fn alias_project_type(script: &str) -> Option<ProjectType> {
    ALIAS_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(script))
        .map(|(_, ty)| *ty)
}
