#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for on-disk Gradle project trees.
pub struct ProjectBuilder {
    files: Vec<(PathBuf, String)>,
    wrapper: Option<String>,
}

/// A project tree living in a temporary directory.
pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            wrapper: None,
        }
    }

    /// Android application project: settings, app plugin and wrapper body.
    pub fn android_app(wrapper_body: &str) -> Self {
        Self::new()
            .settings()
            .file("build.gradle", "plugins {\n    id(\"com.android.application\")\n}\n")
            .wrapper(wrapper_body)
    }

    pub fn settings(self) -> Self {
        self.file("settings.gradle", "rootProject.name = \"sample\"\ninclude ':app'\n")
    }

    pub fn file(mut self, rel: &str, contents: &str) -> Self {
        self.files.push((PathBuf::from(rel), contents.to_string()));
        self
    }

    /// `gradlew` as a `/bin/sh` script with the given body.
    pub fn wrapper(mut self, body: &str) -> Self {
        self.wrapper = Some(body.to_string());
        self
    }

    pub fn build(self) -> TempProject {
        let dir = tempfile::tempdir().expect("creating temp project dir");

        for (rel, contents) in &self.files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("creating project subdir");
            }
            fs::write(&path, contents).expect("writing project file");
        }

        if let Some(body) = &self.wrapper {
            write_script(&dir.path().join("gradlew"), body);
        }

        TempProject { dir }
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("writing wrapper script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).expect("wrapper metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).expect("making wrapper executable");
    }
}
