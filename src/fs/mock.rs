// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory filesystem keyed by full path.
///
/// Directories are implied by the files added beneath them.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();

        {
            let mut dirs = lock(&self.dirs);
            for ancestor in path.ancestors().skip(1) {
                if ancestor.as_os_str().is_empty() {
                    break;
                }
                dirs.insert(ancestor.to_path_buf());
            }
        }

        lock(&self.files).insert(path, content.into());
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        lock(&self.files).remove(path.as_ref());
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = lock(&self.files);
        match files.get(path) {
            Some(content) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            None if lock(&self.dirs).contains(path) => {
                Err(anyhow!("Is a directory: {:?}", path))
            }
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        lock(&self.files).contains_key(path) || lock(&self.dirs).contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        lock(&self.files).contains_key(path)
    }
}
