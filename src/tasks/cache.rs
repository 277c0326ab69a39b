// src/tasks/cache.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::Task;

/// Discovered task lists, keyed by working directory.
///
/// Cloning yields another handle onto the same map, so one cache can be
/// injected into several menu controllers. Entries are written once per
/// directory (only the first successful discovery commits) and never expire
/// on their own; callers evict with [`TaskCache::invalidate`] or
/// [`TaskCache::clear`].
#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    entries: Arc<RwLock<HashMap<PathBuf, Arc<Vec<Task>>>>>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dir: &Path) -> Option<Arc<Vec<Task>>> {
        let entries = self.entries.read().unwrap_or_else(|p| p.into_inner());
        entries.get(dir).cloned()
    }

    /// Store `tasks` for `dir` unless an entry already exists.
    ///
    /// Returns the list now held by the cache: the fresh one if this call
    /// committed, otherwise the entry that won earlier.
    pub fn insert_if_absent(&self, dir: &Path, tasks: Vec<Task>) -> Arc<Vec<Task>> {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        entries
            .entry(dir.to_path_buf())
            .or_insert_with(|| {
                debug!(dir = ?dir, count = tasks.len(), "caching discovered tasks");
                Arc::new(tasks)
            })
            .clone()
    }

    /// Drop the entry for `dir`, forcing the next load to rediscover.
    pub fn invalidate(&self, dir: &Path) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        let removed = entries.remove(dir).is_some();
        if removed {
            debug!(dir = ?dir, "invalidated cached tasks");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
