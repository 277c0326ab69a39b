// src/tasks/mod.rs

//! Gradle task discovery data.
//!
//! - [`parser`] turns `tasks --all` output into [`Task`] records.
//! - [`cache`] keeps one parsed list per working directory.
//! - [`curated`] resolves the default shortlist against a discovered list.

pub mod cache;
pub mod curated;
pub mod parser;

pub use cache::TaskCache;
pub use curated::{CuratedTask, resolve_curated};
pub use parser::{normalize_task_name, parse_task_listing};

/// A named, invocable Gradle task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Normalized task path (see [`normalize_task_name`]).
    pub name: String,
    pub description: String,
}

impl Task {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Copy of `tasks` ordered by name, for the "all tasks" view.
pub fn sorted_by_name(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}
