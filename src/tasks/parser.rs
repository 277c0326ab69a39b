// src/tasks/parser.rs

//! Parser for the plain-console output of `gradlew tasks --all`.
//!
//! A task line looks like `assembleDebug - Assembles main output`. Section
//! headers (`> Task :tasks`, `Build tasks`, dashes) either start with `>` or
//! simply fail to match the task pattern.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::Task;

static TASK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9:_-]+)\s+-\s+(.+)$").expect("task line pattern is valid")
});

/// Does `name` look like something Gradle would accept as a task path?
pub fn is_valid_task_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-'))
}

/// Normalize a task name.
///
/// Sub-project paths are always reported with a leading colon; some Gradle
/// versions drop it (`app:build`), so it is restored here.
pub fn normalize_task_name(raw: &str) -> String {
    let name = raw.trim();
    if name.contains(':') && !name.starts_with(':') {
        format!(":{name}")
    } else {
        name.to_string()
    }
}

/// Parse raw listing text into tasks, in discovery order.
///
/// Duplicate names (after normalization) keep their first description.
pub fn parse_task_listing(raw: &str) -> Vec<Task> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut tasks = Vec::new();

    for line in raw.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('>') {
            continue;
        }

        let Some(caps) = TASK_LINE.captures(line) else {
            continue;
        };

        let name = normalize_task_name(&caps[1]);
        if !seen.insert(name.clone()) {
            continue;
        }

        tasks.push(Task {
            name,
            description: caps[2].trim().to_string(),
        });
    }

    debug!(count = tasks.len(), "parsed task listing");
    tasks
}
