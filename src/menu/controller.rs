// src/menu/controller.rs

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::detect::ProjectDetector;
use crate::events::{UpdateEvent, UpdateNotifier};
use crate::exec::ProcessLauncher;
use crate::menu::options::{MenuAction, MenuOption, MenuSelection};
use crate::menu::MenuState;
use crate::tasks::curated::DEFAULT_CURATED;
use crate::tasks::{parse_task_listing, resolve_curated, sorted_by_name, Task, TaskCache};

/// Shown instead of a task list outside a Gradle project.
pub const NOT_PROJECT_MESSAGE: &str =
    "Not an Android project: run taskdeck from a directory containing settings.gradle and gradlew";

/// Used when a failed listing printed nothing at all.
pub const DISCOVERY_FAILED_MESSAGE: &str = "Failed to list Gradle tasks";

pub const LOADING_LABEL: &str = "Loading…";
pub const RETRY_LABEL: &str = "Failed — retry";
pub const NO_CURATED_LABEL: &str = "No common tasks found";

/// Controller settings, usually derived from [`ConfigFile`].
#[derive(Debug, Clone)]
pub struct MenuSettings {
    pub wrapper: String,
    pub discovery_args: Vec<String>,
    pub show_toggle: bool,
    pub start_with_all: bool,
    /// Base names of the curated view, in display order.
    pub curated: Vec<String>,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self::from_config(&ConfigFile::default())
    }
}

impl MenuSettings {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let curated = match cfg.menu.curated.as_ref() {
            Some(list) => list.clone(),
            None => DEFAULT_CURATED
                .iter()
                .map(|(base, _)| base.to_string())
                .collect(),
        };

        Self {
            wrapper: cfg.gradle.wrapper.clone(),
            discovery_args: cfg.gradle.discovery_args.clone(),
            show_toggle: cfg.menu.show_toggle,
            start_with_all: cfg.menu.start_with_all,
            curated,
        }
    }
}

#[derive(Debug)]
struct MenuInner {
    state: MenuState,
    message: Option<String>,
    tasks: Arc<Vec<Task>>,
    show_all: bool,
}

/// Drives task discovery for one working directory and exposes the result
/// as menu options.
#[derive(Debug, Clone)]
pub struct TaskMenuController {
    cwd: PathBuf,
    settings: MenuSettings,
    detector: ProjectDetector,
    launcher: Arc<dyn ProcessLauncher>,
    cache: TaskCache,
    notifier: UpdateNotifier,
    inner: Arc<Mutex<MenuInner>>,
    /// Held for the duration of one discovery pass.
    load_lock: Arc<tokio::sync::Mutex<()>>,
    /// Number of finished discovery passes.
    loads_finished: Arc<AtomicU64>,
}

impl TaskMenuController {
    pub fn new(
        cwd: impl Into<PathBuf>,
        settings: MenuSettings,
        detector: ProjectDetector,
        launcher: Arc<dyn ProcessLauncher>,
        cache: TaskCache,
        notifier: UpdateNotifier,
    ) -> Self {
        let show_all = settings.start_with_all;
        Self {
            cwd: cwd.into(),
            settings,
            detector,
            launcher,
            cache,
            notifier,
            inner: Arc::new(Mutex::new(MenuInner {
                state: MenuState::Loading,
                message: None,
                tasks: Arc::new(Vec::new()),
                show_all,
            })),
            load_lock: Arc::new(tokio::sync::Mutex::new(())),
            loads_finished: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn state(&self) -> MenuState {
        self.lock().state
    }

    /// Inline message for the not-project and error states.
    pub fn message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    /// Discovered tasks in discovery order.
    pub fn tasks(&self) -> Arc<Vec<Task>> {
        Arc::clone(&self.lock().tasks)
    }

    pub fn is_showing_all(&self) -> bool {
        self.lock().show_all
    }

    /// Discover tasks for the working directory.
    ///
    /// Single-flight: callers that arrive while a pass is running wait for
    /// it and share its outcome instead of starting another subprocess.
    pub async fn load_tasks(&self) -> MenuState {
        let seen = self.loads_finished.load(Ordering::SeqCst);
        let _guard = self.load_lock.lock().await;

        if self.loads_finished.load(Ordering::SeqCst) != seen {
            debug!(cwd = ?self.cwd, "joined in-flight task discovery");
            return self.state();
        }

        let state = self.discover().await;
        self.loads_finished.fetch_add(1, Ordering::SeqCst);
        state
    }

    async fn discover(&self) -> MenuState {
        self.transition(MenuState::Loading, None, None);

        if let Some(tasks) = self.cache.get(&self.cwd) {
            debug!(cwd = ?self.cwd, count = tasks.len(), "task cache hit");
            return self.transition(MenuState::Ready, None, Some(tasks));
        }

        let detection = self.detector.detect(&self.cwd);
        if !detection.is_project || !self.detector.has_wrapper(&self.cwd, &self.settings.wrapper) {
            let message = match detection.project_root.as_deref() {
                Some(root) if root != self.cwd => format!(
                    "{NOT_PROJECT_MESSAGE} (project root found at {})",
                    root.display()
                ),
                _ => NOT_PROJECT_MESSAGE.to_string(),
            };
            info!(cwd = ?self.cwd, is_project = detection.is_project, "not a runnable Gradle project");
            return self.transition(
                MenuState::NotProject,
                Some(message),
                Some(Arc::new(Vec::new())),
            );
        }

        let program = self.cwd.join(&self.settings.wrapper);
        info!(cwd = ?self.cwd, "discovering Gradle tasks");

        let captured = match self
            .launcher
            .capture(&self.cwd, &program, &self.settings.discovery_args)
            .await
        {
            Ok(captured) => captured,
            Err(err) => {
                warn!(cwd = ?self.cwd, error = %err, "task discovery could not run");
                return self.transition(MenuState::Error, Some(format!("{err:#}")), None);
            }
        };

        if !captured.success() {
            let message = [captured.stderr.trim(), captured.stdout.trim()]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or(DISCOVERY_FAILED_MESSAGE)
                .to_string();
            warn!(
                cwd = ?self.cwd,
                exit_code = ?captured.exit_code,
                "task discovery failed"
            );
            return self.transition(MenuState::Error, Some(message), None);
        }

        let parsed = parse_task_listing(&captured.stdout);
        info!(cwd = ?self.cwd, count = parsed.len(), "discovered Gradle tasks");
        let tasks = self.cache.insert_if_absent(&self.cwd, parsed);
        self.transition(MenuState::Ready, None, Some(tasks))
    }

    /// Options to render for the current state.
    pub fn menu_options(&self) -> Vec<MenuOption> {
        let inner = self.lock();
        match inner.state {
            MenuState::Loading => vec![MenuOption::new(
                LOADING_LABEL,
                "Discovering Gradle tasks",
                MenuAction::NoOp,
            )],
            MenuState::NotProject => vec![MenuOption::new(
                inner.message.clone().unwrap_or_else(|| NOT_PROJECT_MESSAGE.to_string()),
                "",
                MenuAction::NoOp,
            )],
            MenuState::Error => vec![MenuOption::new(
                RETRY_LABEL,
                inner
                    .message
                    .clone()
                    .unwrap_or_else(|| DISCOVERY_FAILED_MESSAGE.to_string()),
                MenuAction::Retry,
            )],
            MenuState::Ready if inner.show_all => self.all_options(&inner.tasks),
            MenuState::Ready => self.curated_options(&inner.tasks),
        }
    }

    fn curated_options(&self, tasks: &[Task]) -> Vec<MenuOption> {
        let mut options: Vec<MenuOption> = resolve_curated(&self.settings.curated, tasks)
            .into_iter()
            .map(|c| {
                let action = MenuAction::RunTask(c.task_name.clone());
                MenuOption::new(c.task_name, c.description, action)
            })
            .collect();

        if options.is_empty() {
            options.push(MenuOption::new(
                NO_CURATED_LABEL,
                "None of the common Android tasks exist here; show all tasks instead",
                MenuAction::NoOp,
            ));
        }

        if self.settings.show_toggle {
            options.push(MenuOption::new(
                format!("Show all tasks ({})", tasks.len()),
                "Browse every task Gradle reported",
                MenuAction::ShowAll,
            ));
        }
        options
    }

    fn all_options(&self, tasks: &[Task]) -> Vec<MenuOption> {
        let mut options: Vec<MenuOption> = sorted_by_name(tasks)
            .into_iter()
            .map(|t| {
                let action = MenuAction::RunTask(t.name.clone());
                MenuOption::new(t.name, t.description, action)
            })
            .collect();

        if self.settings.show_toggle {
            options.push(MenuOption::new(
                "Show common tasks",
                "Back to the curated shortlist",
                MenuAction::ShowCurated,
            ));
        }
        options
    }

    /// Apply a selected entry.
    pub async fn select(&self, action: MenuAction) -> MenuSelection {
        match action {
            MenuAction::ShowAll => {
                self.set_show_all(true);
                MenuSelection::Handled
            }
            MenuAction::ShowCurated => {
                self.set_show_all(false);
                MenuSelection::Handled
            }
            MenuAction::Retry => {
                info!(cwd = ?self.cwd, "retrying task discovery");
                self.load_tasks().await;
                MenuSelection::Handled
            }
            MenuAction::NoOp => MenuSelection::Handled,
            MenuAction::RunTask(name) => MenuSelection::RunTask(name),
        }
    }

    /// Decode a string widget value and apply it.
    pub async fn select_value(&self, value: &str) -> MenuSelection {
        self.select(MenuAction::from_value(value)).await
    }

    fn set_show_all(&self, show_all: bool) {
        {
            let mut inner = self.lock();
            if inner.state != MenuState::Ready {
                debug!(state = %inner.state, "ignoring view toggle outside ready state");
                return;
            }
            if inner.show_all == show_all {
                return;
            }
            inner.show_all = show_all;
        }
        debug!(show_all, "task view toggled");
        self.notifier.notify(UpdateEvent::MenuChanged(MenuState::Ready));
    }

    fn transition(
        &self,
        state: MenuState,
        message: Option<String>,
        tasks: Option<Arc<Vec<Task>>>,
    ) -> MenuState {
        {
            let mut inner = self.lock();
            inner.state = state;
            inner.message = message;
            if let Some(tasks) = tasks {
                inner.tasks = tasks;
            }
        }
        debug!(cwd = ?self.cwd, %state, "menu state changed");
        self.notifier.notify(UpdateEvent::MenuChanged(state));
        state
    }

    fn lock(&self) -> MutexGuard<'_, MenuInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
