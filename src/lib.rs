// src/lib.rs

pub mod cli;
pub mod config;
pub mod detect;
pub mod errors;
pub mod events;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod menu;
pub mod output;
pub mod tasks;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{load_or_default, ConfigFile};
use crate::detect::ProjectDetector;
use crate::events::{UpdateEvent, UpdateNotifier};
use crate::exec::{ProcessLauncher, ProcessRunner, RunState, RunnerOptions, TokioLauncher};
use crate::menu::{MenuAction, MenuSettings, MenuState, TaskMenuController};
use crate::tasks::TaskCache;

/// Collaborators shared by the menu controller and the runner of one
/// project directory.
#[derive(Debug, Clone)]
pub struct Session {
    pub dir: PathBuf,
    pub config: ConfigFile,
    pub detector: ProjectDetector,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub cache: TaskCache,
    pub notifier: UpdateNotifier,
}

impl Session {
    /// Production wiring: real filesystem, real processes, fresh cache.
    pub fn new(dir: impl Into<PathBuf>, config: ConfigFile) -> Self {
        Self {
            dir: dir.into(),
            config,
            detector: ProjectDetector::default(),
            launcher: Arc::new(TokioLauncher),
            cache: TaskCache::new(),
            notifier: UpdateNotifier::default(),
        }
    }

    pub fn menu_controller(&self) -> TaskMenuController {
        TaskMenuController::new(
            self.dir.clone(),
            MenuSettings::from_config(&self.config),
            self.detector.clone(),
            Arc::clone(&self.launcher),
            self.cache.clone(),
            self.notifier.clone(),
        )
    }

    pub fn runner(&self) -> ProcessRunner {
        ProcessRunner::new(
            self.dir.clone(),
            RunnerOptions {
                wrapper: self.config.gradle.wrapper.clone(),
                window_size: self.config.output.window_size,
            },
            self.detector.clone(),
            Arc::clone(&self.launcher),
            self.notifier.clone(),
        )
    }
}

/// High-level entry point used by `main.rs`. Returns the process exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let dir = resolve_dir(args.dir.as_deref())?;
    let config = load_or_default(args.config.as_deref(), &dir)?;
    debug!(dir = ?dir, ?config, "session configured");

    let session = Session::new(dir, config);

    match args.command {
        Command::Detect => Ok(print_detection(&session)),
        Command::Tasks { all } => Ok(print_tasks(&session, all).await),
        Command::Run { task } => run_streaming(&session, &task).await,
    }
}

fn resolve_dir(dir: Option<&Path>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().context("resolving current directory"),
    }
}

fn print_detection(session: &Session) -> i32 {
    let result = session.detector.detect(&session.dir);
    let wrapper = &session.config.gradle.wrapper;

    println!("directory:   {}", session.dir.display());
    println!("project:     {}", result.is_project);
    println!("type:        {}", result.project_type);
    println!("confidence:  {}", result.confidence);
    match result.project_root {
        Some(ref root) => println!("root:        {}", root.display()),
        None => println!("root:        -"),
    }
    println!(
        "wrapper:     {} ({})",
        wrapper,
        if session.detector.has_wrapper(&session.dir, wrapper) {
            "present"
        } else {
            "missing"
        }
    );

    if result.is_project { 0 } else { 1 }
}

async fn print_tasks(session: &Session, all: bool) -> i32 {
    let controller = session.menu_controller();
    let state = controller.load_tasks().await;

    if all && state == MenuState::Ready {
        controller.select(MenuAction::ShowAll).await;
    }

    for option in controller.menu_options() {
        match option.action {
            MenuAction::RunTask(_) => {
                if option.description.is_empty() {
                    println!("  {}", option.label);
                } else {
                    println!("  {:<36} {}", option.label, option.description);
                }
            }
            _ if option.description.is_empty() => println!("» {}", option.label),
            _ => println!("» {}: {}", option.label, option.description),
        }
    }

    if state == MenuState::Ready { 0 } else { 1 }
}

/// Run one task, echoing output lines as update events arrive.
async fn run_streaming(session: &Session, task: &str) -> Result<i32> {
    let runner = session.runner();
    let mut events = runner.notifier().subscribe();
    let mut printed = 0usize;

    let run = runner.run(task);
    tokio::pin!(run);

    let state = loop {
        tokio::select! {
            res = &mut run => break res?,

            event = events.recv() => match event {
                Ok(UpdateEvent::OutputAppended { .. }) | Err(RecvError::Lagged(_)) => {
                    printed = print_new_lines(&runner, printed);
                }
                Ok(_) => {}
                Err(RecvError::Closed) => {}
            },

            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("failed to listen for Ctrl+C: {e}");
                } else if runner.cancel() {
                    info!(task = %task, "cancelled from keyboard");
                }
            }
        }
    };

    print_new_lines(&runner, printed);

    let output = runner.output();
    info!(task = %task, %state, exit_code = ?output.exit_code, "run finished");

    Ok(match state {
        RunState::Completed => 0,
        _ => output.exit_code.filter(|code| *code != 0).unwrap_or(1),
    })
}

fn print_new_lines(runner: &ProcessRunner, printed: usize) -> usize {
    let lines = runner.lines_since(printed);
    for line in &lines {
        println!("{line}");
    }
    printed + lines.len()
}
