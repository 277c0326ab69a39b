// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `taskdeck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskdeck",
    version,
    about = "Discover and run Gradle tasks of an Android project.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `taskdeck.toml` in the project directory, if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Project directory. Defaults to the current directory.
    #[arg(long, value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKDECK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Report whether the directory is an Android Gradle project.
    Detect,

    /// List runnable tasks (the curated shortlist unless `--all`).
    Tasks {
        /// Show every task Gradle reports, sorted by name.
        #[arg(long)]
        all: bool,
    },

    /// Run a task, streaming its output. Ctrl-C cancels it.
    Run {
        /// Task name or path, e.g. `assembleDebug` or `:app:test`.
        task: String,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
