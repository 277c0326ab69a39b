// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launcher`] provides the `ProcessLauncher` trait and the production
//!   `TokioLauncher`; tests substitute their own launcher.
//! - [`runner`] owns the streaming task runner and its run state machine.

use std::fmt;

pub mod launcher;
pub mod runner;

pub use launcher::{CapturedOutput, ProcessLauncher, TokioLauncher};
pub use runner::{
    CANCELLED_MARKER, NOT_RUNNABLE_MESSAGE, ProcessRunner, RunnerOptions, SIGNALLED_MESSAGE,
};

/// Execution state of a [`ProcessRunner`].
///
/// `Idle -> Running -> Completed | Error -> Idle`. Cancellation ends in
/// `Error`, distinguished only by the marker line in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Error,
}

impl RunState {
    pub fn is_finished(self) -> bool {
        matches!(self, RunState::Completed | RunState::Error)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Error => "error",
        };
        f.write_str(s)
    }
}
