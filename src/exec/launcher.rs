// src/exec/launcher.rs

//! Pluggable process launcher.
//!
//! The menu controller and the runner talk to a `ProcessLauncher` instead of
//! `tokio::process::Command` directly, so tests can count or script the
//! subprocesses they would otherwise start.
//!
//! - `capture` runs a command to completion and buffers both streams
//!   (task discovery).
//! - `spawn` starts a command with piped stdout/stderr and hands back the
//!   child for streaming (task runs).

use std::fmt::Debug;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::{debug, info};

/// Fully buffered result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

pub trait ProcessLauncher: Send + Sync + Debug {
    /// Run `program args…` in `cwd` and wait for it, buffering all output.
    fn capture<'a>(
        &'a self,
        cwd: &'a Path,
        program: &'a Path,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<CapturedOutput>> + Send + 'a>>;

    /// Start `program args…` in `cwd` with both output streams piped.
    fn spawn(&self, cwd: &Path, program: &Path, args: &[String]) -> Result<Child>;
}

/// Production launcher backed by `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct TokioLauncher;

impl TokioLauncher {
    fn command(cwd: &Path, program: &Path, args: &[String]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl ProcessLauncher for TokioLauncher {
    fn capture<'a>(
        &'a self,
        cwd: &'a Path,
        program: &'a Path,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<CapturedOutput>> + Send + 'a>> {
        Box::pin(async move {
            info!(program = ?program, ?args, cwd = ?cwd, "running command (captured)");

            let output = Self::command(cwd, program, args)
                .output()
                .await
                .with_context(|| format!("running {:?} in {:?}", program, cwd))?;

            let captured = CapturedOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };

            debug!(
                exit_code = ?captured.exit_code,
                stdout_bytes = output.stdout.len(),
                stderr_bytes = output.stderr.len(),
                "captured command finished"
            );
            Ok(captured)
        })
    }

    fn spawn(&self, cwd: &Path, program: &Path, args: &[String]) -> Result<Child> {
        info!(program = ?program, ?args, cwd = ?cwd, "spawning command (streamed)");
        Self::command(cwd, program, args)
            .spawn()
            .with_context(|| format!("spawning {:?} in {:?}", program, cwd))
    }
}
