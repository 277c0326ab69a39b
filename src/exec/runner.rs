// src/exec/runner.rs

//! Streaming task runner.
//!
//! Runs `<wrapper> <task>` in the project directory and feeds both output
//! streams into a [`ScrollBuffer`] as lines complete. At most one run is
//! active per runner; a second `run` while one is in flight is rejected.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::detect::ProjectDetector;
use crate::errors::{Result, TaskdeckError};
use crate::events::{UpdateEvent, UpdateNotifier};
use crate::exec::launcher::ProcessLauncher;
use crate::exec::RunState;
use crate::output::{ActionOutput, LineDecoder, ScrollBuffer};

/// Shown when the directory is not runnable.
pub const NOT_RUNNABLE_MESSAGE: &str =
    "Cannot run task: this is not an Android project or the Gradle wrapper is missing. \
     Run taskdeck from a directory containing settings.gradle and gradlew.";

/// Appended to the output when the user cancels a run.
pub const CANCELLED_MARKER: &str = "Task cancelled";

/// Appended when the process died from a signal instead of exiting.
pub const SIGNALLED_MESSAGE: &str = "Error: process terminated by a signal";

/// How long to keep draining pipes after the process has exited.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Wrapper script name, resolved inside the working directory.
    pub wrapper: String,
    pub window_size: usize,
}

#[derive(Debug)]
struct RunnerInner {
    state: RunState,
    buffer: ScrollBuffer,
    exit_code: Option<i32>,
    task: Option<String>,
    /// Bumped on every run and reset; stale drains compare against it.
    run_id: u64,
    cancel: Option<oneshot::Sender<()>>,
}

impl RunnerInner {
    fn is_live(&self, run_id: u64) -> bool {
        self.run_id == run_id && self.state == RunState::Running
    }
}

/// Executes Gradle tasks and owns their output.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cwd: PathBuf,
    wrapper: String,
    detector: ProjectDetector,
    launcher: Arc<dyn ProcessLauncher>,
    notifier: UpdateNotifier,
    inner: Arc<Mutex<RunnerInner>>,
}

impl ProcessRunner {
    pub fn new(
        cwd: impl Into<PathBuf>,
        options: RunnerOptions,
        detector: ProjectDetector,
        launcher: Arc<dyn ProcessLauncher>,
        notifier: UpdateNotifier,
    ) -> Self {
        Self {
            cwd: cwd.into(),
            wrapper: options.wrapper,
            detector,
            launcher,
            notifier,
            inner: Arc::new(Mutex::new(RunnerInner {
                state: RunState::Idle,
                buffer: ScrollBuffer::new(options.window_size),
                exit_code: None,
                task: None,
                run_id: 0,
                cancel: None,
            })),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn notifier(&self) -> &UpdateNotifier {
        &self.notifier
    }

    pub fn state(&self) -> RunState {
        self.lock().state
    }

    /// Task of the current (or last) run.
    pub fn current_task(&self) -> Option<String> {
        self.lock().task.clone()
    }

    pub fn output(&self) -> ActionOutput {
        let inner = self.lock();
        ActionOutput {
            lines: inner.buffer.lines().to_vec(),
            scroll_offset: inner.buffer.scroll_offset(),
            exit_code: inner.exit_code,
        }
    }

    /// Lines from index `start` onwards, for incremental printing.
    pub fn lines_since(&self, start: usize) -> Vec<String> {
        let inner = self.lock();
        inner.buffer.lines().get(start..).unwrap_or_default().to_vec()
    }

    pub fn visible_lines(&self) -> Vec<String> {
        self.lock().buffer.visible().to_vec()
    }

    pub fn window_size(&self) -> usize {
        self.lock().buffer.window_size()
    }

    /// Run `task` to completion, streaming its output.
    ///
    /// Failures (not a project, spawn errors, non-zero exit, cancellation)
    /// end in [`RunState::Error`] and are returned as `Ok`. The only `Err`
    /// is [`TaskdeckError::RunInProgress`].
    pub async fn run(&self, task: &str) -> Result<RunState> {
        let runnable = self.detector.is_runnable(&self.cwd, &self.wrapper);

        let (run_id, cancel_rx) = {
            let mut inner = self.lock();
            if inner.state == RunState::Running {
                let running = inner.task.clone().unwrap_or_default();
                warn!(task = %task, running = %running, "rejecting run; another task is running");
                return Err(TaskdeckError::RunInProgress(running));
            }

            inner.run_id += 1;
            inner.buffer.clear();
            inner.exit_code = None;
            inner.task = Some(task.to_string());

            if !runnable {
                inner.buffer.push(NOT_RUNNABLE_MESSAGE, true);
                inner.exit_code = Some(1);
                inner.state = RunState::Error;
                inner.cancel = None;
                drop(inner);

                warn!(task = %task, cwd = ?self.cwd, "refusing to run outside a Gradle project");
                self.notifier.notify(UpdateEvent::OutputReset);
                self.notifier.notify(UpdateEvent::OutputAppended { total_lines: 1 });
                self.notifier.notify(UpdateEvent::RunStateChanged(RunState::Error));
                return Ok(RunState::Error);
            }

            let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
            inner.cancel = Some(cancel_tx);
            inner.state = RunState::Running;
            (inner.run_id, cancel_rx)
        };

        self.notifier.notify(UpdateEvent::OutputReset);
        self.notifier
            .notify(UpdateEvent::RunStateChanged(RunState::Running));

        info!(task = %task, run_id, cwd = ?self.cwd, "starting task");

        let program = self.cwd.join(&self.wrapper);
        let args = [task.to_string()];
        let mut child = match self.launcher.spawn(&self.cwd, &program, &args) {
            Ok(child) => child,
            Err(err) => {
                error!(task = %task, run_id, error = %err, "failed to start task");
                self.finish(run_id, Some(1), Some(format!("Error: {err:#}")));
                return Ok(self.state());
            }
        };

        let mut drains: Vec<JoinHandle<()>> = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            drains.push(self.spawn_drain(stdout, run_id, "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            drains.push(self.spawn_drain(stderr, run_id, "stderr"));
        }

        let mut cancel_rx = cancel_rx;
        tokio::select! {
            status = child.wait() => {
                join_drains(drains).await;
                match status {
                    Ok(status) => {
                        info!(
                            task = %task,
                            run_id,
                            exit_code = ?status.code(),
                            success = status.success(),
                            "task process exited"
                        );
                        let code = status.code();
                        let line = (!status.success() && code.is_none())
                            .then(|| SIGNALLED_MESSAGE.to_string());
                        self.finish_with_status(run_id, code, status.success(), line);
                    }
                    Err(err) => {
                        error!(task = %task, run_id, error = %err, "waiting for task failed");
                        self.finish(run_id, Some(1), Some(format!("Error: {err}")));
                    }
                }
            }

            cancel = &mut cancel_rx => {
                match cancel {
                    Ok(()) => {
                        info!(task = %task, run_id, "cancellation requested; killing process");
                    }
                    Err(_) => {
                        debug!(task = %task, run_id, "cancel handle dropped; killing process");
                    }
                }
                if let Err(e) = child.kill().await {
                    debug!(task = %task, run_id, error = %e, "kill failed; process likely exited");
                }
                join_drains(drains).await;
            }
        }

        Ok(self.state())
    }

    /// Stop the running task.
    ///
    /// Returns `false` when nothing was running.
    pub fn cancel(&self) -> bool {
        let total_lines = {
            let mut inner = self.lock();
            if inner.state != RunState::Running {
                return false;
            }
            let Some(cancel) = inner.cancel.take() else {
                return false;
            };
            if cancel.send(()).is_err() {
                debug!("task already finished while cancelling");
            }
            inner.buffer.push(CANCELLED_MARKER, true);
            inner.state = RunState::Error;
            inner.buffer.len()
        };

        info!(task = ?self.current_task(), "task cancelled");
        self.notifier
            .notify(UpdateEvent::OutputAppended { total_lines });
        self.notifier
            .notify(UpdateEvent::RunStateChanged(RunState::Error));
        true
    }

    /// Back to idle with empty output. A still-running process is killed.
    pub fn reset(&self) {
        {
            let mut inner = self.lock();
            if let Some(cancel) = inner.cancel.take() {
                let _ = cancel.send(());
            }
            inner.run_id += 1;
            inner.state = RunState::Idle;
            inner.buffer.clear();
            inner.exit_code = None;
            inner.task = None;
        }
        debug!(cwd = ?self.cwd, "runner reset");
        self.notifier.notify(UpdateEvent::OutputReset);
        self.notifier
            .notify(UpdateEvent::RunStateChanged(RunState::Idle));
    }

    pub fn scroll_up(&self, n: usize) -> usize {
        self.scroll_with(|buffer| buffer.scroll_up(n))
    }

    pub fn scroll_down(&self, n: usize) -> usize {
        self.scroll_with(|buffer| buffer.scroll_down(n))
    }

    /// Resize the output window (minimum 1). Notifies only on change.
    pub fn set_window_size(&self, n: usize) -> bool {
        let (changed, size) = {
            let mut inner = self.lock();
            let changed = inner.buffer.set_window_size(n);
            (changed, inner.buffer.window_size())
        };
        if changed {
            self.notifier.notify(UpdateEvent::WindowResized(size));
        }
        changed
    }

    fn scroll_with(&self, f: impl FnOnce(&mut ScrollBuffer) -> usize) -> usize {
        let (before, after) = {
            let mut inner = self.lock();
            let before = inner.buffer.scroll_offset();
            (before, f(&mut inner.buffer))
        };
        if before != after {
            self.notifier
                .notify(UpdateEvent::OutputScrolled { offset: after });
        }
        after
    }

    fn spawn_drain<R>(&self, reader: R, run_id: u64, stream: &'static str) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let notifier = self.notifier.clone();
        tokio::spawn(drain_stream(reader, inner, notifier, run_id, stream))
    }

    fn finish(&self, run_id: u64, exit_code: Option<i32>, error_line: Option<String>) {
        self.finish_with_status(run_id, exit_code, false, error_line);
    }

    /// Record the outcome of run `run_id` unless it was cancelled or reset.
    fn finish_with_status(
        &self,
        run_id: u64,
        exit_code: Option<i32>,
        success: bool,
        error_line: Option<String>,
    ) {
        let (state, appended) = {
            let mut inner = self.lock();
            if !inner.is_live(run_id) {
                debug!(run_id, "run already cancelled or reset; ignoring exit");
                return;
            }
            let appended = error_line.map(|line| {
                inner.buffer.push(line, true);
                inner.buffer.len()
            });
            inner.exit_code = exit_code;
            inner.state = if success {
                RunState::Completed
            } else {
                RunState::Error
            };
            inner.cancel = None;
            (inner.state, appended)
        };

        if let Some(total_lines) = appended {
            self.notifier
                .notify(UpdateEvent::OutputAppended { total_lines });
        }
        self.notifier.notify(UpdateEvent::RunStateChanged(state));
    }

    fn lock(&self) -> MutexGuard<'_, RunnerInner> {
        lock_inner(&self.inner)
    }
}

fn lock_inner(inner: &Mutex<RunnerInner>) -> MutexGuard<'_, RunnerInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Read one pipe to EOF, appending completed lines as they arrive.
///
/// Lines are dropped once the run is no longer live (cancelled or reset).
async fn drain_stream<R>(
    mut reader: R,
    inner: Arc<Mutex<RunnerInner>>,
    notifier: UpdateNotifier,
    run_id: u64,
    stream: &'static str,
) where
    R: AsyncRead + Unpin,
{
    let mut decoder = LineDecoder::new();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let lines = decoder.push(&buf[..n]);
                if !append_lines(&inner, &notifier, run_id, lines) {
                    debug!(run_id, stream, "run no longer live; stopping drain");
                    return;
                }
            }
            Err(e) => {
                warn!(run_id, stream, error = %e, "error reading task output");
                break;
            }
        }
    }

    if let Some(tail) = decoder.finish() {
        append_lines(&inner, &notifier, run_id, vec![tail]);
    }
    debug!(run_id, stream, "output stream closed");
}

/// Returns `false` when the run is no longer live.
fn append_lines(
    inner: &Mutex<RunnerInner>,
    notifier: &UpdateNotifier,
    run_id: u64,
    lines: Vec<String>,
) -> bool {
    let total_lines = {
        let mut inner = lock_inner(inner);
        if !inner.is_live(run_id) {
            return false;
        }
        if lines.is_empty() {
            return true;
        }
        inner.buffer.append(lines, true);
        inner.buffer.len()
    };
    notifier.notify(UpdateEvent::OutputAppended { total_lines });
    true
}

async fn join_drains(drains: Vec<JoinHandle<()>>) {
    for handle in drains {
        let abort = handle.abort_handle();
        match tokio::time::timeout(DRAIN_GRACE, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.is_cancelled() => {}
            Ok(Err(e)) => warn!(error = %e, "output drain task failed"),
            Err(_) => {
                // A grandchild still holds the pipe open.
                warn!("output pipe still open after process exit; aborting drain");
                abort.abort();
            }
        }
    }
}
