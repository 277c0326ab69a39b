use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::process::Child;
use taskdeck::exec::{CapturedOutput, ProcessLauncher, TokioLauncher};

/// A launcher that:
/// - answers `capture` with a scripted result after an optional delay
/// - counts every `capture` and `spawn` call
/// - delegates `spawn` to the real launcher
#[derive(Debug, Clone)]
pub struct CountingLauncher {
    output: Arc<Mutex<CapturedOutput>>,
    delay: Duration,
    captures: Arc<AtomicUsize>,
    spawns: Arc<AtomicUsize>,
    last_capture: Arc<Mutex<Option<(PathBuf, Vec<String>)>>>,
}

impl CountingLauncher {
    pub fn new(output: CapturedOutput) -> Self {
        Self {
            output: Arc::new(Mutex::new(output)),
            delay: Duration::ZERO,
            captures: Arc::new(AtomicUsize::new(0)),
            spawns: Arc::new(AtomicUsize::new(0)),
            last_capture: Arc::new(Mutex::new(None)),
        }
    }

    /// Successful listing printing `stdout`.
    pub fn listing(stdout: &str) -> Self {
        Self::new(CapturedOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn failing(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self::new(CapturedOutput {
            exit_code: Some(exit_code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Change what later `capture` calls return.
    pub fn set_output(&self, output: CapturedOutput) {
        *self.output.lock().unwrap() = output;
    }

    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn spawn_count(&self) -> usize {
        self.spawns.load(Ordering::SeqCst)
    }

    /// Program and arguments of the most recent `capture`.
    pub fn last_capture(&self) -> Option<(PathBuf, Vec<String>)> {
        self.last_capture.lock().unwrap().clone()
    }
}

impl ProcessLauncher for CountingLauncher {
    fn capture<'a>(
        &'a self,
        _cwd: &'a Path,
        program: &'a Path,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<CapturedOutput>> + Send + 'a>> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        *self.last_capture.lock().unwrap() = Some((program.to_path_buf(), args.to_vec()));

        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.output.lock().unwrap().clone())
        })
    }

    fn spawn(&self, cwd: &Path, program: &Path, args: &[String]) -> anyhow::Result<Child> {
        self.spawns.fetch_add(1, Ordering::SeqCst);
        TokioLauncher.spawn(cwd, program, args)
    }
}
