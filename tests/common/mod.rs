#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use taskdeck::detect::ProjectDetector;
use taskdeck::events::{UpdateEvent, UpdateNotifier};
use taskdeck::exec::{ProcessLauncher, ProcessRunner, RunState, RunnerOptions, TokioLauncher};
use taskdeck::fs::mock::MockFileSystem;
use tokio::sync::broadcast;

pub use taskdeck_test_utils::{init_tracing, with_timeout};

pub const PROJECT_DIR: &str = "/work/sample";

/// Listing in the shape `gradlew tasks --all --console=plain` prints.
pub const SAMPLE_LISTING: &str = "\
> Task :tasks

------------------------------------------------------------
Tasks runnable from root project 'sample'
------------------------------------------------------------

Build tasks
-----------
assemble - Assemble main outputs for all the variants.
app:assembleDebug - Assembles main output for variant debug
:app:test - Run unit tests for all variants.
clean - Deletes the build directory.

Verification tasks
------------------
lint - Runs lint on the default variant.
app:assembleDebug - duplicate that must be ignored
";

/// Mock filesystem holding a runnable Android app at [`PROJECT_DIR`].
pub fn mock_android_project() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file(format!("{PROJECT_DIR}/settings.gradle"), "include ':app'\n");
    fs.add_file(
        format!("{PROJECT_DIR}/app/build.gradle"),
        "plugins { id 'com.android.application' }\n",
    );
    fs.add_file(format!("{PROJECT_DIR}/gradlew"), "#!/bin/sh\n");
    fs
}

pub fn detector_for(fs: &MockFileSystem) -> ProjectDetector {
    ProjectDetector::new(Arc::new(fs.clone()))
}

/// Runner over a real directory using real processes.
pub fn real_runner(dir: &Path, window_size: usize) -> ProcessRunner {
    runner_with(dir, window_size, Arc::new(TokioLauncher))
}

pub fn runner_with(
    dir: &Path,
    window_size: usize,
    launcher: Arc<dyn ProcessLauncher>,
) -> ProcessRunner {
    ProcessRunner::new(
        dir,
        RunnerOptions {
            wrapper: "gradlew".to_string(),
            window_size,
        },
        ProjectDetector::default(),
        launcher,
        UpdateNotifier::default(),
    )
}

/// Drop the execute bits from `<dir>/gradlew` so spawning it fails.
#[cfg(unix)]
pub fn make_wrapper_non_executable(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(dir.join("gradlew"), std::fs::Permissions::from_mode(0o644))
}

/// Poll until the runner reports `Running` and has printed at least
/// `min_lines` lines.
pub async fn wait_until_running(runner: &ProcessRunner, min_lines: usize) {
    with_timeout(async {
        loop {
            if runner.state() == RunState::Running && runner.output().lines.len() >= min_lines {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
}

/// Everything currently queued on a subscription.
pub fn drain_events(rx: &mut broadcast::Receiver<UpdateEvent>) -> Vec<UpdateEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
