mod common;
use crate::common::{
    detector_for, drain_events, init_tracing, mock_android_project, with_timeout, PROJECT_DIR,
    SAMPLE_LISTING,
};

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use taskdeck::events::{UpdateEvent, UpdateNotifier};
use taskdeck::exec::CapturedOutput;
use taskdeck::fs::mock::MockFileSystem;
use taskdeck::menu::controller::{
    DISCOVERY_FAILED_MESSAGE, LOADING_LABEL, NOT_PROJECT_MESSAGE, NO_CURATED_LABEL, RETRY_LABEL,
};
use taskdeck::menu::{MenuAction, MenuSelection, MenuSettings, MenuState, TaskMenuController};
use taskdeck::tasks::TaskCache;
use taskdeck_test_utils::fake_launcher::CountingLauncher;

type TestResult = Result<(), Box<dyn Error>>;

fn controller(
    fs: &MockFileSystem,
    launcher: &CountingLauncher,
    cache: &TaskCache,
    settings: MenuSettings,
) -> TaskMenuController {
    TaskMenuController::new(
        PROJECT_DIR,
        settings,
        detector_for(fs),
        Arc::new(launcher.clone()),
        cache.clone(),
        UpdateNotifier::default(),
    )
}

fn default_controller(launcher: &CountingLauncher) -> TaskMenuController {
    controller(
        &mock_android_project(),
        launcher,
        &TaskCache::new(),
        MenuSettings::default(),
    )
}

fn labels(controller: &TaskMenuController) -> Vec<String> {
    controller
        .menu_options()
        .into_iter()
        .map(|o| o.label)
        .collect()
}

#[tokio::test]
async fn starts_loading_and_reaches_ready() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::listing(SAMPLE_LISTING);
    let controller = default_controller(&launcher);

    assert_eq!(controller.state(), MenuState::Loading);
    assert_eq!(labels(&controller), vec![LOADING_LABEL.to_string()]);

    let state = controller.load_tasks().await;

    assert_eq!(state, MenuState::Ready);
    assert_eq!(controller.tasks().len(), 5);
    assert_eq!(controller.message(), None);

    let (program, args) = launcher.last_capture().expect("discovery must run");
    assert_eq!(program, PathBuf::from(PROJECT_DIR).join("gradlew"));
    assert_eq!(args, vec!["tasks", "--all", "--console=plain"]);
    Ok(())
}

#[tokio::test]
async fn curated_view_lists_resolved_tasks_then_toggle() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::listing(SAMPLE_LISTING);
    let controller = default_controller(&launcher);
    controller.load_tasks().await;

    let options = controller.menu_options();
    let actions: Vec<MenuAction> = options.iter().map(|o| o.action.clone()).collect();

    assert_eq!(
        actions,
        vec![
            MenuAction::RunTask(":app:assembleDebug".to_string()),
            MenuAction::RunTask(":app:test".to_string()),
            MenuAction::RunTask("lint".to_string()),
            MenuAction::RunTask("clean".to_string()),
            MenuAction::ShowAll,
        ]
    );
    assert_eq!(options[2].description, "Runs lint on the default variant.");
    Ok(())
}

#[tokio::test]
async fn toggling_switches_to_sorted_full_list_and_back() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::listing(SAMPLE_LISTING);
    let controller = default_controller(&launcher);
    controller.load_tasks().await;

    let selection = controller.select(MenuAction::ShowAll).await;
    assert_eq!(selection, MenuSelection::Handled);
    assert!(controller.is_showing_all());

    assert_eq!(
        labels(&controller),
        vec![
            ":app:assembleDebug",
            ":app:test",
            "assemble",
            "clean",
            "lint",
            "Show common tasks",
        ]
    );

    controller.select(MenuAction::ShowCurated).await;
    assert!(!controller.is_showing_all());
    assert_eq!(
        controller.menu_options().last().map(|o| o.action.clone()),
        Some(MenuAction::ShowAll)
    );
    Ok(())
}

#[tokio::test]
async fn toggle_entry_can_be_disabled() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::listing(SAMPLE_LISTING);
    let settings = MenuSettings {
        show_toggle: false,
        ..MenuSettings::default()
    };
    let controller = controller(&mock_android_project(), &launcher, &TaskCache::new(), settings);
    controller.load_tasks().await;

    assert!(controller.menu_options().iter().all(|o| !o.action.is_control()));
    Ok(())
}

#[tokio::test]
async fn no_curated_match_shows_placeholder() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::listing("customA - first\ncustomB - second\n");
    let controller = default_controller(&launcher);
    controller.load_tasks().await;

    let options = controller.menu_options();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].label, NO_CURATED_LABEL);
    assert_eq!(options[0].action, MenuAction::NoOp);
    assert_eq!(options[1].action, MenuAction::ShowAll);
    Ok(())
}

#[tokio::test]
async fn concurrent_loads_spawn_one_discovery() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::listing(SAMPLE_LISTING).with_delay(Duration::from_millis(150));
    let controller = default_controller(&launcher);

    let (a, b) = with_timeout(async { tokio::join!(controller.load_tasks(), controller.load_tasks()) })
        .await;

    assert_eq!(a, MenuState::Ready);
    assert_eq!(b, MenuState::Ready);
    assert_eq!(launcher.capture_count(), 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_failing_loads_share_one_attempt() -> TestResult {
    init_tracing();

    // Failures are never cached, so only single-flight prevents a second run.
    let launcher = CountingLauncher::failing(1, "", "no daemon").with_delay(Duration::from_millis(150));
    let controller = default_controller(&launcher);

    let (a, b, c) = with_timeout(async {
        tokio::join!(
            controller.load_tasks(),
            controller.load_tasks(),
            controller.load_tasks()
        )
    })
    .await;

    assert_eq!((a, b, c), (MenuState::Error, MenuState::Error, MenuState::Error));
    assert_eq!(launcher.capture_count(), 1);
    Ok(())
}

#[tokio::test]
async fn cache_is_shared_across_controllers() -> TestResult {
    init_tracing();

    let fs = mock_android_project();
    let cache = TaskCache::new();
    let launcher = CountingLauncher::listing(SAMPLE_LISTING);

    let first = controller(&fs, &launcher, &cache, MenuSettings::default());
    assert_eq!(first.load_tasks().await, MenuState::Ready);

    let second = controller(&fs, &launcher, &cache, MenuSettings::default());
    assert_eq!(second.load_tasks().await, MenuState::Ready);

    assert_eq!(launcher.capture_count(), 1);
    assert_eq!(second.tasks().len(), 5);
    assert_eq!(cache.len(), 1);

    assert!(cache.invalidate(Path::new(PROJECT_DIR)));
    second.load_tasks().await;
    assert_eq!(launcher.capture_count(), 2);
    Ok(())
}

#[tokio::test]
async fn missing_wrapper_is_not_a_project() -> TestResult {
    init_tracing();

    let fs = mock_android_project();
    fs.remove_file(format!("{PROJECT_DIR}/gradlew"));
    let launcher = CountingLauncher::listing(SAMPLE_LISTING);
    let cache = TaskCache::new();
    let controller = controller(&fs, &launcher, &cache, MenuSettings::default());

    assert_eq!(controller.load_tasks().await, MenuState::NotProject);
    assert_eq!(launcher.capture_count(), 0);
    assert!(controller.tasks().is_empty());
    assert!(cache.is_empty());

    let options = controller.menu_options();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].label, NOT_PROJECT_MESSAGE);
    assert_eq!(options[0].action, MenuAction::NoOp);
    Ok(())
}

#[tokio::test]
async fn subdirectory_message_points_at_project_root() -> TestResult {
    init_tracing();

    let fs = mock_android_project();
    let launcher = CountingLauncher::listing(SAMPLE_LISTING);
    let sub = format!("{PROJECT_DIR}/app");
    let controller = TaskMenuController::new(
        &sub,
        MenuSettings::default(),
        detector_for(&fs),
        Arc::new(launcher.clone()),
        TaskCache::new(),
        UpdateNotifier::default(),
    );

    assert_eq!(controller.load_tasks().await, MenuState::NotProject);
    let message = controller.message().unwrap_or_default();
    assert!(message.starts_with(NOT_PROJECT_MESSAGE));
    assert!(message.contains(PROJECT_DIR), "message: {message}");
    Ok(())
}

#[tokio::test]
async fn failed_listing_surfaces_stderr_and_is_not_cached() -> TestResult {
    init_tracing();

    let fs = mock_android_project();
    let cache = TaskCache::new();
    let launcher = CountingLauncher::failing(2, "some stdout", "  boom\n");
    let controller = controller(&fs, &launcher, &cache, MenuSettings::default());

    assert_eq!(controller.load_tasks().await, MenuState::Error);
    assert_eq!(controller.message().as_deref(), Some("boom"));
    assert!(cache.is_empty());

    let options = controller.menu_options();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].label, RETRY_LABEL);
    assert_eq!(options[0].description, "boom");
    assert_eq!(options[0].action, MenuAction::Retry);
    Ok(())
}

#[tokio::test]
async fn failure_message_falls_back_to_stdout_then_generic() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::failing(1, " only stdout ", "   ");
    let controller = default_controller(&launcher);
    controller.load_tasks().await;
    assert_eq!(controller.message().as_deref(), Some("only stdout"));

    launcher.set_output(CapturedOutput {
        exit_code: Some(1),
        stdout: String::new(),
        stderr: String::new(),
    });
    controller.select(MenuAction::Retry).await;
    assert_eq!(controller.message().as_deref(), Some(DISCOVERY_FAILED_MESSAGE));
    Ok(())
}

#[tokio::test]
async fn retry_after_failure_recovers() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::failing(1, "", "daemon crashed");
    let controller = default_controller(&launcher);
    assert_eq!(controller.load_tasks().await, MenuState::Error);

    launcher.set_output(CapturedOutput {
        exit_code: Some(0),
        stdout: SAMPLE_LISTING.to_string(),
        stderr: String::new(),
    });

    let selection = controller.select_value(&MenuAction::Retry.value()).await;

    assert_eq!(selection, MenuSelection::Handled);
    assert_eq!(controller.state(), MenuState::Ready);
    assert_eq!(controller.message(), None);
    assert_eq!(launcher.capture_count(), 2);
    Ok(())
}

#[tokio::test]
async fn every_transition_is_published_once() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::listing(SAMPLE_LISTING);
    let notifier = UpdateNotifier::default();
    let mut rx = notifier.subscribe();
    let controller = TaskMenuController::new(
        PROJECT_DIR,
        MenuSettings::default(),
        detector_for(&mock_android_project()),
        Arc::new(launcher.clone()),
        TaskCache::new(),
        notifier,
    );

    controller.load_tasks().await;
    controller.select(MenuAction::ShowAll).await;
    controller.select(MenuAction::ShowAll).await;

    assert_eq!(
        drain_events(&mut rx),
        vec![
            UpdateEvent::MenuChanged(MenuState::Loading),
            UpdateEvent::MenuChanged(MenuState::Ready),
            UpdateEvent::MenuChanged(MenuState::Ready),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn task_selection_is_handed_back_to_the_caller() -> TestResult {
    init_tracing();

    let launcher = CountingLauncher::listing(SAMPLE_LISTING);
    let controller = default_controller(&launcher);
    controller.load_tasks().await;

    assert_eq!(
        controller.select_value(":app:test").await,
        MenuSelection::RunTask(":app:test".to_string())
    );
    assert_eq!(
        controller.select_value("__taskdeck:unknown").await,
        MenuSelection::Handled
    );
    assert_eq!(
        controller.select(MenuAction::NoOp).await,
        MenuSelection::Handled
    );
    Ok(())
}

#[test]
fn action_values_round_trip_through_widgets() {
    let actions = [
        MenuAction::ShowAll,
        MenuAction::ShowCurated,
        MenuAction::Retry,
        MenuAction::NoOp,
        MenuAction::RunTask(":app:lint".to_string()),
    ];
    for action in actions {
        assert_eq!(MenuAction::from_value(&action.value()), action);
    }
}
