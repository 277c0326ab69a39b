mod common;
use crate::common::{init_tracing, SAMPLE_LISTING};

use proptest::prelude::*;

use taskdeck::tasks::parser::is_valid_task_name;
use taskdeck::tasks::{normalize_task_name, parse_task_listing, sorted_by_name, Task};

#[test]
fn normalize_restores_leading_colon_only_for_paths() {
    assert_eq!(normalize_task_name(":app:build"), ":app:build");
    assert_eq!(normalize_task_name("app:build"), ":app:build");
    assert_eq!(normalize_task_name("build"), "build");
    assert_eq!(normalize_task_name("  lib:core:test  "), ":lib:core:test");
}

#[test]
fn parses_tasks_and_skips_section_headers() {
    init_tracing();

    let tasks = parse_task_listing(
        "assembleDebug - Builds the app\n:app:test - runs tests\n> Other tasks\n",
    );

    assert_eq!(
        tasks,
        vec![
            Task::new("assembleDebug", "Builds the app"),
            Task::new(":app:test", "runs tests"),
        ]
    );
}

#[test]
fn ignores_banner_lines_and_keeps_first_duplicate() {
    init_tracing();

    let tasks = parse_task_listing(SAMPLE_LISTING);
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();

    assert_eq!(
        names,
        vec!["assemble", ":app:assembleDebug", ":app:test", "clean", "lint"]
    );

    let debug = tasks
        .iter()
        .find(|t| t.name == ":app:assembleDebug")
        .expect("assembleDebug must be parsed");
    assert_eq!(debug.description, "Assembles main output for variant debug");
}

#[test]
fn handles_crlf_and_blank_only_input() {
    let tasks = parse_task_listing("clean - Deletes outputs\r\n\r\n   \r\nbuild - Builds\r\n");
    assert_eq!(
        tasks,
        vec![Task::new("clean", "Deletes outputs"), Task::new("build", "Builds")]
    );

    assert!(parse_task_listing("").is_empty());
    assert!(parse_task_listing("\n\n> Task :tasks\n").is_empty());
}

#[test]
fn lines_without_separator_are_not_tasks() {
    let tasks = parse_task_listing("Build tasks\n-----------\nrules: none\nfoo -bar\n");
    assert!(tasks.is_empty(), "unexpected tasks: {tasks:?}");
}

#[test]
fn sorted_view_orders_by_name_without_touching_input() {
    let tasks = parse_task_listing(SAMPLE_LISTING);
    let sorted = sorted_by_name(&tasks);

    let names: Vec<&str> = sorted.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![":app:assembleDebug", ":app:test", "assemble", "clean", "lint"]
    );
    assert_eq!(tasks[0].name, "assemble", "discovery order must be preserved");
}

#[test]
fn task_name_validation() {
    assert!(is_valid_task_name("assembleDebug"));
    assert!(is_valid_task_name(":app:connected-test_2"));
    assert!(!is_valid_task_name(""));
    assert!(!is_valid_task_name("has space"));
    assert!(!is_valid_task_name("dots.are.not.allowed"));
}

fn task_line() -> impl Strategy<Value = (String, String)> {
    ("[a-z]{1,6}(:[a-z]{1,6}){0,2}", "[A-Za-z][A-Za-z ]{0,20}")
}

proptest! {
    #[test]
    fn parsed_names_are_unique_and_normalized(
        lines in proptest::collection::vec(task_line(), 0..20)
    ) {
        let raw: String = lines
            .iter()
            .map(|(name, desc)| format!("{name} - {desc}\n"))
            .collect();

        let tasks = parse_task_listing(&raw);

        let mut names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(before, names.len());

        for task in &tasks {
            prop_assert!(!task.name.contains(':') || task.name.starts_with(':'));
            prop_assert!(!task.description.is_empty());
        }
    }
}
