// src/menu/options.rs

/// Prefix reserving a menu value for control actions.
pub const SENTINEL_PREFIX: &str = "__taskdeck:";

const SHOW_ALL_VALUE: &str = "__taskdeck:show-all";
const SHOW_CURATED_VALUE: &str = "__taskdeck:show-curated";
const RETRY_VALUE: &str = "__taskdeck:retry";
const NOOP_VALUE: &str = "__taskdeck:noop";

/// What selecting a menu entry does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    ShowAll,
    ShowCurated,
    Retry,
    NoOp,
    RunTask(String),
}

impl MenuAction {
    /// String encoding for list widgets that only carry string values.
    pub fn value(&self) -> String {
        match self {
            MenuAction::ShowAll => SHOW_ALL_VALUE.to_string(),
            MenuAction::ShowCurated => SHOW_CURATED_VALUE.to_string(),
            MenuAction::Retry => RETRY_VALUE.to_string(),
            MenuAction::NoOp => NOOP_VALUE.to_string(),
            MenuAction::RunTask(name) => name.clone(),
        }
    }

    /// Decode a widget value.
    ///
    /// Unknown values carrying the sentinel prefix are treated as no-ops,
    /// never as task names.
    pub fn from_value(value: &str) -> Self {
        match value {
            SHOW_ALL_VALUE => MenuAction::ShowAll,
            SHOW_CURATED_VALUE => MenuAction::ShowCurated,
            RETRY_VALUE => MenuAction::Retry,
            NOOP_VALUE => MenuAction::NoOp,
            other if other.starts_with(SENTINEL_PREFIX) => MenuAction::NoOp,
            other => MenuAction::RunTask(other.to_string()),
        }
    }

    pub fn is_control(&self) -> bool {
        !matches!(self, MenuAction::RunTask(_))
    }
}

/// One renderable menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub description: String,
    pub action: MenuAction,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, description: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            action,
        }
    }
}

/// Outcome of selecting an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuSelection {
    /// Control action applied inside the controller.
    Handled,
    /// The UI should hand this task to the runner.
    RunTask(String),
}
