// src/menu/mod.rs

//! Task menu: discovery state machine and the options it renders.
//!
//! - [`options`] defines menu entries and the actions they carry.
//! - [`controller`] runs discovery (single-flight, cached per directory)
//!   and derives the options for the current state.

use std::fmt;

pub mod controller;
pub mod options;

pub use controller::{MenuSettings, TaskMenuController};
pub use options::{MenuAction, MenuOption, MenuSelection};

/// Discovery state.
///
/// `Loading -> Ready | NotProject | Error`, and `Error -> Loading` on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Loading,
    Ready,
    NotProject,
    Error,
}

impl fmt::Display for MenuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MenuState::Loading => "loading",
            MenuState::Ready => "ready",
            MenuState::NotProject => "not-project",
            MenuState::Error => "error",
        };
        f.write_str(s)
    }
}
