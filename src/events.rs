// src/events.rs

//! Update notifications for the rendering layer.
//!
//! The menu controller and the process runner publish an [`UpdateEvent`]
//! for every state transition and every batch of output lines. A UI holds a
//! receiver from [`UpdateNotifier::subscribe`]; dropping it unsubscribes.

use tokio::sync::broadcast;
use tracing::trace;

use crate::exec::RunState;
use crate::menu::MenuState;

/// Default number of undelivered events kept per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    MenuChanged(MenuState),
    RunStateChanged(RunState),
    OutputAppended { total_lines: usize },
    /// Output cleared for a new run or a reset.
    OutputReset,
    OutputScrolled { offset: usize },
    WindowResized(usize),
}

/// Cloneable publishing handle.
#[derive(Debug, Clone)]
pub struct UpdateNotifier {
    tx: broadcast::Sender<UpdateEvent>,
}

impl Default for UpdateNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl UpdateNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UpdateEvent> {
        self.tx.subscribe()
    }

    /// Publish synchronously. Having no subscribers is fine.
    pub fn notify(&self, event: UpdateEvent) {
        trace!(?event, "update");
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
