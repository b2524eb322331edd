//! Synchronous observer registry for runner events.
//!
//! Handlers are called on the emitting thread, in the order they were
//! registered. A handler that panics is logged and skipped; the remaining
//! handlers still run.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::config::Params;
use crate::runner::LogLine;

/// Names of the events a runner emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BeforeExecute,
    AfterExecute,
    Error,
    Log,
    TuiBeforeStart,
    TuiAfterEnd,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::BeforeExecute,
        EventKind::AfterExecute,
        EventKind::Error,
        EventKind::Log,
        EventKind::TuiBeforeStart,
        EventKind::TuiAfterEnd,
    ];

    /// Wire name, e.g. `script:beforeExecute`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::BeforeExecute => "script:beforeExecute",
            EventKind::AfterExecute => "script:afterExecute",
            EventKind::Error => "script:error",
            EventKind::Log => "script:log",
            EventKind::TuiBeforeStart => "tui:beforeStart",
            EventKind::TuiAfterEnd => "tui:afterEnd",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown event: {}", s))
    }
}

/// An event with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    BeforeExecute { script: PathBuf, params: Params },
    AfterExecute { script: PathBuf, result: Value },
    Error { script: PathBuf, message: String },
    Log { script: PathBuf, line: LogLine },
    TuiBeforeStart,
    TuiAfterEnd,
}

impl RunnerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RunnerEvent::BeforeExecute { .. } => EventKind::BeforeExecute,
            RunnerEvent::AfterExecute { .. } => EventKind::AfterExecute,
            RunnerEvent::Error { .. } => EventKind::Error,
            RunnerEvent::Log { .. } => EventKind::Log,
            RunnerEvent::TuiBeforeStart => EventKind::TuiBeforeStart,
            RunnerEvent::TuiAfterEnd => EventKind::TuiAfterEnd,
        }
    }
}

/// Identifies a registered handler for [`EventBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

pub type Handler = Arc<dyn Fn(&RunnerEvent) + Send + Sync>;

/// Maps each [`EventKind`] to its ordered handlers.
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<HashMap<EventKind, Vec<(HandlerId, Handler)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> HandlerId
    where
        F: Fn(&RunnerEvent) + Send + Sync + 'static,
    {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers
                .entry(kind)
                .or_default()
                .push((id, Arc::new(handler)));
        }
        id
    }

    /// Remove a handler. Returns whether it was registered.
    pub fn off(&self, kind: EventKind, id: HandlerId) -> bool {
        let Ok(mut handlers) = self.handlers.lock() else {
            return false;
        };
        let Some(list) = handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(handler_id, _)| *handler_id != id);
        before != list.len()
    }

    /// Call every handler registered for the event's kind.
    pub fn emit(&self, event: &RunnerEvent) {
        let kind = event.kind();
        // Snapshot so handlers can register or remove handlers while running
        let snapshot: Vec<Handler> = match self.handlers.lock() {
            Ok(handlers) => handlers
                .get(&kind)
                .map(|list| list.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default(),
            Err(_) => return,
        };

        for handler in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                log::error!("A {} handler panicked", kind);
            }
        }
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers
            .lock()
            .map(|handlers| handlers.get(&kind).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}
