//! Events the grid emits to its host.
//!
//! Listener failures are logged and swallowed: a broken listener never aborts
//! the grid operation that triggered it.
//!
//! A registry can instead queue events for the owner to deliver once the grid
//! is no longer borrowed, so listeners may call back into it.

use std::collections::HashMap;

use serde::Serialize;
use tracing::error;

use crate::error::Result;
use crate::types::{Patch, Range};

/// Kind of a [`GridEvent`], used as the listener registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DataChanged,
    ActiveCellChanged,
    SelectionChanged,
    Paste,
}

impl EventKind {
    /// Event name as used by the JavaScript host.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::DataChanged => "dataChanged",
            EventKind::ActiveCellChanged => "activeCellChanged",
            EventKind::SelectionChanged => "selectionChanged",
            EventKind::Paste => "paste",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dataChanged" => Some(EventKind::DataChanged),
            "activeCellChanged" => Some(EventKind::ActiveCellChanged),
            "selectionChanged" => Some(EventKind::SelectionChanged),
            "paste" => Some(EventKind::Paste),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "camelCase")]
pub enum GridEvent {
    DataChanged(Vec<Patch>),
    /// Always a 1×1 range.
    ActiveCellChanged(Range),
    /// Convex hull of the selection.
    SelectionChanged(Range),
    Paste,
}

impl GridEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GridEvent::DataChanged(_) => EventKind::DataChanged,
            GridEvent::ActiveCellChanged(_) => EventKind::ActiveCellChanged,
            GridEvent::SelectionChanged(_) => EventKind::SelectionChanged,
            GridEvent::Paste => EventKind::Paste,
        }
    }
}

pub type Listener = Box<dyn FnMut(&GridEvent) -> Result<()>>;

/// One listener per event kind; registering again replaces the old one.
#[derive(Default)]
pub struct EventListeners {
    listeners: HashMap<EventKind, Listener>,
    /// Set once queueing is on; emitted events wait here instead.
    queued: Option<Vec<GridEvent>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.insert(kind, listener);
    }

    pub fn remove(&mut self, kind: EventKind) {
        self.listeners.remove(&kind);
    }

    /// Hold every later event for [`take_queued`](Self::take_queued) instead
    /// of calling the registered listeners.
    pub fn queue(&mut self) {
        self.queued.get_or_insert_with(Vec::new);
    }

    /// Queued events in emission order.
    pub fn take_queued(&mut self) -> Vec<GridEvent> {
        self.queued.as_mut().map(std::mem::take).unwrap_or_default()
    }

    pub fn emit(&mut self, event: &GridEvent) {
        if let Some(queued) = self.queued.as_mut() {
            queued.push(event.clone());
            return;
        }
        let kind = event.kind();
        if let Some(listener) = self.listeners.get_mut(&kind) {
            if let Err(e) = listener(event) {
                error!(event = kind.name(), error = %e, "listener failed");
            }
        }
    }
}

impl std::fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListeners")
            .field("kinds", &self.listeners.keys().collect::<Vec<_>>())
            .field("queued", &self.queued.as_ref().map(Vec::len))
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn failing_listener_is_isolated() {
        let mut listeners = EventListeners::new();
        listeners.set(
            EventKind::Paste,
            Box::new(|_| Err(GridError::Listener("boom".into()))),
        );
        // Must not panic or propagate.
        listeners.emit(&GridEvent::Paste);
    }

    #[test]
    fn registering_replaces_previous_listener() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = EventListeners::new();
        let first = Rc::clone(&seen);
        listeners.set(
            EventKind::SelectionChanged,
            Box::new(move |_| {
                first.borrow_mut().push("first");
                Ok(())
            }),
        );
        let second = Rc::clone(&seen);
        listeners.set(
            EventKind::SelectionChanged,
            Box::new(move |_| {
                second.borrow_mut().push("second");
                Ok(())
            }),
        );
        listeners.emit(&GridEvent::SelectionChanged(Range::new(0, 0, 1, 1)));
        assert_eq!(*seen.borrow(), vec!["second"]);
    }

    #[test]
    fn queued_events_skip_listeners_and_drain_in_order() {
        let calls = Rc::new(RefCell::new(0));
        let mut listeners = EventListeners::new();
        let counter = Rc::clone(&calls);
        listeners.set(
            EventKind::Paste,
            Box::new(move |_| {
                *counter.borrow_mut() += 1;
                Ok(())
            }),
        );
        assert!(listeners.take_queued().is_empty());

        listeners.queue();
        let selection = GridEvent::SelectionChanged(Range::new(1, 0, 1, 1));
        listeners.emit(&selection);
        listeners.emit(&GridEvent::Paste);
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(listeners.take_queued(), vec![selection, GridEvent::Paste]);
        assert!(listeners.take_queued().is_empty());
    }

    #[test]
    fn names_roundtrip() {
        for kind in [
            EventKind::DataChanged,
            EventKind::ActiveCellChanged,
            EventKind::SelectionChanged,
            EventKind::Paste,
        ] {
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EventKind::from_name("resize"), None);
    }
}
