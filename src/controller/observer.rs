//! Change-notification registry
//!
//! Observers register against the controller and receive every
//! state-changing event in registration order. Registration hands back an
//! id; deregistration is by id, so observer lifetime is explicit and two
//! registrations of the same closure are simply two observers.

use std::fmt;
use tracing::{debug, warn};

/// A state change worth telling the presentation layer about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent {
    BlockAppended { index: u64 },
    BlockCorrupted { index: u64 },
    Imported { blocks: usize },
    Reset,
}

/// Handle returned by registration; the only way to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// Observer callback. A returned error is logged and isolated; it never
/// stops the fan-out or propagates to the mutating caller.
pub type ObserverCallback = Box<dyn FnMut(&ChainEvent) -> Result<(), String>>;

/// Ordered observer list keyed by id.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, ObserverCallback)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; returns the deregistration handle.
    pub fn register(&mut self, callback: ObserverCallback) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, callback));
        debug!(%id, total = self.observers.len(), "observer registered");
        id
    }

    /// Remove the observer behind `id`; false when already gone.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        let removed = self.observers.len() < before;
        if removed {
            debug!(%id, total = self.observers.len(), "observer removed");
        }
        removed
    }

    /// Invoke every observer in registration order. A failing observer is
    /// logged and skipped; the rest still run.
    pub fn notify(&mut self, event: &ChainEvent) {
        debug!(?event, count = self.observers.len(), "notifying observers");
        for (id, callback) in &mut self.observers {
            if let Err(reason) = callback(event) {
                warn!(%id, %reason, "observer failed; continuing");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
