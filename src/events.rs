//! State change notifications.
//!
//! Each record type's registry owns one [`Dispatcher`]; listeners
//! registered there never see changes of other record types.

use crate::core::StateValue;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Moment in a transition a listener is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Fired before the handler runs
    BeforeStateChange,
    /// Fired after the new state has been written
    AfterStateChange,
}

/// Payload delivered to listeners.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    pub source: StateValue,
    pub target: StateValue,
    pub at: DateTime<Utc>,
}

impl StateChange {
    pub fn new(source: StateValue, target: StateValue) -> Self {
        Self {
            source,
            target,
            at: Utc::now(),
        }
    }
}

/// Handle returned by [`Dispatcher::listen`], used to remove the listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(Uuid);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

type Listener<R> = Arc<dyn Fn(&R, &StateChange) + Send + Sync>;

struct Entry<R> {
    id: ListenerId,
    kind: EventKind,
    listener: Listener<R>,
}

impl<R> Clone for Entry<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            listener: Arc::clone(&self.listener),
        }
    }
}

/// Per-record-type listener list.
pub struct Dispatcher<R> {
    entries: RwLock<Vec<Entry<R>>>,
}

impl<R> Dispatcher<R> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Register a listener for one event kind.
    pub fn listen<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&R, &StateChange) + Send + Sync + 'static,
    {
        let id = ListenerId(Uuid::new_v4());
        self.entries.write().push(Entry {
            id,
            kind,
            listener: Arc::new(listener),
        });
        debug!(listener = %id, ?kind, "registered state change listener");
        id
    }

    /// Remove a listener. Returns `false` when it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;
        debug!(listener = %id, removed, "removed state change listener");
        removed
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.entries
            .read()
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    /// Deliver `change` to every listener of `kind`, in registration order.
    ///
    /// The listener list is snapshotted first, so listeners may register or
    /// remove listeners while being notified.
    pub fn fire(&self, kind: EventKind, record: &R, change: &StateChange) {
        let snapshot: Vec<Entry<R>> = self
            .entries
            .read()
            .iter()
            .filter(|entry| entry.kind == kind)
            .cloned()
            .collect();

        for entry in snapshot {
            (entry.listener)(record, change);
        }
    }

    pub fn before_state_change(&self, record: &R, change: &StateChange) {
        self.fire(EventKind::BeforeStateChange, record, change);
    }

    pub fn after_state_change(&self, record: &R, change: &StateChange) {
        self.fire(EventKind::AfterStateChange, record, change);
    }
}

impl<R> Default for Dispatcher<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.entries.read().len())
            .finish()
    }
}
