//! Event dispatcher
//!
//! Broadcasts diagnostic events to registered observers, synchronously and
//! in registration order.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::event::{EventSeverity, RecorderEvent};
use crate::error::{code, RecorderError};

/// Observer callback signature
pub type ObserverFn = dyn Fn(&RecorderEvent) + Send + Sync;

/// Handle returned by [`EventDispatcher::register`], used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle {
    id: u64,
}

struct Registration {
    id: u64,
    observer: Arc<ObserverFn>,
}

/// Broadcasts events to registered observers
///
/// Observers run synchronously on the dispatching thread, in registration
/// order; a slow or blocking observer stalls the caller. The observer list
/// lock is held only while the list is read or mutated, never across
/// observer execution, so observers may register or unregister freely.
pub struct EventDispatcher {
    observers: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
}

impl EventDispatcher {
    /// Create a dispatcher with no observers
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register an observer; it receives every subsequent dispatch
    pub fn register<F>(&self, observer: F) -> ObserverHandle
    where
        F: Fn(&RecorderEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers.lock().push(Registration {
            id,
            observer: Arc::new(observer),
        });
        tracing::debug!("Registered observer {}", id);
        ObserverHandle { id }
    }

    /// Remove a previously registered observer
    ///
    /// Returns false if the handle was already removed.
    pub fn unregister(&self, handle: ObserverHandle) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|r| r.id != handle.id);
        before != observers.len()
    }

    /// Number of currently registered observers
    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    /// Build an event stamped now and deliver it to every observer
    pub fn dispatch(
        &self,
        severity: EventSeverity,
        event_code: i32,
        message: impl Into<String>,
        details: impl Into<String>,
    ) {
        self.broadcast(
            RecorderEvent::new(severity, event_code, message, details),
            true,
        );
    }

    /// Deliver an error as an event, using the error's default severity
    pub fn dispatch_error(&self, error: &RecorderError, details: impl Into<String>) {
        self.dispatch(error.severity(), error.code(), error.to_string(), details);
    }

    fn broadcast(&self, event: RecorderEvent, report_panics: bool) {
        // Snapshot under the lock; invoke outside it. Observers registered
        // during this dispatch receive only later events.
        let snapshot: Vec<(u64, Arc<ObserverFn>)> = self
            .observers
            .lock()
            .iter()
            .map(|r| (r.id, Arc::clone(&r.observer)))
            .collect();

        let mut panicked = 0usize;
        for (id, observer) in &snapshot {
            if catch_unwind(AssertUnwindSafe(|| observer(&event))).is_err() {
                panicked += 1;
                tracing::warn!("Observer {} panicked while handling event code {}", id, event.code);
            }
        }

        if panicked > 0 && report_panics {
            self.broadcast(
                RecorderEvent::new(
                    EventSeverity::Error,
                    code::OBSERVER_PANIC,
                    format!("{} observer(s) panicked during event dispatch", panicked),
                    format!("original event code {}", event.code),
                ),
                false,
            );
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
