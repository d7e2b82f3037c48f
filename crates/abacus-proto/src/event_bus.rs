//! Event bus for pub/sub messaging.
//!
//! Listeners are registered per event type and invoked synchronously, in
//! registration order. A failing listener (error or panic) is logged and
//! skipped; it never stops delivery to the listeners after it and never
//! reaches the emitter.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, trace};

/// Event type that receives every raw inbound message, unparsed.
pub const MESSAGE_EVENT: &str = "message";

/// Callback invoked with the event payload.
///
/// Identity is the `Arc` allocation: keep a clone of the listener to be
/// able to remove it with [`EventBus::off`].
pub type Listener = Arc<dyn Fn(Option<&str>) -> anyhow::Result<()> + Send + Sync + 'static>;

/// Wraps a closure into a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(Option<&str>) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Central pub/sub hub keyed by event type.
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<HashMap<String, Vec<Listener>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry();
        let mut counts: Vec<(&String, usize)> =
            registry.iter().map(|(k, v)| (k, v.len())).collect();
        counts.sort();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

impl EventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<String, Vec<Listener>>> {
        // Listeners run outside the lock, so a poisoned registry is still consistent.
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a listener for `event_type`.
    ///
    /// Registering the same listener twice makes it run twice per emit.
    pub fn on(&self, event_type: &str, listener: Listener) {
        self.registry()
            .entry(event_type.to_string())
            .or_default()
            .push(listener);
    }

    /// Removes the first registration of `listener` for `event_type`.
    ///
    /// Returns true if a registration was removed.
    pub fn off(&self, event_type: &str, listener: &Listener) -> bool {
        let mut registry = self.registry();
        let Some(listeners) = registry.get_mut(event_type) else {
            return false;
        };
        match listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invokes every listener for `event_type`, in registration order.
    ///
    /// Delivery iterates over a snapshot, so listeners may call back into
    /// the bus. Returns the number of listeners that completed successfully.
    pub fn emit(&self, event_type: &str, data: Option<&str>) -> usize {
        let snapshot: Vec<Listener> = match self.registry().get(event_type) {
            Some(listeners) => listeners.clone(),
            None => return 0,
        };

        trace!(event_type, listeners = snapshot.len(), "Emitting event");

        let mut delivered = 0;
        for listener in &snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener(data))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    error!(event_type, error = %e, "Listener failed");
                }
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    error!(event_type, reason, "Listener panicked");
                }
            }
        }
        delivered
    }

    /// Removes all listeners for `event_type`, or for every type when `None`.
    pub fn clear(&self, event_type: Option<&str>) {
        let mut registry = self.registry();
        match event_type {
            Some(event_type) => {
                registry.remove(event_type);
            }
            None => registry.clear(),
        }
    }

    /// Returns the number of registrations for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.registry().get(event_type).map_or(0, Vec::len)
    }

    /// Checks if anything listens on `event_type`.
    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.listener_count(event_type) > 0
    }
}
