//! Ordered observer lists with cancellable subscriptions

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::metrics::SessionMetrics;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    entries: Mutex<Vec<(u64, Callback<T>)>>,
}

impl<T> Registry<T> {
    fn entries(&self) -> MutexGuard<'_, Vec<(u64, Callback<T>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: u64) -> bool;
}

impl<T: 'static> Unsubscribe for Registry<T> {
    fn unsubscribe(&self, id: u64) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }
}

/// Handle returned by observer registration.
///
/// Dropping it keeps the callback registered; `cancel` removes it.
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Unsubscribe>,
}

impl Subscription {
    /// Remove the callback. Returns false if it was already gone
    /// (cancelled before, or cleared by `cleanup`).
    pub fn cancel(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.unsubscribe(self.id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Callbacks invoked in registration order.
///
/// A panicking callback is logged and skipped; the rest still run.
pub struct ObserverList<T> {
    kind: &'static str,
    next_id: AtomicU64,
    registry: Arc<Registry<T>>,
}

impl<T: 'static> ObserverList<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            next_id: AtomicU64::new(1),
            registry: Arc::new(Registry {
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.entries().push((id, Arc::new(callback)));

        let registry: Arc<dyn Unsubscribe> = self.registry.clone();
        Subscription {
            id,
            registry: Arc::downgrade(&registry),
        }
    }

    pub fn notify(&self, value: &T) {
        // Snapshot so callbacks may cancel subscriptions without deadlocking
        let callbacks: Vec<Callback<T>> = self
            .registry
            .entries()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();

        for callback in callbacks {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(value))) {
                SessionMetrics::record_observer_panic(self.kind);
                tracing::error!(
                    observer = self.kind,
                    panic = %panic_message(panic.as_ref()),
                    "Observer callback panicked"
                );
            }
        }
    }

    pub fn clear(&self) {
        self.registry.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.registry.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
