//! Keyed single-flight memoization.
//!
//! [`SingleFlight`] loads each key at most once, even when several threads
//! ask for the same key at the same time. Callers racing on a key block on
//! that key's slot until the first loader finishes, then share its result.
//! Other keys are not blocked. A slot only ever holds a fully built value,
//! so a reader can never observe a partially populated table.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Slot<V> = Arc<Mutex<Option<Arc<V>>>>;

/// A map from keys to lazily loaded, shared values.
#[derive(Debug)]
pub struct SingleFlight<K, V> {
    slots: Mutex<HashMap<K, Slot<V>>>,
    loads: AtomicUsize,
}

impl<K, V> Default for SingleFlight<K, V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }
}

impl<K: Eq + Hash + Clone, V> SingleFlight<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value for `key`, running `load` if it is not cached yet.
    ///
    /// A failed load leaves the key empty so a later call may retry.
    pub fn get_or_try_load<E>(
        &self,
        key: &K,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        // A poisoned slot still holds either nothing or a complete value.
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = guard.as_ref() {
            return Ok(Arc::clone(value));
        }

        let value = Arc::new(load()?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        *guard = Some(Arc::clone(&value));
        Ok(value)
    }

    /// Return the cached value for `key` without loading.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.get(key).cloned()
        }?;
        let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Number of successful loads performed so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of keys holding a loaded value.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .filter(|slot| {
                slot.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
