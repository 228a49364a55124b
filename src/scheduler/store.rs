//! Thread-safe multi-valued result store.

use indexmap::IndexMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Results keyed by group id, each key holding a list of values.
///
/// Workers append a finished unit's values in one call, so a group's values
/// are never interleaved with another worker's. A single mutex guards the
/// map; appends are short and are not the bottleneck.
#[derive(Debug)]
pub struct ResultStore<T> {
    buckets: Mutex<IndexMap<String, Vec<T>>>,
}

impl<T> Default for ResultStore<T> {
    fn default() -> Self {
        Self {
            buckets: Mutex::new(IndexMap::new()),
        }
    }
}

impl<T> ResultStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all values of a unit under `key`.
    pub fn append(&self, key: &str, values: Vec<T>) {
        let mut buckets = self.lock();
        match buckets.get_mut(key) {
            Some(bucket) => bucket.extend(values),
            None => {
                buckets.insert(key.to_string(), values);
            }
        }
    }

    /// Take the collected results, ordering keys as in `order`. Keys not in
    /// `order` follow in insertion order.
    pub fn take_ordered(&self, order: &[String]) -> IndexMap<String, Vec<T>> {
        let mut collected = std::mem::take(&mut *self.lock());
        let mut ordered = IndexMap::with_capacity(collected.len());
        for key in order {
            if let Some(values) = collected.shift_remove(key.as_str()) {
                ordered.insert(key.clone(), values);
            }
        }
        ordered.extend(collected);
        ordered
    }

    // Each unit moves in with one extend or insert, so a poisoned map is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Vec<T>>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
