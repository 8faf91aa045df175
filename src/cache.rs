//! Keyed in-memory cache with single-flight computation
//!
//! Each key owns an async slot. A caller that finds the slot empty (or its
//! value stale) computes the value while holding the slot, so concurrent
//! callers for the same key wait for that one computation instead of
//! issuing their own. Different keys never block each other.
//!
//! Failed computations leave the slot untouched.

use crate::error::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

type Slot<V> = Arc<tokio::sync::Mutex<Option<V>>>;

/// Memoizing cache keyed by string
pub struct KeyedCache<V> {
    slots: Mutex<HashMap<String, Slot<V>>>,
}

impl<V: Clone> KeyedCache<V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, computing it on first use
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        self.get_or_refresh(key, |_| true, compute).await
    }

    /// Return the cached value for `key` if `is_fresh` accepts it,
    /// otherwise compute and store a replacement
    pub async fn get_or_refresh<P, F, Fut>(&self, key: &str, is_fresh: P, compute: F) -> Result<V>
    where
        P: Fn(&V) -> bool,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let slot = self.slot(key);
        let mut guard = slot.lock().await;

        if let Some(value) = guard.as_ref() {
            if is_fresh(value) {
                return Ok(value.clone());
            }
        }

        let value = compute().await?;
        *guard = Some(value.clone());
        Ok(value)
    }

    /// Peek at a cached value without computing
    ///
    /// Returns `None` when the key is absent or a computation is in flight.
    pub fn peek(&self, key: &str) -> Option<V> {
        let slot = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()?;
        let guard = slot.try_lock().ok()?;
        (*guard).clone()
    }

    /// Number of keys that have been requested
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no key has been requested yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &str) -> Slot<V> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(None)))
            .clone()
    }
}

impl<V: Clone> Default for KeyedCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for KeyedCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys = self
            .slots
            .lock()
            .map(|s| s.len())
            .unwrap_or_default();
        f.debug_struct("KeyedCache").field("keys", &keys).finish()
    }
}
