// ABOUTME: Per-key in-flight tracking so that concurrent refreshes of one key share a single computation
// ABOUTME: The first caller leads and publishes its result; later callers follow and await it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

type Entries<K, V> = Arc<Mutex<HashMap<K, (u64, watch::Receiver<Option<V>>)>>>;

/// Registry of computations currently running, one per key
pub struct InFlightRegistry<K, V> {
    entries: Entries<K, V>,
    next_id: Arc<AtomicU64>,
}

impl<K, V> Clone for InFlightRegistry<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<K, V> Default for InFlightRegistry<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Role handed out by [`InFlightRegistry::claim`]
pub enum Claim<K: Eq + Hash, V> {
    /// No computation was running; the caller must run it
    Leader(InFlightGuard<K, V>),
    /// A computation is already running for the key
    Follower(InFlightWaiter<V>),
}

impl<K, V> InFlightRegistry<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Become the leader for `key`, or follow the computation already running
    #[must_use]
    pub fn claim(&self, key: K) -> Claim<K, V> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, receiver)) = entries.get(&key) {
            return Claim::Follower(InFlightWaiter {
                receiver: receiver.clone(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = watch::channel(None);
        entries.insert(key.clone(), (id, receiver));
        drop(entries);

        Claim::Leader(InFlightGuard {
            key,
            id,
            sender,
            entries: Arc::clone(&self.entries),
        })
    }

    /// Whether a computation is running for `key`
    #[must_use]
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

/// Held by the leader; the key is released when the guard drops
///
/// Dropping the guard without calling [`InFlightGuard::complete`] (an error
/// or a cancelled task) wakes followers with no result.
pub struct InFlightGuard<K: Eq + Hash, V> {
    key: K,
    id: u64,
    sender: watch::Sender<Option<V>>,
    entries: Entries<K, V>,
}

impl<K: Eq + Hash, V> InFlightGuard<K, V> {
    /// Publish the result to every follower and release the key
    pub fn complete(self, value: V) {
        self.sender.send_replace(Some(value));
    }
}

impl<K: Eq + Hash, V> Drop for InFlightGuard<K, V> {
    fn drop(&mut self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.get(&self.key).is_some_and(|(id, _)| *id == self.id) {
            entries.remove(&self.key);
        }
    }
}

/// Held by a follower to await the leader's result
pub struct InFlightWaiter<V> {
    receiver: watch::Receiver<Option<V>>,
}

impl<V: Clone> InFlightWaiter<V> {
    /// Leader's result, or `None` if it finished without one
    pub async fn wait(mut self) -> Option<V> {
        self.receiver
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|value| value.clone())
    }
}
