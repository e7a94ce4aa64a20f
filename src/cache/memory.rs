// ABOUTME: In-memory summary store with LRU eviction over serialized rows
// ABOUTME: Used for tests and for hosts without a writable data directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pulsewise Contributors

use super::{SummaryKey, SummaryRecord, SummaryStore};
use crate::errors::AppResult;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory summary store with LRU eviction
///
/// Rows are kept as serialized JSON so that reads hand out independent
/// copies, matching what a persistent backend returns. There are at most
/// 20 keys in practice (5 categories x 4 rows), so the capacity only guards
/// against misuse.
#[derive(Clone)]
pub struct InMemorySummaryStore {
    store: Arc<RwLock<LruCache<SummaryKey, Vec<u8>>>>,
}

impl InMemorySummaryStore {
    /// Capacity used when zero entries are requested
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a store holding at most `max_entries` rows
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        // LruCache requires NonZeroUsize for capacity
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether no rows are stored
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl Default for InMemorySummaryStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY.get())
    }
}

#[async_trait]
impl SummaryStore for InMemorySummaryStore {
    async fn load(&self, key: &SummaryKey) -> AppResult<Option<SummaryRecord>> {
        // LruCache::get is mutable (updates access order for LRU)
        let mut store = self.store.write().await;
        let Some(bytes) = store.get(key) else {
            return Ok(None);
        };
        let record = serde_json::from_slice(bytes)?;
        drop(store);
        Ok(Some(record))
    }

    async fn upsert(&self, key: &SummaryKey, record: &SummaryRecord) -> AppResult<()> {
        let serialized = serde_json::to_vec(record)?;
        // LruCache handles eviction automatically on push
        self.store.write().await.push(*key, serialized);
        Ok(())
    }

    async fn remove(&self, key: &SummaryKey) -> AppResult<()> {
        self.store.write().await.pop(key);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.store.write().await.clear();
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}
