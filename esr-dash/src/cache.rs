//! Memoization of statistics responses
//!
//! Entries are keyed by `(operation, dataset id, canonical params JSON)`.
//! The cache is bound to one dataset at a time: [`StatsCache::reset`] is
//! called when a new dataset becomes active, and results computed against
//! any other dataset are never stored.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: &'static str,
    pub dataset: Uuid,
    pub params: String,
}

impl CacheKey {
    /// Build a key; `params` is serialized to compact JSON
    ///
    /// Struct fields serialize in declaration order, so equal parameters
    /// always give the same text.
    pub fn new<P: Serialize>(
        operation: &'static str,
        dataset: Uuid,
        params: &P,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            operation,
            dataset,
            params: serde_json::to_string(params)?,
        })
    }
}

#[derive(Default)]
struct Entries {
    dataset: Option<Uuid>,
    map: HashMap<CacheKey, Arc<Value>>,
}

#[derive(Default)]
pub struct StatsCache {
    inner: Mutex<Entries>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Value>> {
        let inner = self.inner.lock().await;
        let hit = inner.map.get(key).cloned();
        if hit.is_some() {
            debug!("Cache hit: {} ({})", key.operation, key.params);
        }
        hit
    }

    /// Store a result unless it belongs to a dataset that is no longer active
    pub async fn insert(&self, key: CacheKey, value: Arc<Value>) {
        let mut inner = self.inner.lock().await;
        if inner.dataset != Some(key.dataset) {
            debug!("Dropping result for inactive dataset {}", key.dataset);
            return;
        }
        inner.map.insert(key, value);
    }

    /// Forget everything and bind to `dataset`
    pub async fn reset(&self, dataset: Uuid) {
        let mut inner = self.inner.lock().await;
        let dropped = inner.map.len();
        inner.map.clear();
        inner.dataset = Some(dataset);
        debug!("Cache reset for dataset {} ({} entries dropped)", dataset, dropped);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
