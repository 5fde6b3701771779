//! In-process cache for index snapshots and per-symbol fundamentals.

use crate::index::IndexCode;
use crate::model::{Fundamentals, IndexSnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Entry counts of a [`SessionCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Cached index snapshots.
    pub indices: usize,
    /// Cached fundamentals.
    pub fundamentals: usize,
}

/// Append-only cache scoped to one adapter.
///
/// Entries are filled lazily and live as long as the cache. Inserts keep the
/// first value for a key, so racing first writes for the same key resolve to
/// one stored value.
#[derive(Debug, Default)]
pub struct SessionCache {
    indices: RwLock<HashMap<IndexCode, Arc<IndexSnapshot>>>,
    fundamentals: RwLock<HashMap<String, Arc<Fundamentals>>>,
}

impl SessionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached snapshot for `index`.
    pub async fn index(&self, index: IndexCode) -> Option<Arc<IndexSnapshot>> {
        self.indices.read().await.get(&index).cloned()
    }

    /// Store a snapshot unless one is already cached; returns the stored one.
    pub async fn insert_index(&self, index: IndexCode, snapshot: IndexSnapshot) -> Arc<IndexSnapshot> {
        let mut guard = self.indices.write().await;
        Arc::clone(guard.entry(index).or_insert_with(|| Arc::new(snapshot)))
    }

    /// Cached fundamentals for `symbol`.
    pub async fn fundamentals(&self, symbol: &str) -> Option<Arc<Fundamentals>> {
        self.fundamentals.read().await.get(symbol).cloned()
    }

    /// Store fundamentals unless already cached; returns the stored value.
    pub async fn insert_fundamentals(&self, fundamentals: Fundamentals) -> Arc<Fundamentals> {
        let mut guard = self.fundamentals.write().await;
        Arc::clone(
            guard
                .entry(fundamentals.symbol.clone())
                .or_insert_with(|| Arc::new(fundamentals)),
        )
    }

    /// Current entry counts.
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            indices: self.indices.read().await.len(),
            fundamentals: self.fundamentals.read().await.len(),
        }
    }
}
