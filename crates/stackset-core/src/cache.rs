use crate::error::{Result, StacksetError};
use crate::model::StackInstance;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;

pub const DEFAULT_CAPACITY: usize = 128;

/// Memoized `ListStackInstances` results keyed by stack set name.
///
/// Bounded by entry count. Concurrent misses on the same name share one
/// fetch.
#[derive(Clone)]
pub struct InstanceCache {
    entries: Cache<String, Arc<Vec<StackInstance>>>,
}

impl Default for InstanceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl InstanceCache {
    pub fn new(capacity: usize) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity.max(1) as u64)
            .build();
        Self { entries }
    }

    pub async fn get(&self, stack_set_name: &str) -> Option<Arc<Vec<StackInstance>>> {
        self.entries.get(stack_set_name).await
    }

    /// Return the cached listing, or run `fetch` and cache its result. Failed
    /// fetches are not cached.
    pub async fn get_or_fetch<F>(
        &self,
        stack_set_name: &str,
        fetch: F,
    ) -> Result<Arc<Vec<StackInstance>>>
    where
        F: Future<Output = Result<Vec<StackInstance>>>,
    {
        self.entries
            .try_get_with(stack_set_name.to_string(), async {
                fetch.await.map(Arc::new)
            })
            .await
            .map_err(StacksetError::from_shared)
    }

    pub async fn invalidate(&self, stack_set_name: &str) {
        self.entries.invalidate(stack_set_name).await;
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Number of live entries once pending evictions have been applied.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}
