//! Read-through cache for single-entity lookups.

use super::SimpleService;
use crate::error::AppError;
use crate::model::{SimpleId, SimpleObject};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct CacheState {
    entries: HashMap<SimpleId, SimpleObject>,
    /// Bumped by every mutation. A lookup only fills the cache if no mutation
    /// finished while it was reading.
    epoch: u64,
}

/// Caches `find_one` hits by id. Every mutation evicts its id, whether or not
/// it succeeded. Misses are never cached and `find_all` always goes to the
/// inner service.
pub struct CachedSimpleService<S> {
    inner: S,
    state: RwLock<CacheState>,
}

impl<S: SimpleService> CachedSimpleService<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Number of cached entries.
    pub fn cached_len(&self) -> usize {
        self.state.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    fn lookup(&self, id: SimpleId) -> (Option<SimpleObject>, u64) {
        match self.state.read() {
            Ok(s) => (s.entries.get(&id).cloned(), s.epoch),
            Err(_) => (None, 0),
        }
    }

    fn fill(&self, entity: &SimpleObject, seen_epoch: u64) {
        let Some(id) = entity.id else {
            return;
        };
        if let Ok(mut s) = self.state.write() {
            if s.epoch == seen_epoch {
                s.entries.insert(id, entity.clone());
            } else {
                tracing::trace!(id, "cache fill skipped after concurrent write");
            }
        }
    }

    fn invalidate(&self, id: Option<SimpleId>) {
        if let Ok(mut s) = self.state.write() {
            if let Some(id) = id {
                s.entries.remove(&id);
            }
            s.epoch = s.epoch.wrapping_add(1);
        }
    }
}

#[async_trait]
impl<S: SimpleService> SimpleService for CachedSimpleService<S> {
    async fn find_all(&self) -> Result<Vec<SimpleObject>, AppError> {
        self.inner.find_all().await
    }

    async fn find_one(&self, id: SimpleId) -> Result<Option<SimpleObject>, AppError> {
        let (hit, epoch) = self.lookup(id);
        if let Some(hit) = hit {
            tracing::trace!(id, "cache hit");
            return Ok(Some(hit));
        }
        let found = self.inner.find_one(id).await?;
        if let Some(entity) = &found {
            self.fill(entity, epoch);
        }
        Ok(found)
    }

    async fn create(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        let result = self.inner.create(entity).await;
        self.invalidate(result.as_ref().ok().and_then(|saved| saved.id));
        result
    }

    async fn update(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        let id = entity.id;
        let result = self.inner.update(entity).await;
        self.invalidate(id);
        result
    }

    async fn delete(&self, id: SimpleId) -> Result<(), AppError> {
        let result = self.inner.delete(id).await;
        self.invalidate(Some(id));
        result
    }
}
