//! Logging and invocation counters around a `SimpleService`.

use super::SimpleService;
use crate::error::AppError;
use crate::model::{SimpleId, SimpleObject};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::Instrument;

/// Per-operation invocation counters. Failed calls count as invocations and as failures.
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    find_all: AtomicU64,
    find_one: AtomicU64,
    create: AtomicU64,
    update: AtomicU64,
    delete: AtomicU64,
    failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub find_all: u64,
    pub find_one: u64,
    pub create: u64,
    pub update: u64,
    pub delete: u64,
    pub failures: u64,
}

impl ServiceMetrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            find_all: self.find_all.load(Ordering::Relaxed),
            find_one: self.find_one.load(Ordering::Relaxed),
            create: self.create.load(Ordering::Relaxed),
            update: self.update.load(Ordering::Relaxed),
            delete: self.delete.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    fn record<T>(&self, counter: &AtomicU64, result: &Result<T, AppError>) {
        counter.fetch_add(1, Ordering::Relaxed);
        if result.is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}

pub struct InstrumentedSimpleService<S> {
    inner: S,
    metrics: Arc<ServiceMetrics>,
}

impl<S: SimpleService> InstrumentedSimpleService<S> {
    pub fn new(inner: S, metrics: Arc<ServiceMetrics>) -> Self {
        Self { inner, metrics }
    }

    pub fn metrics(&self) -> &Arc<ServiceMetrics> {
        &self.metrics
    }
}

fn log_outcome<T>(op: &'static str, result: &Result<T, AppError>) {
    match result {
        Ok(_) => tracing::debug!(op, "ok"),
        Err(e) => tracing::info!(op, error = %e, "failed"),
    }
}

#[async_trait]
impl<S: SimpleService> SimpleService for InstrumentedSimpleService<S> {
    async fn find_all(&self) -> Result<Vec<SimpleObject>, AppError> {
        let result = self
            .inner
            .find_all()
            .instrument(tracing::debug_span!("simple.find_all"))
            .await;
        if let Ok(rows) = &result {
            tracing::debug!(count = rows.len(), "find_all");
        }
        log_outcome("find_all", &result);
        self.metrics.record(&self.metrics.find_all, &result);
        result
    }

    async fn find_one(&self, id: SimpleId) -> Result<Option<SimpleObject>, AppError> {
        let result = self
            .inner
            .find_one(id)
            .instrument(tracing::debug_span!("simple.find_one", id))
            .await;
        log_outcome("find_one", &result);
        self.metrics.record(&self.metrics.find_one, &result);
        result
    }

    async fn create(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        let result = self
            .inner
            .create(entity)
            .instrument(tracing::info_span!("simple.create"))
            .await;
        if let Ok(saved) = &result {
            tracing::info!(id = ?saved.id, "created SimpleObject");
        }
        log_outcome("create", &result);
        self.metrics.record(&self.metrics.create, &result);
        result
    }

    async fn update(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        let span = tracing::info_span!("simple.update", id = ?entity.id);
        let result = self.inner.update(entity).instrument(span).await;
        log_outcome("update", &result);
        self.metrics.record(&self.metrics.update, &result);
        result
    }

    async fn delete(&self, id: SimpleId) -> Result<(), AppError> {
        let result = self
            .inner
            .delete(id)
            .instrument(tracing::info_span!("simple.delete", id))
            .await;
        log_outcome("delete", &result);
        self.metrics.record(&self.metrics.delete, &result);
        result
    }
}
