//! Business service for `SimpleObject` plus optional caching and instrumentation decorators.

mod cached;
mod instrumented;
mod simple;

pub use cached::CachedSimpleService;
pub use instrumented::{InstrumentedSimpleService, MetricsSnapshot, ServiceMetrics};
pub use simple::SimpleServiceImpl;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::model::{SimpleId, SimpleObject};
use crate::repository::SimpleRepository;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SimpleService: Send + Sync {
    async fn find_all(&self) -> Result<Vec<SimpleObject>, AppError>;

    async fn find_one(&self, id: SimpleId) -> Result<Option<SimpleObject>, AppError>;

    /// Persist a new entity. Fails with `AlreadyExists` if `entity.id` is set.
    async fn create(&self, entity: SimpleObject) -> Result<SimpleObject, AppError>;

    /// Replace an existing entity. Fails with `NotFound` if its id is not stored.
    async fn update(&self, entity: SimpleObject) -> Result<SimpleObject, AppError>;

    /// Remove by id. Absence is not an error.
    async fn delete(&self, id: SimpleId) -> Result<(), AppError>;
}

/// Composed service and the metrics handle when instrumentation is on.
pub struct BuiltService {
    pub service: Arc<dyn SimpleService>,
    pub metrics: Option<Arc<ServiceMetrics>>,
}

/// Wrap the transactional service with the decorators enabled in `config`.
/// Order, outermost first: instrumentation, cache, core.
pub fn build_service(repo: Arc<dyn SimpleRepository>, config: &ServerConfig) -> BuiltService {
    let core = SimpleServiceImpl::new(repo);
    let inner: Arc<dyn SimpleService> = if config.cache_enabled {
        Arc::new(CachedSimpleService::new(core))
    } else {
        Arc::new(core)
    };
    if config.metrics_enabled {
        let metrics = Arc::new(ServiceMetrics::default());
        BuiltService {
            service: Arc::new(InstrumentedSimpleService::new(inner, metrics.clone())),
            metrics: Some(metrics),
        }
    } else {
        BuiltService {
            service: inner,
            metrics: None,
        }
    }
}

#[async_trait]
impl<S: SimpleService + ?Sized> SimpleService for Arc<S> {
    async fn find_all(&self) -> Result<Vec<SimpleObject>, AppError> {
        (**self).find_all().await
    }

    async fn find_one(&self, id: SimpleId) -> Result<Option<SimpleObject>, AppError> {
        (**self).find_one(id).await
    }

    async fn create(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        (**self).create(entity).await
    }

    async fn update(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        (**self).update(entity).await
    }

    async fn delete(&self, id: SimpleId) -> Result<(), AppError> {
        (**self).delete(id).await
    }
}

/// Create the sample entities `Simple Object #0` .. `#9`.
pub async fn seed_samples(service: &dyn SimpleService) -> Result<Vec<SimpleObject>, AppError> {
    let mut out = Vec::with_capacity(10);
    for i in 0..10 {
        out.push(service.create(SimpleObject::new(format!("Simple Object #{}", i))).await?);
    }
    tracing::info!(count = out.len(), "seeded sample objects");
    Ok(out)
}
